//! Converts the kanji data module of the Learn-Kana web app into the per-grade Dart files
//! used by the mobile app.
//!
//! The TypeScript source is never executed: each grade's array is isolated with a
//! bracket-matching scanner, decoded with a small literal parser and written back out as Dart.

pub mod error;
pub mod grade;
pub mod input;
pub mod output;
pub mod run;

pub use error::{DecodeError, GroupError};
pub use grade::{GradeGroup, KanjiGrade, EXPECTED_TOTAL, GRADES};
pub use input::kanji::{ExampleRecord, KanjiRecord};
pub use run::{GradeReport, Summary};
