//! Reading the TypeScript kanji module.

pub mod kanji;
pub mod literal;
pub mod source;
