//! Writing the Dart data files.

pub mod dart;
