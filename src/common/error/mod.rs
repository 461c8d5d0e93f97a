//! Crate-level error type.
//!
//! Parse failures keep their own taxonomy in [`crate::rtf::RtfError`]; this
//! type adds the failures that happen around a parse (opening a file,
//! rejecting an incompatible font engine).

pub mod types;

pub use types::{Error, Result};
