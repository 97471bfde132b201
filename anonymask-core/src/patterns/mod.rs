//! Pattern compilation for the masking pipeline.
//!
//! This module turns the built-in category catalogue and user-supplied
//! patterns into compiled, case-insensitive regular expressions, ready to be
//! applied by `masking` and `highlight`.

pub mod compiler;
