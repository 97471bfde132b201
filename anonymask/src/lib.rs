// anonymask/src/lib.rs
//! # Anonymask CLI Application
//!
//! This crate provides the command-line front end for `anonymask-core`.
//! It reads text plus saved tagger output (JSON spans or tokens), combines
//! the sources by policy, masks names and structured identifiers, and writes
//! either the masked text or a highlighted view of what was masked.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;

pub use commands::dispatch;
