//! ui
//!
//! User-facing text.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-aware message printing
//!
//! Rendered documents are written by the command handlers directly; this
//! module covers everything said to the user around them.

pub mod output;
