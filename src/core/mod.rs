//! core
//!
//! Core domain types and layout state for lanegraph.
//!
//! # Modules
//!
//! - [`types`] - Strong types: CommitHash, RefName, DiffStat
//! - [`store`] - Append-only commit store with child index
//! - [`lanes`] - Lane pool and allocation
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Layout is append-only: placed commits are never revisited
//! - Nothing here touches a rendering surface or a repository

pub mod config;
pub mod lanes;
pub mod store;
pub mod types;
