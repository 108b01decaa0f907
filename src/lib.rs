//! lanegraph - incremental lane layout for commit history
//!
//! lanegraph lays a version-control history out as a directed acyclic graph
//! in fixed-width lanes, one row per commit, and draws it through a
//! pluggable rendering surface. New pages of history are appended below an
//! already drawn graph without moving anything that is already placed.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, drives a session)
//! - [`session`] - Incremental graph session, extension gating, source traits
//! - [`render`] - Edge routing, diff halos, ref labels, rendering surfaces
//! - [`core`] - Domain types, commit store, lane allocator, configuration
//! - [`git`] - Single interface for all repository reads
//! - [`ingest`] - History documents read from JSON
//! - [`ui`] - User-facing output
//!
//! # Layout Invariants
//!
//! 1. A placed commit never changes lane or row
//! 2. Each hash awaited by a child holds exactly one lane
//! 3. Rows follow arrival order across every appended batch

pub mod cli;
pub mod core;
pub mod git;
pub mod ingest;
pub mod render;
pub mod session;
pub mod ui;
