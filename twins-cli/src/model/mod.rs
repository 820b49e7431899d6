//! Core model handling
//!
//! This module contains the pure, I/O-free parts of the CLI:
//! - parsing model documents and extracting their dependency ids
//! - building the dependency graph and producing a topological order
//! - planning size-bounded submission batches

pub mod batch;
pub mod document;
pub mod graph;

pub use batch::*;
pub use document::*;
pub use graph::*;
