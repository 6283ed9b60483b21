//! core
//!
//! Core domain types, schemas, and graph operations for objrepo.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, CommitHash, RefName, Reference
//! - [`naming`] - Ref naming rules and validation
//! - [`commit`] - The commit record
//! - [`graph`] - Commit graph arena and ancestry walks
//! - [`author`] - Author string parsing
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Graph walks are deterministic and bounded

pub mod author;
pub mod commit;
pub mod config;
pub mod graph;
pub mod naming;
pub mod types;
