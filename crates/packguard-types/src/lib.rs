//! Stable DTOs and IDs used across the packguard workspace.
//!
//! This crate is intentionally boring:
//! - protection identifiers and rule names
//! - the three-level violation behavior
//! - canonical repo-relative path handling
//! - data types for the emitted report

#![forbid(unsafe_code)]

pub mod behavior;
pub mod ids;
pub mod path;
pub mod report;

pub use behavior::{InvalidBehavior, ViolationBehavior};
pub use path::RepoPath;
pub use report::{
    OffenseRecord, PackguardData, PackguardReport, ProtectionCount, ToolMeta, Verdict,
    SCHEMA_REPORT_V1,
};
