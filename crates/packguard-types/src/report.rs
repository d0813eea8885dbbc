use crate::RepoPath;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for packguard reports.
pub const SCHEMA_REPORT_V1: &str = "packguard.report.v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// One offense as it appears in the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffenseRecord {
    /// Identifier of the protection that produced the offense.
    pub violation_type: String,
    /// Name of the package the offense is attributed to.
    pub package: String,
    pub file: RepoPath,
    pub message: String,

    /// Stable identifier intended for dedup and trending: a hash of
    /// `violation_type + package + file + message`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionCount {
    pub identifier: String,
    pub offenses: u32,
}

/// Packguard-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PackguardData {
    pub packages_scanned: u32,
    pub new_violations_considered: u32,
    pub offenses_total: u32,
    /// One entry per active protection, in registry order.
    #[serde(default)]
    pub by_protection: Vec<ProtectionCount>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackguardReport {
    /// Versioned schema identifier for the report shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub offenses: Vec<OffenseRecord>,
    pub data: PackguardData,
}
