//! Config parsing and registry resolution.
//!
//! This crate is IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::PackguardConfigV1;
pub use resolve::{Overrides, ResolvedConfig};

/// Schema tag accepted in `packguard.toml`.
pub const SCHEMA_CONFIG_V1: &str = "packguard.config.v1";

/// Parse `packguard.toml` into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<PackguardConfigV1> {
    let cfg: PackguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the registry used by the engine (config + command-line overrides).
pub fn resolve_config(
    cfg: PackguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
