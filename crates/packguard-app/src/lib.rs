//! Use case orchestration for packguard.
//!
//! This crate provides the application layer: use cases that coordinate the domain, repo, and
//! render layers. It stays thin and delegates the real work to those layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod context;
mod defaults;
mod explain;
mod render;
mod report;
mod rule_config;
mod validate;

pub use check::{CheckOutput, run_check, verdict_exit_code};
pub use context::{EvaluationContext, Loaded};
pub use defaults::{SetDefaultsInput, SetDefaultsOutput, run_set_defaults};
pub use explain::{ExplainOutput, Explanation, format_explanation, format_not_found, run_explain};
pub use render::{render_annotations, render_markdown, render_text};
pub use report::{parse_report_json, serialize_report, to_renderable};
pub use rule_config::{render_rule_config_yaml, rule_config_json, run_rule_config};
pub use validate::run_validate;
