//! The `validate` use case: every configuration problem across the repository.

use crate::context::EvaluationContext;

/// One message per problem; empty means every package is valid.
pub fn run_validate(ctx: &mut EvaluationContext) -> anyhow::Result<Vec<String>> {
    let loaded = ctx.loaded()?;
    tracing::debug!(packages = loaded.packages.len(), "validating packages");
    Ok(packguard_domain::validate(loaded.registry, loaded.packages))
}
