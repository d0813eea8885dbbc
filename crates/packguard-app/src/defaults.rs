//! The `set-defaults` use case: write default protections into package manifests.

use crate::context::EvaluationContext;
use anyhow::Context;
use packguard_domain::{PackageManifest, check_rewritable, with_default_protections};

#[derive(Clone, Debug, Default)]
pub struct SetDefaultsInput {
    /// Package names to update; `None` means every package.
    pub packages: Option<Vec<String>>,
    /// Protections to default; `None` means every registered protection.
    pub identifiers: Option<Vec<String>>,
    /// Log progress at `info`.
    pub verbose: bool,
}

#[derive(Clone, Debug, Default)]
pub struct SetDefaultsOutput {
    /// Names of the packages whose manifests were rewritten, in order.
    pub written: Vec<String>,
}

/// Rewrites the selected manifests with defaults filled in.
///
/// Every rewritten manifest is checked for unknown keys and bad behavior tokens first;
/// nothing is written if any has one. Missing protections and unmet preconditions do not
/// block the rewrite; `validate` reports them. Writes are sequential with no rollback.
/// The context is invalidated afterwards.
pub fn run_set_defaults(
    ctx: &mut EvaluationContext,
    input: SetDefaultsInput,
) -> anyhow::Result<SetDefaultsOutput> {
    let repo_root = ctx.repo_root().to_path_buf();
    let loaded = ctx.loaded()?;

    let selected = select_packages(loaded.packages, input.packages.as_deref())?;
    let identifiers = input
        .identifiers
        .unwrap_or_else(|| loaded.registry.identifiers());
    for identifier in &identifiers {
        if !loaded.registry.contains(identifier) {
            anyhow::bail!(
                "unknown protection: {identifier} (expected one of {:?})",
                loaded.registry.identifiers()
            );
        }
    }

    if input.verbose {
        tracing::info!(
            "We will attempt to set the defaults for {} packages!",
            selected.len()
        );
    }

    let total = selected.len();
    let mut rewritten = Vec::with_capacity(total);
    for (i, package) in selected.into_iter().enumerate() {
        if input.verbose {
            tracing::info!("[{}/{}] Setting defaults for {}", i + 1, total, package.name);
        }
        rewritten.push(with_default_protections(package, loaded.registry, &identifiers));
    }

    for manifest in &rewritten {
        check_rewritable(manifest, loaded.registry)
            .with_context(|| format!("defaults for {} are not valid", manifest.name))?;
    }

    let mut output = SetDefaultsOutput::default();
    for manifest in &rewritten {
        packguard_repo::write_manifest(&repo_root, manifest)?;
        output.written.push(manifest.name.clone());
    }

    ctx.invalidate();
    Ok(output)
}

fn select_packages<'a>(
    packages: &'a [PackageManifest],
    names: Option<&[String]>,
) -> anyhow::Result<Vec<&'a PackageManifest>> {
    let Some(names) = names else {
        return Ok(packages.iter().collect());
    };
    names
        .iter()
        .map(|name| {
            packages
                .iter()
                .find(|p| &p.name == name)
                .with_context(|| format!("unknown package: {name}"))
        })
        .collect()
}
