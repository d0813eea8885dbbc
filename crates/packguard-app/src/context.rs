//! Lazily loaded, explicitly invalidated evaluation state for one repository.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use packguard_domain::{Backlog, PackageManifest, Registry};
use packguard_settings::{Overrides, PackguardConfigV1};

/// Owns the registry, packages, and backlog for a repository root.
///
/// Each piece is loaded on first use and kept until [`EvaluationContext::invalidate`].
/// Nothing is reloaded automatically, including after manifests are rewritten.
#[derive(Debug)]
pub struct EvaluationContext {
    repo_root: Utf8PathBuf,
    config_text: String,
    overrides: Overrides,
    registry: Option<Registry>,
    packages: Option<Vec<PackageManifest>>,
    backlog: Option<Backlog>,
}

/// Borrowed view of a fully loaded context.
#[derive(Clone, Copy, Debug)]
pub struct Loaded<'a> {
    pub registry: &'a Registry,
    pub packages: &'a [PackageManifest],
    pub backlog: &'a Backlog,
}

impl EvaluationContext {
    /// `config_text` is the contents of `packguard.toml`; empty means defaults.
    pub fn new(repo_root: &Utf8Path, config_text: impl Into<String>, overrides: Overrides) -> Self {
        Self {
            repo_root: repo_root.to_path_buf(),
            config_text: config_text.into(),
            overrides,
            registry: None,
            packages: None,
            backlog: None,
        }
    }

    pub fn repo_root(&self) -> &Utf8Path {
        &self.repo_root
    }

    pub fn registry(&mut self) -> anyhow::Result<&Registry> {
        let registry = match self.registry.take() {
            Some(registry) => registry,
            None => self.load_registry()?,
        };
        Ok(self.registry.insert(registry))
    }

    pub fn packages(&mut self) -> anyhow::Result<&[PackageManifest]> {
        let packages = match self.packages.take() {
            Some(packages) => packages,
            None => {
                let packages =
                    packguard_repo::load_packages(&self.repo_root).context("load packages")?;
                tracing::debug!(count = packages.len(), "loaded packages");
                packages
            }
        };
        Ok(self.packages.insert(packages))
    }

    pub fn backlog(&mut self) -> anyhow::Result<&Backlog> {
        let backlog = match self.backlog.take() {
            Some(backlog) => backlog,
            None => {
                let root = self.repo_root.clone();
                packguard_repo::load_backlog(&root, self.packages()?).context("load backlog")?
            }
        };
        Ok(self.backlog.insert(backlog))
    }

    /// Loads whatever is missing and borrows all of it at once.
    pub fn loaded(&mut self) -> anyhow::Result<Loaded<'_>> {
        self.registry()?;
        self.backlog()?;
        match (&self.registry, &self.packages, &self.backlog) {
            (Some(registry), Some(packages), Some(backlog)) => Ok(Loaded {
                registry,
                packages,
                backlog,
            }),
            _ => anyhow::bail!("evaluation context for {} is not loaded", self.repo_root),
        }
    }

    /// Drops every cached piece; the next access reloads from disk.
    pub fn invalidate(&mut self) {
        tracing::debug!(root = %self.repo_root, "invalidating evaluation context");
        self.registry = None;
        self.packages = None;
        self.backlog = None;
    }

    fn load_registry(&self) -> anyhow::Result<Registry> {
        let cfg = if self.config_text.trim().is_empty() {
            PackguardConfigV1::default()
        } else {
            packguard_settings::parse_config_toml(&self.config_text).context("parse config")?
        };
        let resolved = packguard_settings::resolve_config(cfg, self.overrides.clone())
            .context("resolve config")?;
        tracing::debug!(protections = resolved.registry.len(), "resolved registry");
        Ok(resolved.registry)
    }
}
