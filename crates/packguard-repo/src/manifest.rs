use anyhow::Context;
use camino::Utf8Path;
use packguard_domain::PackageManifest;
use packguard_types::{RepoPath, ids};
use serde_json::{Map, Value};

const KEY_ENFORCE_DEPENDENCIES: &str = "enforce_dependencies";
const KEY_ENFORCE_PRIVACY: &str = "enforce_privacy";
const KEY_DEPENDENCIES: &str = "dependencies";
const KEY_METADATA: &str = "metadata";

/// Parse the text of one `package.yml` found at `manifest_path`.
///
/// The package is named after its directory. `has_readme` is left false; the caller
/// knows the filesystem.
pub fn parse_manifest(manifest_path: &RepoPath, text: &str) -> anyhow::Result<PackageManifest> {
    let doc: Option<Value> = serde_yaml_ng::from_str(text).context("parse package.yml")?;
    let mut doc = match doc {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(other) => anyhow::bail!("package.yml must be a mapping, found {other}"),
    };

    let directory = manifest_path.parent();
    let enforce_dependencies = parse_enforcement(doc.remove(KEY_ENFORCE_DEPENDENCIES))
        .context(KEY_ENFORCE_DEPENDENCIES)?;
    let enforce_privacy =
        parse_enforcement(doc.remove(KEY_ENFORCE_PRIVACY)).context(KEY_ENFORCE_PRIVACY)?;
    let dependencies = parse_dependencies(doc.remove(KEY_DEPENDENCIES))?;
    let metadata = match doc.remove(KEY_METADATA) {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(other) => anyhow::bail!("metadata must be a mapping, found {other}"),
    };

    Ok(PackageManifest {
        name: directory.as_str().to_string(),
        directory,
        manifest_path: manifest_path.clone(),
        enforce_dependencies,
        enforce_privacy,
        dependencies,
        metadata,
        has_readme: false,
        extra: doc,
    })
}

/// `true`, `false`, or `strict` (which enforces).
fn parse_enforcement(value: Option<Value>) -> anyhow::Result<bool> {
    match value {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(b),
        Some(Value::String(s)) if s == "strict" => Ok(true),
        Some(other) => anyhow::bail!("expected true, false or strict, found {other}"),
    }
}

fn parse_dependencies(value: Option<Value>) -> anyhow::Result<Vec<String>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => anyhow::bail!("dependencies must be package names, found {other}"),
            })
            .collect(),
        Some(other) => anyhow::bail!("dependencies must be a list, found {other}"),
    }
}

/// Read and parse the manifest at `manifest_path`, filling in `has_readme`.
pub fn read_manifest(
    repo_root: &Utf8Path,
    manifest_path: &RepoPath,
) -> anyhow::Result<PackageManifest> {
    let abs = repo_root.join(manifest_path.as_str());
    let text = std::fs::read_to_string(&abs).with_context(|| format!("read {abs}"))?;
    let mut manifest =
        parse_manifest(manifest_path, &text).with_context(|| format!("parse {manifest_path}"))?;
    manifest.has_readme = repo_root
        .join(manifest.directory.join(ids::README_FILE).as_str())
        .is_file();
    Ok(manifest)
}

/// Render a manifest back to YAML: enforcement flags, dependencies, metadata, then unknown keys.
pub fn render_manifest(manifest: &PackageManifest) -> anyhow::Result<String> {
    use serde_yaml_ng::{Mapping, Value as Yaml};

    let mut doc = Mapping::new();
    doc.insert(
        Yaml::from(KEY_ENFORCE_DEPENDENCIES),
        Yaml::Bool(manifest.enforce_dependencies),
    );
    doc.insert(
        Yaml::from(KEY_ENFORCE_PRIVACY),
        Yaml::Bool(manifest.enforce_privacy),
    );
    if !manifest.dependencies.is_empty() {
        doc.insert(
            Yaml::from(KEY_DEPENDENCIES),
            serde_yaml_ng::to_value(&manifest.dependencies)?,
        );
    }
    if !manifest.metadata.is_empty() {
        doc.insert(
            Yaml::from(KEY_METADATA),
            serde_yaml_ng::to_value(&manifest.metadata)?,
        );
    }
    for (key, value) in &manifest.extra {
        doc.insert(Yaml::from(key.as_str()), serde_yaml_ng::to_value(value)?);
    }

    Ok(serde_yaml_ng::to_string(&Yaml::Mapping(doc))?)
}

/// Overwrite the manifest's `package.yml` under `repo_root`.
pub fn write_manifest(repo_root: &Utf8Path, manifest: &PackageManifest) -> anyhow::Result<()> {
    let abs = repo_root.join(manifest.manifest_path.as_str());
    let text = render_manifest(manifest)
        .with_context(|| format!("render {}", manifest.manifest_path))?;
    std::fs::write(&abs, text).with_context(|| format!("write {abs}"))?;
    tracing::debug!(package = %manifest.name, path = %abs, "wrote package manifest");
    Ok(())
}
