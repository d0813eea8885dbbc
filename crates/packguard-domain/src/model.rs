use packguard_types::{RepoPath, ids};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// One `package.yml`, as read from the repository.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackageManifest {
    /// Unique package name. `.` is the root package.
    pub name: String,
    /// Repo-relative directory containing the manifest.
    pub directory: RepoPath,
    /// Repo-relative path of the manifest itself.
    pub manifest_path: RepoPath,
    pub enforce_dependencies: bool,
    pub enforce_privacy: bool,
    /// Packages this package may depend on, in declaration order.
    pub dependencies: Vec<String>,
    /// Free-form metadata. Protections read their own keys through typed accessors.
    pub metadata: Map<String, Value>,
    /// Whether a `README.md` sits next to the manifest.
    pub has_readme: bool,
    /// Unknown top-level keys, written back untouched.
    pub extra: Map<String, Value>,
}

impl PackageManifest {
    /// A manifest with no enforcement, no dependencies, and no metadata.
    pub fn new(name: &str) -> Self {
        let directory = RepoPath::new(name);
        let manifest_path = directory.join(ids::MANIFEST_FILE);
        Self {
            name: name.to_string(),
            directory,
            manifest_path,
            ..Self::default()
        }
    }

    pub fn is_root(&self) -> bool {
        self.name == ids::ROOT_PACKAGE_NAME
    }

    /// Raw `metadata.protections` value, if present and not null.
    pub fn protections_metadata(&self) -> Option<&Value> {
        self.metadata
            .get(ids::METADATA_PROTECTIONS)
            .filter(|v| !v.is_null())
    }

    pub fn has_visible_to(&self) -> bool {
        self.metadata
            .get(ids::METADATA_VISIBLE_TO)
            .is_some_and(|v| !v.is_null())
    }

    /// Packages allowed to see this one. Absent means nobody.
    pub fn visible_to(&self) -> BTreeSet<String> {
        string_list(self.metadata.get(ids::METADATA_VISIBLE_TO))
            .into_iter()
            .collect()
    }

    pub fn has_global_namespaces(&self) -> bool {
        self.metadata
            .get(ids::METADATA_GLOBAL_NAMESPACES)
            .is_some_and(|v| !v.is_null())
    }

    pub fn global_namespaces(&self) -> Vec<String> {
        string_list(self.metadata.get(ids::METADATA_GLOBAL_NAMESPACES))
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Kind of a cross-package reference violation.
///
/// Reference extractors may record kinds this engine does not act on; those are kept as `Other`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ViolationKind {
    Dependency,
    Privacy,
    Other(String),
}

impl ViolationKind {
    pub fn as_str(&self) -> &str {
        match self {
            ViolationKind::Dependency => "dependency",
            ViolationKind::Privacy => "privacy",
            ViolationKind::Other(s) => s,
        }
    }
}

impl From<String> for ViolationKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "dependency" => ViolationKind::Dependency,
            "privacy" => ViolationKind::Privacy,
            _ => ViolationKind::Other(value),
        }
    }
}

impl From<ViolationKind> for String {
    fn from(value: ViolationKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw ledger record: one constant of `to_package`, referenced from many files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceViolation {
    pub to_package: String,
    pub class_name: String,
    #[serde(alias = "violations")]
    pub kinds: Vec<ViolationKind>,
    #[serde(default)]
    pub files: Vec<String>,
}

/// A freshly detected violation, as handed over by the reference extractor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewViolation {
    /// Package containing the referencing files.
    pub from_package: String,
    #[serde(flatten)]
    pub reference: ReferenceViolation,
}

impl NewViolation {
    pub fn per_file(&self) -> Vec<PerFileViolation> {
        PerFileViolation::expand(&self.reference, &self.from_package)
    }
}

/// One reference from one file, of one kind.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PerFileViolation {
    pub class_name: String,
    pub file_path: String,
    pub kind: ViolationKind,
    /// Package owning the referenced constant.
    pub constant_source_package: String,
    /// Package containing `file_path`.
    pub reference_source_package: String,
}

impl PerFileViolation {
    /// Expands a ledger record into one violation per (kind, file), kinds outermost.
    pub fn expand(raw: &ReferenceViolation, reference_source_package: &str) -> Vec<Self> {
        raw.kinds
            .iter()
            .flat_map(|kind| {
                raw.files.iter().map(move |file| PerFileViolation {
                    class_name: raw.class_name.clone(),
                    file_path: file.clone(),
                    kind: kind.clone(),
                    constant_source_package: raw.to_package.clone(),
                    reference_source_package: reference_source_package.to_string(),
                })
            })
            .collect()
    }

    pub fn is_dependency(&self) -> bool {
        self.kind == ViolationKind::Dependency
    }

    pub fn is_privacy(&self) -> bool {
        self.kind == ViolationKind::Privacy
    }
}

/// Rule name -> files the rule engine has recorded as known failures.
pub type RuleTodo = BTreeMap<String, BTreeSet<String>>;

/// Recorded, already-known violations: per-package ledgers plus rule-engine TODO lists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Backlog {
    pub ledgers: BTreeMap<String, Vec<ReferenceViolation>>,
    pub rule_todo: RuleTodo,
}

impl Backlog {
    pub fn ledger_for(&self, package: &str) -> &[ReferenceViolation] {
        self.ledgers
            .get(package)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn flagged_files(&self, rule: &str) -> Option<&BTreeSet<String>> {
        self.rule_todo.get(rule)
    }
}

/// A reportable policy failure.
#[derive(Clone, Debug, PartialEq)]
pub struct Offense {
    pub file: String,
    pub message: String,
    /// Identifier of the protection that produced it.
    pub violation_type: String,
    /// Package the offense is attributed to.
    pub package: PackageManifest,
}

impl Offense {
    pub fn package_name(&self) -> &str {
        &self.package.name
    }

    /// Stable SHA-256 fingerprint over `violation_type|package|file|message`.
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};

        let canonical = [
            self.violation_type.as_str(),
            self.package.name.as_str(),
            self.file.as_str(),
            self.message.as_str(),
        ]
        .join("|");

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }
}
