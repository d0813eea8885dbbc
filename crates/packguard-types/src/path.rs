use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Canonical repo-relative path used for package directories, manifests, and offense files.
///
/// Normalization rules are intentionally simple and deterministic:
/// - always forward slashes (`/`)
/// - no leading `./` and no trailing `/`
/// - the repository root is spelled `.`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoPath(String);

impl Default for RepoPath {
    fn default() -> Self {
        RepoPath::new(".")
    }
}

impl RepoPath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let mut v = s.as_ref().replace('\\', "/");
        while v.starts_with("./") {
            v = v.trim_start_matches("./").to_string();
        }
        while v.len() > 1 && v.ends_with('/') {
            v.pop();
        }
        if v.is_empty() {
            v = ".".to_string();
        }
        Self(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "."
    }

    pub fn to_utf8_pathbuf(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.0.clone())
    }

    /// Joins a relative segment. Joining onto the root yields the bare segment.
    pub fn join(&self, segment: &str) -> RepoPath {
        if self.is_root() {
            return RepoPath::new(segment);
        }
        let base = Utf8Path::new(self.as_str());
        RepoPath::new(base.join(segment).as_str())
    }

    /// Returns the containing directory, or `.` for top-level entries.
    pub fn parent(&self) -> RepoPath {
        match Utf8Path::new(self.as_str()).parent() {
            Some(p) => RepoPath::new(p.as_str()),
            None => RepoPath::default(),
        }
    }

    /// Whether `path` lives under this directory. Everything lives under the root.
    pub fn contains(&self, path: &str) -> bool {
        if self.is_root() {
            return true;
        }
        let path = RepoPath::new(path);
        path.as_str()
            .strip_prefix(self.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Utf8Path> for RepoPath {
    fn from(value: &Utf8Path) -> Self {
        RepoPath::new(value.as_str())
    }
}

impl From<Utf8PathBuf> for RepoPath {
    fn from(value: Utf8PathBuf) -> Self {
        RepoPath::new(value.as_str())
    }
}
