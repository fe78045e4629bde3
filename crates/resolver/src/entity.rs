use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::doctype::Doctype;

/// Prefixes of system identifiers that are handed back untouched.
pub const NETWORK_SCHEMES: [&str; 3] = ["http://", "https://", "ftp://"];

/// Where a system identifier was found.
/// 系統識別碼的解析結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedEntity {
    /// A network URI, returned as given. Fetching it is the parser's business.
    Remote(String),
    /// An existing local file.
    Local(PathBuf),
}

impl ResolvedEntity {
    pub fn as_local(&self) -> Option<&Path> {
        match self {
            ResolvedEntity::Local(path) => Some(path),
            ResolvedEntity::Remote(_) => None,
        }
    }

    /// The string form a parser expects back from its resolver callback.
    pub fn into_system_id(self) -> String {
        match self {
            ResolvedEntity::Remote(uri) => uri,
            ResolvedEntity::Local(path) => path.to_string_lossy().into_owned(),
        }
    }
}

/// Entity-resolution callback slot of an XML parser.
pub trait EntityResolver {
    /// Returns the location to read, or an empty string to let the parser
    /// apply its own default handling.
    fn resolve_entity(&self, public_id: Option<&str>, system_id: &str) -> String;
}

/// Resolves DTD system identifiers against a configured DTD directory,
/// falling back to the unversioned file name when the versioned DTD is not
/// installed.
///
/// The resolver only reads the filesystem and holds no mutable state, so one
/// instance can serve any number of parsers concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtdResolver {
    dtd_dir: PathBuf,
}

impl DtdResolver {
    /// Relative directories are anchored at the current working directory.
    pub fn new(dtd_dir: impl Into<PathBuf>) -> Self {
        let dtd_dir = dtd_dir.into();
        let dtd_dir = if dtd_dir.is_absolute() {
            dtd_dir
        } else {
            match env::current_dir() {
                Ok(cwd) => cwd.join(dtd_dir),
                Err(err) => {
                    warn!(dir = %dtd_dir.display(), error = %err, "cannot anchor relative DTD directory");
                    dtd_dir
                }
            }
        };
        Self { dtd_dir }
    }

    pub fn dtd_dir(&self) -> &Path {
        &self.dtd_dir
    }

    /// Tries, in order: network URI, the identifier as a local path, the file
    /// in the DTD directory, and the unversioned file in the DTD directory.
    pub fn resolve(&self, public_id: Option<&str>, system_id: &str) -> Option<ResolvedEntity> {
        if is_remote(system_id) {
            debug!(system_id, "network system identifier left to the parser");
            return Some(ResolvedEntity::Remote(system_id.to_string()));
        }

        let literal = Path::new(system_id);
        if !system_id.is_empty() && literal.exists() {
            debug!(system_id, "system identifier exists as given");
            return Some(ResolvedEntity::Local(literal.to_path_buf()));
        }

        let Some(file_name) = literal.file_name() else {
            warn!(?public_id, system_id, "system identifier has no file name");
            return None;
        };

        let candidate = self.dtd_dir.join(file_name);
        if candidate.exists() {
            debug!(path = %candidate.display(), "resolved in DTD directory");
            return Some(ResolvedEntity::Local(candidate));
        }

        if let Some(unversioned) = unversioned_file_name(file_name) {
            let fallback = self.dtd_dir.join(unversioned);
            if fallback.exists() {
                debug!(
                    requested = %candidate.display(),
                    path = %fallback.display(),
                    "versioned DTD missing, using unversioned file"
                );
                return Some(ResolvedEntity::Local(fallback));
            }
        }

        warn!(?public_id, system_id, dir = %self.dtd_dir.display(), "DTD could not be resolved");
        None
    }

    /// Resolves the external subset named by a `DOCTYPE`, if it names one.
    pub fn resolve_doctype(&self, doctype: &Doctype) -> Option<ResolvedEntity> {
        let system_id = doctype.system_id.as_deref()?;
        self.resolve(doctype.public_id.as_deref(), system_id)
    }
}

impl EntityResolver for DtdResolver {
    fn resolve_entity(&self, public_id: Option<&str>, system_id: &str) -> String {
        self.resolve(public_id, system_id)
            .map(ResolvedEntity::into_system_id)
            .unwrap_or_default()
    }
}

fn is_remote(system_id: &str) -> bool {
    NETWORK_SCHEMES
        .iter()
        .any(|scheme| system_id.starts_with(scheme))
}

/// `Kind-4.3.dtd` → `Kind.dtd`. Names without a `-` have no fallback.
fn unversioned_file_name(file_name: &OsStr) -> Option<String> {
    let name = file_name.to_str()?;
    let cut = name.rfind('-')?;
    Some(format!("{}.dtd", &name[..cut]))
}
