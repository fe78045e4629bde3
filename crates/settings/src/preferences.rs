use idexml_resolver::DtdResolver;
use idexml_writer::{ExportConfig, FormatVersions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::util::write_atomic;

const PREFERENCES_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to read preferences {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse preferences {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize preferences {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write preferences {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Process-wide settings, loaded once at start-up and handed to writers and
/// resolvers as explicit values.
/// 啟動時載入一次的全域設定，以明確參數傳給寫入器與解析器。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub user: UserPreferences,
    #[serde(default)]
    pub project: ProjectPreferences,
    #[serde(default)]
    pub paths: PathPreferences,
    #[serde(default)]
    pub formats: FormatVersions,
}

fn default_version() -> u32 {
    PREFERENCES_VERSION
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION,
            user: UserPreferences::default(),
            project: ProjectPreferences::default(),
            paths: PathPreferences::default(),
            formats: FormatVersions::default(),
        }
    }
}

impl Preferences {
    pub fn sanitize(&mut self) {
        if self.version == 0 {
            self.version = PREFERENCES_VERSION;
        }
        self.user.sanitize();
        self.paths.sanitize();
        self.formats.sanitize();
    }

    /// Writer settings derived from these preferences.
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig::default()
            .with_user_email(self.user.email.clone())
            .with_xml_timestamp(self.project.xml_timestamp)
            .with_versions(self.formats.clone())
    }

    pub fn dtd_resolver(&self) -> DtdResolver {
        DtdResolver::new(self.paths.dtd_dir.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub email: String,
}

impl UserPreferences {
    fn sanitize(&mut self) {
        let trimmed = self.email.trim();
        if trimmed.len() != self.email.len() {
            self.email = trimmed.to_string();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPreferences {
    /// Emit `Saved`/`Copyright` comments into project scoped documents.
    #[serde(default = "default_true")]
    pub xml_timestamp: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ProjectPreferences {
    fn default() -> Self {
        Self {
            xml_timestamp: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPreferences {
    #[serde(default = "default_dtd_dir")]
    pub dtd_dir: PathBuf,
}

fn default_dtd_dir() -> PathBuf {
    PathBuf::from("DTDs")
}

impl Default for PathPreferences {
    fn default() -> Self {
        Self {
            dtd_dir: default_dtd_dir(),
        }
    }
}

impl PathPreferences {
    fn sanitize(&mut self) {
        if self.dtd_dir.as_os_str().is_empty() {
            self.dtd_dir = default_dtd_dir();
        }
    }
}

#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    data: Preferences,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>, preferences: Preferences) -> Self {
        Self {
            path: path.into(),
            data: preferences,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            debug!(path = %path.display(), "no preferences file, using defaults");
            let mut data = Preferences::default();
            data.sanitize();
            return Ok(Self { path, data });
        }

        let contents = fs::read_to_string(&path).map_err(|source| PreferencesError::Read {
            path: path.clone(),
            source,
        })?;
        let mut data: Preferences =
            serde_json::from_str(&contents).map_err(|source| PreferencesError::Parse {
                path: path.clone(),
                source,
            })?;
        data.sanitize();
        Ok(Self { path, data })
    }

    pub fn preferences(&self) -> &Preferences {
        &self.data
    }

    pub fn update<F>(&mut self, mut op: F) -> Result<(), PreferencesError>
    where
        F: FnMut(&mut Preferences),
    {
        op(&mut self.data);
        self.data.sanitize();
        self.save()
    }

    pub fn save(&self) -> Result<(), PreferencesError> {
        let payload = serde_json::to_string_pretty(&self.data).map_err(|source| {
            PreferencesError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;
        write_atomic(&self.path, payload.as_bytes()).map_err(|source| PreferencesError::Write {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idexml_writer::{DocumentKind, DEFAULT_APPLICATION};

    #[test]
    fn export_config_carries_preferences() {
        let mut prefs = Preferences::default();
        prefs.user.email = "dev@example.org".into();
        prefs.project.xml_timestamp = false;
        prefs.formats.templates = "4.2".into();

        let config = prefs.export_config();
        assert_eq!(config.user_email, "dev@example.org");
        assert!(!config.xml_timestamp);
        assert_eq!(config.version(DocumentKind::Templates), "4.2");
        assert_eq!(config.application, DEFAULT_APPLICATION);
    }

    #[test]
    fn sanitize_trims_email_and_restores_dtd_dir() {
        let mut prefs = Preferences::default();
        prefs.user.email = "  dev@example.org \n".into();
        prefs.paths.dtd_dir = PathBuf::new();
        prefs.sanitize();
        assert_eq!(prefs.user.email, "dev@example.org");
        assert_eq!(prefs.paths.dtd_dir, PathBuf::from("DTDs"));
    }

    #[test]
    fn dtd_resolver_uses_absolute_directory() {
        let prefs = Preferences::default();
        let resolver = prefs.dtd_resolver();
        assert!(resolver.dtd_dir().is_absolute());
        assert!(resolver.dtd_dir().ends_with("DTDs"));
    }
}
