use chrono::{Local, NaiveDateTime};

use crate::kind::{DocumentKind, FormatVersions};

pub const DEFAULT_APPLICATION: &str = "IdeXml";

/// Settings shared by every writer, built once by the caller and passed in
/// explicitly instead of being looked up from process-wide preferences.
/// 所有寫入器共用的匯出設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Name used in the leading generation comment.
    pub application: String,
    /// Written into `Author` comments.
    pub user_email: String,
    /// Controls the `Saved`/`Copyright` comments of project scoped documents.
    pub xml_timestamp: bool,
    pub versions: FormatVersions,
    /// Fixed generation time; the local clock is read when unset.
    pub saved_at: Option<NaiveDateTime>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            application: DEFAULT_APPLICATION.to_string(),
            user_email: String::new(),
            xml_timestamp: true,
            versions: FormatVersions::default(),
            saved_at: None,
        }
    }
}

impl ExportConfig {
    pub fn with_user_email(mut self, email: impl Into<String>) -> Self {
        self.user_email = email.into();
        self
    }

    pub fn with_xml_timestamp(mut self, enabled: bool) -> Self {
        self.xml_timestamp = enabled;
        self
    }

    pub fn with_versions(mut self, versions: FormatVersions) -> Self {
        self.versions = versions;
        self
    }

    pub fn with_saved_at(mut self, saved_at: NaiveDateTime) -> Self {
        self.saved_at = Some(saved_at);
        self
    }

    pub fn version(&self, kind: DocumentKind) -> &str {
        self.versions.version(kind)
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.saved_at.unwrap_or_else(|| Local::now().naive_local())
    }
}
