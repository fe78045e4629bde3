use std::fmt;

use serde::{Deserialize, Serialize};

/// Document families written by this crate. The variant name doubles as the
/// root element and the stem of the DTD file name.
/// 文件種類；名稱同時作為根元素與 DTD 檔名。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    HighlightingStyles,
    Templates,
    UserProject,
    DebuggerProperties,
    Shortcuts,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::HighlightingStyles,
        DocumentKind::Templates,
        DocumentKind::UserProject,
        DocumentKind::DebuggerProperties,
        DocumentKind::Shortcuts,
    ];

    pub fn root_name(self) -> &'static str {
        match self {
            DocumentKind::HighlightingStyles => "HighlightingStyles",
            DocumentKind::Templates => "Templates",
            DocumentKind::UserProject => "UserProject",
            DocumentKind::DebuggerProperties => "DebuggerProperties",
            DocumentKind::Shortcuts => "Shortcuts",
        }
    }

    /// `Kind-<version>.dtd`, the system identifier placed in the `DOCTYPE`.
    pub fn dtd_file_name(self, version: &str) -> String {
        format!("{}-{}.dtd", self.root_name(), version)
    }

    pub fn from_root_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.root_name() == name)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root_name())
    }
}

fn default_highlighting_styles() -> String {
    "4.3".to_string()
}

fn default_templates() -> String {
    "4.0".to_string()
}

fn default_user_project() -> String {
    "4.0".to_string()
}

fn default_debugger_properties() -> String {
    "3.9".to_string()
}

fn default_shortcuts() -> String {
    "3.6".to_string()
}

/// Format version per document kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatVersions {
    #[serde(default = "default_highlighting_styles")]
    pub highlighting_styles: String,
    #[serde(default = "default_templates")]
    pub templates: String,
    #[serde(default = "default_user_project")]
    pub user_project: String,
    #[serde(default = "default_debugger_properties")]
    pub debugger_properties: String,
    #[serde(default = "default_shortcuts")]
    pub shortcuts: String,
}

impl Default for FormatVersions {
    fn default() -> Self {
        Self {
            highlighting_styles: default_highlighting_styles(),
            templates: default_templates(),
            user_project: default_user_project(),
            debugger_properties: default_debugger_properties(),
            shortcuts: default_shortcuts(),
        }
    }
}

impl FormatVersions {
    pub fn version(&self, kind: DocumentKind) -> &str {
        match kind {
            DocumentKind::HighlightingStyles => &self.highlighting_styles,
            DocumentKind::Templates => &self.templates,
            DocumentKind::UserProject => &self.user_project,
            DocumentKind::DebuggerProperties => &self.debugger_properties,
            DocumentKind::Shortcuts => &self.shortcuts,
        }
    }

    /// Resets any version that could not appear inside a `DOCTYPE` system
    /// literal or a file name back to its default.
    pub fn sanitize(&mut self) {
        let defaults = Self::default();
        for (value, fallback) in [
            (&mut self.highlighting_styles, defaults.highlighting_styles),
            (&mut self.templates, defaults.templates),
            (&mut self.user_project, defaults.user_project),
            (&mut self.debugger_properties, defaults.debugger_properties),
            (&mut self.shortcuts, defaults.shortcuts),
        ] {
            if !is_valid_version(value) {
                *value = fallback;
            }
        }
    }
}

fn is_valid_version(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '.' || ch == '_')
}
