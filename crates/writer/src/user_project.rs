use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::base::{indent, WriteXml, XmlWriter};
use crate::config::ExportConfig;
use crate::escape::{escape_attribute, escape_text};
use crate::kind::DocumentKind;

/// Per-user overrides persisted next to a project. Every field is optional
/// and an unset field produces no element at all.
/// 專案的使用者覆寫設定；未設定的欄位不會輸出。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProjectOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs_status_monitor_interval: Option<u32>,
}

impl UserProjectOverrides {
    /// The VCS override, ignoring a stored empty string.
    pub fn vcs_type(&self) -> Option<&str> {
        self.vcs_type
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }

    /// The poll interval override in seconds, ignoring zero.
    pub fn vcs_status_monitor_interval(&self) -> Option<u32> {
        self.vcs_status_monitor_interval.filter(|value| *value > 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub email: String,
}

pub struct UserProjectWriter<'a, W: Write> {
    xml: XmlWriter<W>,
    project: &'a ProjectInfo,
    overrides: &'a UserProjectOverrides,
    config: &'a ExportConfig,
}

impl<'a, W: Write> UserProjectWriter<'a, W> {
    pub fn new(
        sink: W,
        project: &'a ProjectInfo,
        overrides: &'a UserProjectOverrides,
        config: &'a ExportConfig,
    ) -> Self {
        Self {
            xml: XmlWriter::new(sink),
            project,
            overrides,
            config,
        }
    }

    pub fn into_inner(self) -> W {
        self.xml.into_inner()
    }
}

impl<W: Write> WriteXml for UserProjectWriter<'_, W> {
    fn write_xml(&mut self) -> io::Result<()> {
        let kind = DocumentKind::UserProject;
        let version = self.config.version(kind);
        debug!(%kind, version, project = %self.project.name, "writing user project");

        self.xml.write_prolog(kind, version)?;
        self.xml.write_comment(&format!(
            "{} user project file for project {}",
            escape_text(&self.config.application),
            escape_text(&self.project.name)
        ))?;
        if self.config.xml_timestamp {
            let saved_at = self.config.timestamp();
            self.xml.write_saved_comment(saved_at)?;
            self.xml.write_comment(&format!(
                "Copyright (C) {} {}, {}",
                saved_at.format("%Y"),
                escape_text(&self.project.author),
                escape_text(&self.project.email)
            ))?;
        }

        self.xml.open_root(kind, version)?;
        if let Some(vcs) = self.overrides.vcs_type() {
            self.xml.write_line(
                &format!("{}<VcsType>{}</VcsType>", indent(1), escape_text(vcs)),
                true,
            )?;
        }
        if let Some(interval) = self.overrides.vcs_status_monitor_interval() {
            self.xml.write_line(
                &format!(
                    r#"{}<VcsStatusMonitorInterval value="{}" />"#,
                    indent(1),
                    escape_attribute(&interval.to_string())
                ),
                true,
            )?;
        }
        self.xml.close_root(kind)
    }
}
