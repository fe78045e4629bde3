use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::base::{indent, WriteXml, XmlWriter};
use crate::config::ExportConfig;
use crate::escape::{escape_attribute, escape_text};
use crate::kind::DocumentKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub accel: String,
    #[serde(default)]
    pub alt_accel: String,
}

impl Shortcut {
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        accel: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            accel: accel.into(),
            alt_accel: String::new(),
        }
    }

    pub fn with_alt_accel(mut self, alt_accel: impl Into<String>) -> Self {
        self.alt_accel = alt_accel.into();
        self
    }
}

/// Writes a `Shortcuts` document. Actions without a name cannot be matched
/// on import and are skipped.
pub struct ShortcutsWriter<'a, W: Write> {
    xml: XmlWriter<W>,
    shortcuts: &'a [Shortcut],
    config: &'a ExportConfig,
}

impl<'a, W: Write> ShortcutsWriter<'a, W> {
    pub fn new(sink: W, shortcuts: &'a [Shortcut], config: &'a ExportConfig) -> Self {
        Self {
            xml: XmlWriter::new(sink),
            shortcuts,
            config,
        }
    }

    pub fn into_inner(self) -> W {
        self.xml.into_inner()
    }
}

impl<W: Write> WriteXml for ShortcutsWriter<'_, W> {
    fn write_xml(&mut self) -> io::Result<()> {
        let kind = DocumentKind::Shortcuts;
        let version = self.config.version(kind);
        debug!(%kind, version, shortcuts = self.shortcuts.len(), "writing shortcuts");

        self.xml.write_prolog(kind, version)?;
        self.xml.write_comment(&format!(
            "{} keyboard shortcuts",
            escape_text(&self.config.application)
        ))?;
        self.xml.write_saved_comment(self.config.timestamp())?;
        self.xml.write_author_comment(&self.config.user_email)?;

        self.xml.open_root(kind, version)?;
        for shortcut in self.shortcuts.iter().filter(|s| !s.name.is_empty()) {
            self.xml.write_line(
                &format!(
                    r#"{}<Shortcut category="{}">"#,
                    indent(1),
                    escape_attribute(&shortcut.category)
                ),
                true,
            )?;
            for (tag, value) in [
                ("Name", &shortcut.name),
                ("Accel", &shortcut.accel),
                ("AltAccel", &shortcut.alt_accel),
            ] {
                self.xml.write_line(
                    &format!("{}<{tag}>{}</{tag}>", indent(2), escape_text(value)),
                    true,
                )?;
            }
            self.xml.write_line(&format!("{}</Shortcut>", indent(1)), true)?;
        }
        self.xml.close_root(kind)
    }
}
