use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::base::{indent, WriteXml, XmlWriter};
use crate::config::ExportConfig;
use crate::escape::{escape_attribute, escape_text};
use crate::kind::DocumentKind;

pub trait TemplateEntry {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn template_text(&self) -> &str;
}

pub trait TemplateGroup {
    type Entry: TemplateEntry;

    fn name(&self) -> &str;
    fn language(&self) -> &str;
    /// Entries in template-picker order.
    fn entries(&self) -> &[Self::Entry];
}

/// Ordered container of template groups.
/// 依使用者可見順序排列的範本群組集合。
pub trait TemplateTree {
    type Group: TemplateGroup;

    fn groups(&self) -> &[Self::Group];
}

impl<G: TemplateGroup> TemplateTree for [G] {
    type Group = G;

    fn groups(&self) -> &[G] {
        self
    }
}

impl<G: TemplateGroup> TemplateTree for Vec<G> {
    type Group = G;

    fn groups(&self) -> &[G] {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub text: String,
}

impl TemplateDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            text: text.into(),
        }
    }
}

impl TemplateEntry for TemplateDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn template_text(&self) -> &str {
        &self.text
    }
}

fn default_language() -> String {
    "All".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateGroupDefinition {
    pub name: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub entries: Vec<TemplateDefinition>,
}

impl TemplateGroupDefinition {
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_entry(mut self, entry: TemplateDefinition) -> Self {
        self.entries.push(entry);
        self
    }
}

impl TemplateGroup for TemplateGroupDefinition {
    type Entry = TemplateDefinition;

    fn name(&self) -> &str {
        &self.name
    }

    fn language(&self) -> &str {
        &self.language
    }

    fn entries(&self) -> &[TemplateDefinition] {
        &self.entries
    }
}

/// Writes a `Templates` document, keeping group and entry order intact.
pub struct TemplatesWriter<'a, W: Write, T: TemplateTree + ?Sized> {
    xml: XmlWriter<W>,
    tree: &'a T,
    config: &'a ExportConfig,
}

impl<'a, W: Write, T: TemplateTree + ?Sized> TemplatesWriter<'a, W, T> {
    pub fn new(sink: W, tree: &'a T, config: &'a ExportConfig) -> Self {
        Self {
            xml: XmlWriter::new(sink),
            tree,
            config,
        }
    }

    pub fn into_inner(self) -> W {
        self.xml.into_inner()
    }

    fn write_group(&mut self, group: &T::Group) -> io::Result<()> {
        self.xml.write_line(
            &format!(
                r#"{}<TemplateGroup name="{}" language="{}">"#,
                indent(1),
                escape_attribute(group.name()),
                escape_attribute(group.language())
            ),
            true,
        )?;
        for entry in group.entries() {
            self.xml.write_line(
                &format!(
                    r#"{}<Template name="{}">"#,
                    indent(2),
                    escape_attribute(entry.name())
                ),
                true,
            )?;
            self.xml.write_line(
                &format!(
                    "{}<TemplateDescription>{}</TemplateDescription>",
                    indent(3),
                    escape_text(entry.description())
                ),
                true,
            )?;
            self.xml.write_line(
                &format!(
                    "{}<TemplateText>{}</TemplateText>",
                    indent(3),
                    escape_text(entry.template_text())
                ),
                true,
            )?;
            self.xml.write_line(&format!("{}</Template>", indent(2)), true)?;
        }
        self.xml.write_line(&format!("{}</TemplateGroup>", indent(1)), true)
    }
}

impl<W: Write, T: TemplateTree + ?Sized> WriteXml for TemplatesWriter<'_, W, T> {
    fn write_xml(&mut self) -> io::Result<()> {
        let kind = DocumentKind::Templates;
        let version = self.config.version(kind);
        debug!(%kind, version, groups = self.tree.groups().len(), "writing templates");

        self.xml.write_prolog(kind, version)?;
        self.xml.write_comment(&format!(
            "{} templates",
            escape_text(&self.config.application)
        ))?;
        self.xml.write_saved_comment(self.config.timestamp())?;
        self.xml.write_author_comment(&self.config.user_email)?;

        self.xml.open_root(kind, version)?;
        let tree = self.tree;
        for group in tree.groups() {
            self.write_group(group)?;
        }
        self.xml.close_root(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(groups: &[TemplateGroupDefinition]) -> String {
        let config = ExportConfig::default();
        let mut writer = TemplatesWriter::new(Vec::new(), groups, &config);
        writer.write_xml().unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn groups_keep_input_order() {
        let groups = vec![
            TemplateGroupDefinition::new("A", "Python")
                .with_entry(TemplateDefinition::new("t1", "d1", "body1")),
            TemplateGroupDefinition::new("B", "Ruby"),
        ];
        let output = render(&groups);

        let a = output
            .find(r#"<TemplateGroup name="A" language="Python">"#)
            .unwrap();
        let b = output
            .find(r#"<TemplateGroup name="B" language="Ruby">"#)
            .unwrap();
        assert!(a < b);

        let group_b = &output[b..];
        let group_b = &group_b[..group_b.find("</TemplateGroup>").unwrap()];
        assert!(!group_b.contains("<Template "));

        assert!(output.contains(
            "    <Template name=\"t1\">\n      <TemplateDescription>d1</TemplateDescription>\n      <TemplateText>body1</TemplateText>\n    </Template>"
        ));
    }

    #[test]
    fn name_is_attribute_escaped_and_body_text_escaped() {
        let groups = vec![TemplateGroupDefinition::new("Rust", "Rust").with_entry(
            TemplateDefinition::new(r#"if "x""#, "a < b", "if a && b {\n    \"ok\"\n}"),
        )];
        let output = render(&groups);
        assert!(output.contains(r#"<Template name="if &quot;x&quot;">"#));
        assert!(output.contains("<TemplateDescription>a &lt; b</TemplateDescription>"));
        assert!(output.contains("<TemplateText>if a &amp;&amp; b {\n    \"ok\"\n}</TemplateText>"));
    }

    #[test]
    fn entries_keep_insertion_order_not_alphabetical() {
        let groups = vec![TemplateGroupDefinition::new("G", "All")
            .with_entry(TemplateDefinition::new("zeta", "", "z"))
            .with_entry(TemplateDefinition::new("alpha", "", "a"))];
        let output = render(&groups);
        let zeta = output.find(r#"name="zeta""#).unwrap();
        let alpha = output.find(r#"name="alpha""#).unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn language_defaults_to_all_when_missing() {
        let group: TemplateGroupDefinition =
            serde_json::from_str(r#"{ "name": "misc" }"#).unwrap();
        assert_eq!(group.language, "All");
        assert!(group.entries.is_empty());
    }
}
