use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::base::{flag, indent, WriteXml, XmlWriter};
use crate::config::ExportConfig;
use crate::escape::escape_text;
use crate::kind::DocumentKind;

/// Debugger settings stored per project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebuggerProperties {
    pub interpreter: String,
    pub debug_client: String,
    pub environment_override: bool,
    pub environment: String,
    pub remote_debugger: bool,
    pub remote_host: String,
    pub remote_command: String,
    pub path_translation: bool,
    pub remote_path: String,
    pub local_path: String,
    pub console_debugger: bool,
    pub console_command: String,
    pub redirect: bool,
    pub no_encoding: bool,
}

pub struct DebuggerPropertiesWriter<'a, W: Write> {
    xml: XmlWriter<W>,
    project_name: &'a str,
    properties: &'a DebuggerProperties,
    config: &'a ExportConfig,
}

impl<'a, W: Write> DebuggerPropertiesWriter<'a, W> {
    pub fn new(
        sink: W,
        project_name: &'a str,
        properties: &'a DebuggerProperties,
        config: &'a ExportConfig,
    ) -> Self {
        Self {
            xml: XmlWriter::new(sink),
            project_name,
            properties,
            config,
        }
    }

    pub fn into_inner(self) -> W {
        self.xml.into_inner()
    }

    fn element(&mut self, level: usize, name: &str, text: &str) -> io::Result<()> {
        self.xml.write_line(
            &format!("{}<{name}>{}</{name}>", indent(level), escape_text(text)),
            true,
        )
    }

    fn switch(&mut self, name: &str, on: bool) -> io::Result<()> {
        self.xml.write_line(
            &format!(r#"{}<{name} on="{}" />"#, indent(1), flag(on)),
            true,
        )
    }
}

impl<W: Write> WriteXml for DebuggerPropertiesWriter<'_, W> {
    fn write_xml(&mut self) -> io::Result<()> {
        let kind = DocumentKind::DebuggerProperties;
        let version = self.config.version(kind);
        let props = self.properties;
        debug!(%kind, version, project = self.project_name, "writing debugger properties");

        self.xml.write_prolog(kind, version)?;
        self.xml.write_comment(&format!(
            "{} debugger properties file for project {}",
            escape_text(&self.config.application),
            escape_text(self.project_name)
        ))?;
        self.xml.write_comment("This file was generated automatically, do not edit.")?;
        if self.config.xml_timestamp {
            self.xml.write_saved_comment(self.config.timestamp())?;
        }

        self.xml.open_root(kind, version)?;
        self.element(1, "Interpreter", &props.interpreter)?;
        self.element(1, "DebugClient", &props.debug_client)?;
        self.xml.write_line(
            &format!(
                r#"{}<Environment override="{}">{}</Environment>"#,
                indent(1),
                flag(props.environment_override),
                escape_text(&props.environment)
            ),
            true,
        )?;

        self.xml.write_line(
            &format!(
                r#"{}<RemoteDebugger on="{}">"#,
                indent(1),
                flag(props.remote_debugger)
            ),
            true,
        )?;
        self.element(2, "RemoteHost", &props.remote_host)?;
        self.element(2, "RemoteCommand", &props.remote_command)?;
        self.xml.write_line(&format!("{}</RemoteDebugger>", indent(1)), true)?;

        self.xml.write_line(
            &format!(
                r#"{}<PathTranslation on="{}">"#,
                indent(1),
                flag(props.path_translation)
            ),
            true,
        )?;
        self.element(2, "RemotePath", &props.remote_path)?;
        self.element(2, "LocalPath", &props.local_path)?;
        self.xml.write_line(&format!("{}</PathTranslation>", indent(1)), true)?;

        self.xml.write_line(
            &format!(
                r#"{}<ConsoleDebugger on="{}">{}</ConsoleDebugger>"#,
                indent(1),
                flag(props.console_debugger),
                escape_text(&props.console_command)
            ),
            true,
        )?;
        self.switch("Redirect", props.redirect)?;
        self.switch("Noencoding", props.no_encoding)?;
        self.xml.close_root(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_all_sections_in_order() {
        let props = DebuggerProperties {
            interpreter: "/usr/bin/python3".into(),
            debug_client: "client.py".into(),
            environment_override: true,
            environment: "A=1 B=<2>".into(),
            remote_debugger: true,
            remote_host: "build-box".into(),
            remote_command: "ssh build-box && run".into(),
            redirect: true,
            ..DebuggerProperties::default()
        };
        let config = ExportConfig::default().with_xml_timestamp(false);
        let mut writer = DebuggerPropertiesWriter::new(Vec::new(), "demo", &props, &config);
        writer.write_xml().unwrap();
        let output = String::from_utf8(writer.into_inner()).unwrap();

        let expected_body = [
            r#"<DebuggerProperties version="3.9">"#,
            "  <Interpreter>/usr/bin/python3</Interpreter>",
            "  <DebugClient>client.py</DebugClient>",
            r#"  <Environment override="1">A=1 B=&lt;2&gt;</Environment>"#,
            r#"  <RemoteDebugger on="1">"#,
            "    <RemoteHost>build-box</RemoteHost>",
            "    <RemoteCommand>ssh build-box &amp;&amp; run</RemoteCommand>",
            "  </RemoteDebugger>",
            r#"  <PathTranslation on="0">"#,
            "    <RemotePath></RemotePath>",
            "    <LocalPath></LocalPath>",
            "  </PathTranslation>",
            r#"  <ConsoleDebugger on="0"></ConsoleDebugger>"#,
            r#"  <Redirect on="1" />"#,
            r#"  <Noencoding on="0" />"#,
            "</DebuggerProperties>",
        ]
        .join("\n");
        assert!(output.ends_with(&expected_body), "{output}");
        assert!(output.contains("<!-- This file was generated automatically, do not edit. -->"));
        assert!(!output.contains("Saved:"));
    }
}
