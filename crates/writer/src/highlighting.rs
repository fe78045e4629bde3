use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::base::{flag, indent, WriteXml, XmlWriter};
use crate::color::Color;
use crate::config::ExportConfig;
use crate::escape::{escape_attribute, escape_text};
use crate::kind::DocumentKind;

/// Read access to a lexer's style table, as provided by the lexer registry.
/// 由語法分析器註冊表提供的樣式存取介面。
pub trait Lexer {
    fn language(&self) -> &str;
    /// Style numbers in the order they should be exported.
    fn style_numbers(&self) -> Vec<u32>;
    fn color(&self, style: u32) -> Color;
    fn paper(&self, style: u32) -> Color;
    /// Font descriptor string, e.g. `"Monospace,10,-1,5,50,0,0,0,0,0"`.
    fn font(&self, style: u32) -> String;
    fn eol_fill(&self, style: u32) -> bool;
    fn description(&self, style: u32) -> String;
}

impl<T: Lexer + ?Sized> Lexer for &T {
    fn language(&self) -> &str {
        (**self).language()
    }

    fn style_numbers(&self) -> Vec<u32> {
        (**self).style_numbers()
    }

    fn color(&self, style: u32) -> Color {
        (**self).color(style)
    }

    fn paper(&self, style: u32) -> Color {
        (**self).paper(style)
    }

    fn font(&self, style: u32) -> String {
        (**self).font(style)
    }

    fn eol_fill(&self, style: u32) -> bool {
        (**self).eol_fill(style)
    }

    fn description(&self, style: u32) -> String {
        (**self).description(style)
    }
}

impl<T: Lexer + ?Sized> Lexer for Box<T> {
    fn language(&self) -> &str {
        (**self).language()
    }

    fn style_numbers(&self) -> Vec<u32> {
        (**self).style_numbers()
    }

    fn color(&self, style: u32) -> Color {
        (**self).color(style)
    }

    fn paper(&self, style: u32) -> Color {
        (**self).paper(style)
    }

    fn font(&self, style: u32) -> String {
        (**self).font(style)
    }

    fn eol_fill(&self, style: u32) -> bool {
        (**self).eol_fill(style)
    }

    fn description(&self, style: u32) -> String {
        (**self).description(style)
    }
}

fn default_paper() -> Color {
    Color::WHITE
}

/// One style entry of a [`LexerStyles`] table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDefinition {
    pub style: u32,
    pub color: Color,
    #[serde(default = "default_paper")]
    pub paper: Color,
    #[serde(default)]
    pub font: String,
    #[serde(default)]
    pub eol_fill: bool,
    #[serde(default)]
    pub description: String,
}

/// Snapshot of one lexer's styles, typically loaded from a JSON dump of the
/// registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexerStyles {
    pub language: String,
    #[serde(default)]
    pub styles: Vec<StyleDefinition>,
}

impl LexerStyles {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            styles: Vec::new(),
        }
    }

    pub fn with_style(mut self, style: StyleDefinition) -> Self {
        self.styles.push(style);
        self
    }

    fn style(&self, style: u32) -> Option<&StyleDefinition> {
        self.styles.iter().find(|entry| entry.style == style)
    }
}

impl Lexer for LexerStyles {
    fn language(&self) -> &str {
        &self.language
    }

    fn style_numbers(&self) -> Vec<u32> {
        self.styles.iter().map(|entry| entry.style).collect()
    }

    fn color(&self, style: u32) -> Color {
        self.style(style).map_or(Color::BLACK, |entry| entry.color)
    }

    fn paper(&self, style: u32) -> Color {
        self.style(style).map_or(Color::WHITE, |entry| entry.paper)
    }

    fn font(&self, style: u32) -> String {
        self.style(style)
            .map(|entry| entry.font.clone())
            .unwrap_or_default()
    }

    fn eol_fill(&self, style: u32) -> bool {
        self.style(style).is_some_and(|entry| entry.eol_fill)
    }

    fn description(&self, style: u32) -> String {
        self.style(style)
            .map(|entry| entry.description.clone())
            .unwrap_or_default()
    }
}

/// Writes a `HighlightingStyles` document.
pub struct HighlightingStylesWriter<'a, W: Write, L: Lexer> {
    xml: XmlWriter<W>,
    lexers: &'a [L],
    config: &'a ExportConfig,
}

impl<'a, W: Write, L: Lexer> HighlightingStylesWriter<'a, W, L> {
    pub fn new(sink: W, lexers: &'a [L], config: &'a ExportConfig) -> Self {
        Self {
            xml: XmlWriter::new(sink),
            lexers,
            config,
        }
    }

    pub fn into_inner(self) -> W {
        self.xml.into_inner()
    }

    fn write_lexer(&mut self, lexer: &L) -> io::Result<()> {
        self.xml.write_line(
            &format!(
                r#"{}<Lexer name="{}">"#,
                indent(1),
                escape_attribute(lexer.language())
            ),
            true,
        )?;
        for style in lexer.style_numbers() {
            let line = format!(
                r#"{}<Style style="{}" color="{}" paper="{}" font="{}" eolfill="{}">{}</Style>"#,
                indent(2),
                style,
                lexer.color(style).name(),
                lexer.paper(style).name(),
                escape_attribute(&lexer.font(style)),
                flag(lexer.eol_fill(style)),
                escape_text(&lexer.description(style)),
            );
            self.xml.write_line(&line, true)?;
        }
        self.xml.write_line(&format!("{}</Lexer>", indent(1)), true)
    }
}

impl<W: Write, L: Lexer> WriteXml for HighlightingStylesWriter<'_, W, L> {
    fn write_xml(&mut self) -> io::Result<()> {
        let kind = DocumentKind::HighlightingStyles;
        let version = self.config.version(kind);
        debug!(%kind, version, lexers = self.lexers.len(), "writing highlighting styles");

        self.xml.write_prolog(kind, version)?;
        self.xml.write_comment(&format!(
            "{} highlighting styles",
            escape_text(&self.config.application)
        ))?;
        self.xml.write_saved_comment(self.config.timestamp())?;
        self.xml.write_author_comment(&self.config.user_email)?;

        self.xml.open_root(kind, version)?;
        for lexer in self.lexers {
            self.write_lexer(lexer)?;
        }
        self.xml.close_root(kind)
    }
}
