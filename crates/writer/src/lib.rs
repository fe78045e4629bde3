//! Versioned XML export of editor settings.
//! 將編輯器設定匯出為具版本的 XML 文件。
//!
//! Every document starts with the XML declaration and a `DOCTYPE` naming
//! `Kind-<version>.dtd`, carries a few generation comments, holds exactly one
//! root element named after its [`DocumentKind`] and ends right after the
//! closing root tag.

mod base;
mod basics;
mod color;
mod config;
mod escape;
mod kind;

pub mod debugger;
pub mod highlighting;
pub mod shortcuts;
pub mod templates;
pub mod user_project;

pub use base::{WriteXml, XmlWriter, LINE_TERMINATOR, XML_DECLARATION};
pub use basics::BasicValue;
pub use color::{Color, ColorParseError};
pub use config::{ExportConfig, DEFAULT_APPLICATION};
pub use debugger::{DebuggerProperties, DebuggerPropertiesWriter};
pub use escape::{encode_newlines, escape, escape_attribute, escape_text, EscapeMode};
pub use highlighting::{HighlightingStylesWriter, Lexer, LexerStyles, StyleDefinition};
pub use kind::{DocumentKind, FormatVersions};
pub use shortcuts::{Shortcut, ShortcutsWriter};
pub use templates::{
    TemplateDefinition, TemplateEntry, TemplateGroup, TemplateGroupDefinition, TemplateTree,
    TemplatesWriter,
};
pub use user_project::{ProjectInfo, UserProjectOverrides, UserProjectWriter};
