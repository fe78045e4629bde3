use std::io::{self, Write};

use chrono::NaiveDateTime;

use crate::escape::{escape_attribute, escape_text};
use crate::kind::DocumentKind;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
pub const LINE_TERMINATOR: &str = "\n";

const SAVED_FORMAT: &str = "%Y-%m-%d, %H:%M:%S";

/// Implemented by every concrete document writer.
pub trait WriteXml {
    /// Emits the complete document into the writer's sink.
    fn write_xml(&mut self) -> io::Result<()>;
}

/// Line oriented output shared by the concrete writers.
///
/// The writer never flushes or closes the sink and never retries: any error
/// raised by the sink is returned unchanged, leaving the target in whatever
/// state the failed write produced.
/// 寫入器不會自行 flush 或關閉輸出，錯誤原樣回傳。
#[derive(Debug)]
pub struct XmlWriter<W: Write> {
    sink: W,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Appends `text` verbatim. Escaping is the caller's job.
    pub fn write_line(&mut self, text: &str, newline: bool) -> io::Result<()> {
        self.sink.write_all(text.as_bytes())?;
        if newline {
            self.sink.write_all(LINE_TERMINATOR.as_bytes())?;
        }
        Ok(())
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        self.write_line(XML_DECLARATION, true)
    }

    pub fn write_doctype(&mut self, kind: DocumentKind, version: &str) -> io::Result<()> {
        let line = format!(
            r#"<!DOCTYPE {} SYSTEM "{}">"#,
            kind.root_name(),
            kind.dtd_file_name(version)
        );
        self.write_line(&line, true)
    }

    /// Writes `<!-- text -->`. `text` must already be escaped; runs of `--`
    /// are split so the comment stays well-formed.
    pub fn write_comment(&mut self, text: &str) -> io::Result<()> {
        let mut body = text.to_string();
        while body.contains("--") {
            body = body.replace("--", "- -");
        }
        self.write_line(&format!("<!-- {body} -->"), true)
    }

    pub fn write_saved_comment(&mut self, saved_at: NaiveDateTime) -> io::Result<()> {
        self.write_comment(&format!("Saved: {}", saved_at.format(SAVED_FORMAT)))
    }

    pub fn write_author_comment(&mut self, email: &str) -> io::Result<()> {
        self.write_comment(&format!("Author: {}", escape_text(email)))
    }

    pub fn open_root(&mut self, kind: DocumentKind, version: &str) -> io::Result<()> {
        let line = format!(
            r#"<{} version="{}">"#,
            kind.root_name(),
            escape_attribute(version)
        );
        self.write_line(&line, true)
    }

    /// Closes the root element. Documents end here without a line terminator.
    pub fn close_root(&mut self, kind: DocumentKind) -> io::Result<()> {
        self.write_line(&format!("</{}>", kind.root_name()), false)
    }

    /// Writes the declaration and `DOCTYPE` that open every document.
    pub fn write_prolog(&mut self, kind: DocumentKind, version: &str) -> io::Result<()> {
        self.write_header()?;
        self.write_doctype(kind, version)
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

pub(crate) fn indent(level: usize) -> String {
    "  ".repeat(level)
}

pub(crate) fn flag(value: bool) -> u8 {
    u8::from(value)
}
