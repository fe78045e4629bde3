use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::base::{indent, XmlWriter};
use crate::escape::escape_text;

/// Loosely typed value embedded in project documents (VCS options,
/// packager parameters and similar free-form data).
/// 專案文件中內嵌的基本型別資料。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BasicValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<BasicValue>),
    /// Keys are written in sorted order.
    Dict(BTreeMap<String, BasicValue>),
}

impl From<bool> for BasicValue {
    fn from(value: bool) -> Self {
        BasicValue::Bool(value)
    }
}

impl From<i64> for BasicValue {
    fn from(value: i64) -> Self {
        BasicValue::Int(value)
    }
}

impl From<f64> for BasicValue {
    fn from(value: f64) -> Self {
        BasicValue::Float(value)
    }
}

impl From<&str> for BasicValue {
    fn from(value: &str) -> Self {
        BasicValue::String(value.to_string())
    }
}

impl From<String> for BasicValue {
    fn from(value: String) -> Self {
        BasicValue::String(value)
    }
}

impl<T: Into<BasicValue>> From<Vec<T>> for BasicValue {
    fn from(values: Vec<T>) -> Self {
        BasicValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<W: Write> XmlWriter<W> {
    /// Writes `value` as nested `<none />`, `<bool>`, `<int>`, `<float>`,
    /// `<string>`, `<list>` and `<dict>` elements starting at `level`.
    pub fn write_basics(&mut self, value: &BasicValue, level: usize) -> io::Result<()> {
        let pad = indent(level);
        match value {
            BasicValue::None => self.write_line(&format!("{pad}<none />"), true),
            BasicValue::Bool(flag) => {
                let text = if *flag { "True" } else { "False" };
                self.write_line(&format!("{pad}<bool>{text}</bool>"), true)
            }
            BasicValue::Int(number) => self.write_line(&format!("{pad}<int>{number}</int>"), true),
            BasicValue::Float(number) => {
                self.write_line(&format!("{pad}<float>{number:?}</float>"), true)
            }
            BasicValue::String(text) => self.write_line(
                &format!("{pad}<string>{}</string>", escape_text(text)),
                true,
            ),
            BasicValue::List(items) => {
                self.write_line(&format!("{pad}<list>"), true)?;
                for item in items {
                    self.write_basics(item, level + 1)?;
                }
                self.write_line(&format!("{pad}</list>"), true)
            }
            BasicValue::Dict(entries) => {
                let entry_pad = indent(level + 1);
                self.write_line(&format!("{pad}<dict>"), true)?;
                for (key, item) in entries {
                    self.write_line(&format!("{entry_pad}<key>"), true)?;
                    self.write_basics(&BasicValue::String(key.clone()), level + 2)?;
                    self.write_line(&format!("{entry_pad}</key>"), true)?;
                    self.write_line(&format!("{entry_pad}<value>"), true)?;
                    self.write_basics(item, level + 2)?;
                    self.write_line(&format!("{entry_pad}</value>"), true)?;
                }
                self.write_line(&format!("{pad}</dict>"), true)
            }
        }
    }
}
