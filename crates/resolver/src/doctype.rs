use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DoctypeError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read document prolog: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed DOCTYPE declaration: {0}")]
    Malformed(String),
}

/// The external identifiers of a `<!DOCTYPE ...>` declaration.
/// `DOCTYPE` 宣告中的外部識別碼。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctype {
    pub root: String,
    pub public_id: Option<String>,
    pub system_id: Option<String>,
}

impl Doctype {
    /// Parses the text between `<!DOCTYPE` and the closing `>`.
    pub fn parse(declaration: &str) -> Result<Self, DoctypeError> {
        let tokens = tokenize(declaration)?;
        let mut tokens = tokens.into_iter();

        let root = match tokens.next() {
            Some(Token::Name(name)) => name,
            _ => return Err(DoctypeError::Malformed("missing root element name".into())),
        };

        let (public_id, system_id) = match tokens.next() {
            None => (None, None),
            Some(Token::Name(keyword)) if keyword == "SYSTEM" => match tokens.next() {
                Some(Token::Literal(system)) => (None, Some(system)),
                _ => {
                    return Err(DoctypeError::Malformed(
                        "SYSTEM requires a quoted identifier".into(),
                    ))
                }
            },
            Some(Token::Name(keyword)) if keyword == "PUBLIC" => {
                let public = match tokens.next() {
                    Some(Token::Literal(public)) => public,
                    _ => {
                        return Err(DoctypeError::Malformed(
                            "PUBLIC requires a quoted identifier".into(),
                        ))
                    }
                };
                match tokens.next() {
                    Some(Token::Literal(system)) => (Some(public), Some(system)),
                    None => (Some(public), None),
                    Some(Token::Name(other)) => {
                        return Err(DoctypeError::Malformed(format!(
                            "unexpected `{other}` after public identifier"
                        )))
                    }
                }
            }
            Some(Token::Name(other)) => {
                return Err(DoctypeError::Malformed(format!(
                    "unexpected `{other}` after root element name"
                )))
            }
            Some(Token::Literal(literal)) => {
                return Err(DoctypeError::Malformed(format!(
                    "unexpected literal \"{literal}\" after root element name"
                )))
            }
        };

        Ok(Self {
            root,
            public_id,
            system_id,
        })
    }
}

/// Reads the prolog of a document and returns its `DOCTYPE`, if any.
///
/// Reading stops at the first element, so only the prolog is consumed.
/// A `None` result means the document does not ask for validation.
pub fn read_doctype<R: BufRead>(input: R) -> Result<Option<Doctype>, DoctypeError> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::DocType(text) => {
                let declaration = String::from_utf8_lossy(&text);
                return Doctype::parse(&declaration).map(Some);
            }
            Event::Start(_) | Event::Empty(_) | Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

pub fn read_doctype_from_path(path: impl AsRef<Path>) -> Result<Option<Doctype>, DoctypeError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DoctypeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_doctype(BufReader::new(file))
}

enum Token {
    Name(String),
    Literal(String),
}

/// Splits the external id into names and quoted literals. An unquoted `[`
/// opens the internal subset, which ends tokenizing.
fn tokenize(input: &str) -> Result<Vec<Token>, DoctypeError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    while let Some((start, ch)) = chars.next() {
        if ch.is_whitespace() {
            continue;
        }
        if ch == '[' {
            break;
        }
        if ch == '"' || ch == '\'' {
            let body_start = start + ch.len_utf8();
            let end = input[body_start..]
                .find(ch)
                .map(|offset| body_start + offset)
                .ok_or_else(|| DoctypeError::Malformed("unterminated literal".into()))?;
            tokens.push(Token::Literal(input[body_start..end].to_string()));
            while chars.peek().is_some_and(|(idx, _)| *idx <= end) {
                chars.next();
            }
            continue;
        }
        let mut end = start + ch.len_utf8();
        while let Some((idx, next)) = chars.peek().copied() {
            if next.is_whitespace() || matches!(next, '"' | '\'' | '[') {
                break;
            }
            end = idx + next.len_utf8();
            chars.next();
        }
        tokens.push(Token::Name(input[start..end].to_string()));
    }
    Ok(tokens)
}
