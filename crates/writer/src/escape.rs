use std::borrow::Cow;

/// Context the escaped text is written into.
/// 跳脫後文字所寫入的位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeMode {
    /// Element content. Only `&`, `<` and `>` are replaced.
    #[default]
    Text,
    /// Double-quoted attribute value. Quotes and the whitespace characters
    /// that attribute normalisation would fold into spaces are replaced too.
    Attribute,
}

const PARAGRAPH_SEPARATOR: char = '\u{2029}';
const LINE_SEPARATOR: char = '\u{2028}';

/// Replaces XML metacharacters with entity references.
///
/// The function is not idempotent: `&amp;` becomes `&amp;amp;` on a second
/// pass. Callers escape raw model text exactly once.
pub fn escape(data: &str, mode: EscapeMode) -> Cow<'_, str> {
    if !data.chars().any(|ch| needs_escape(ch, mode)) {
        return Cow::Borrowed(data);
    }

    let mut escaped = String::with_capacity(data.len() + 16);
    for ch in data.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if mode == EscapeMode::Attribute => escaped.push_str("&quot;"),
            '\n' if mode == EscapeMode::Attribute => escaped.push_str("&#10;"),
            '\r' if mode == EscapeMode::Attribute => escaped.push_str("&#13;"),
            '\t' if mode == EscapeMode::Attribute => escaped.push_str("&#9;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Shorthand for [`escape`] in [`EscapeMode::Text`].
pub fn escape_text(data: &str) -> Cow<'_, str> {
    escape(data, EscapeMode::Text)
}

/// Shorthand for [`escape`] in [`EscapeMode::Attribute`].
pub fn escape_attribute(data: &str) -> Cow<'_, str> {
    escape(data, EscapeMode::Attribute)
}

/// Folds line breaks into the Unicode separators so multi-line text fits on
/// one physical line: `"\n\n"` becomes U+2029 and any remaining `"\n"` U+2028.
/// 將換行折疊為 Unicode 分隔字元。
pub fn encode_newlines(text: &str) -> String {
    text.replace("\n\n", &PARAGRAPH_SEPARATOR.to_string())
        .replace('\n', &LINE_SEPARATOR.to_string())
}

fn needs_escape(ch: char, mode: EscapeMode) -> bool {
    match ch {
        '&' | '<' | '>' => true,
        '"' | '\n' | '\r' | '\t' => mode == EscapeMode::Attribute,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_mode_leaves_quotes_alone() {
        assert_eq!(
            escape_text(r#"a < b && "c" > d"#),
            r#"a &lt; b &amp;&amp; "c" &gt; d"#
        );
    }

    #[test]
    fn attribute_mode_escapes_quotes_and_line_breaks() {
        assert_eq!(
            escape_attribute("say \"hi\"\n\tthere"),
            "say &quot;hi&quot;&#10;&#9;there"
        );
    }

    #[test]
    fn clean_input_is_borrowed() {
        assert!(matches!(escape_text("plain text"), Cow::Borrowed(_)));
        assert!(matches!(escape_attribute("it's fine"), Cow::Borrowed(_)));
    }

    #[test]
    fn escaping_twice_double_escapes() {
        let once = escape_text("Tom & Jerry");
        let twice = escape_text(&once);
        assert_eq!(once, "Tom &amp; Jerry");
        assert_eq!(twice, "Tom &amp;amp; Jerry");
        assert_ne!(once, twice);
    }

    #[test]
    fn newlines_fold_into_separators() {
        assert_eq!(
            encode_newlines("one\n\ntwo\nthree"),
            "one\u{2029}two\u{2028}three"
        );
    }
}
