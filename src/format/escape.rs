//! Character escaping for text content and attribute values.
//!
//! Markup characters are always replaced by entity references. Any other
//! character is replaced by a hexadecimal character reference (`&#xHH;`)
//! when the [`EscapeStrategy`] says the target encoding cannot carry it.

use std::borrow::Cow;
use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use encoding_rs::Encoding;

use crate::encoding::{can_encode, is_unicode_label, lookup, single_byte_limit};

/// Decides which characters need a numeric character reference for a
/// target encoding.
///
/// # Examples
///
/// ```
/// use xmloutput::format::EscapeStrategy;
///
/// assert!(!EscapeStrategy::for_encoding("UTF-8").should_escape('\u{263a}'));
/// assert!(EscapeStrategy::for_encoding("ISO-8859-1").should_escape('\u{263a}'));
/// assert!(!EscapeStrategy::for_encoding("ISO-8859-1").should_escape('\u{e9}'));
/// ```
#[derive(Clone)]
pub enum EscapeStrategy {
    /// UTF-8 and UTF-16 can carry every character: nothing is escaped.
    Unicode,
    /// 7-bit output: everything above U+007F is escaped.
    Ascii,
    /// 8-bit Latin-1 output: everything above U+00FF is escaped.
    Latin1,
    /// Escape whatever the `encoding_rs` encoder cannot map.
    Charset(&'static Encoding),
    /// A caller-supplied predicate.
    Custom(Arc<dyn Fn(char) -> bool + Send + Sync>),
}

impl EscapeStrategy {
    /// The default strategy for an encoding name.
    ///
    /// Labels `encoding_rs` does not know fall back to [`Self::Ascii`],
    /// which is safe in any ASCII-compatible encoding.
    #[must_use]
    pub fn for_encoding(name: &str) -> Self {
        if is_unicode_label(name) {
            return Self::Unicode;
        }
        match single_byte_limit(name) {
            Some(0x7F) => Self::Ascii,
            Some(_) => Self::Latin1,
            None => lookup(name).map_or(Self::Ascii, Self::Charset),
        }
    }

    /// Wraps a predicate as a strategy.
    pub fn custom(predicate: impl Fn(char) -> bool + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(predicate))
    }

    /// Returns `true` if `ch` must be written as a character reference.
    #[must_use]
    pub fn should_escape(&self, ch: char) -> bool {
        match self {
            Self::Unicode => false,
            Self::Ascii => u32::from(ch) > 0x7F,
            Self::Latin1 => u32::from(ch) > 0xFF,
            Self::Charset(encoding) => !can_encode(encoding, ch),
            Self::Custom(predicate) => predicate(ch),
        }
    }
}

impl fmt::Debug for EscapeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unicode => f.write_str("Unicode"),
            Self::Ascii => f.write_str("Ascii"),
            Self::Latin1 => f.write_str("Latin1"),
            Self::Charset(encoding) => f.debug_tuple("Charset").field(&encoding.name()).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Writes a hexadecimal character reference (`&#xHH;`) for a Unicode code point.
fn write_hex_char_ref(out: &mut String, ch: char) {
    let _ = write!(out, "&#x{:X};", u32::from(ch));
}

/// Escapes `s` with `replace`, copying only once the first replacement is
/// needed.
fn escape_with<'a>(
    s: &'a str,
    mut replace: impl FnMut(char, &mut String) -> bool,
) -> Cow<'a, str> {
    let mut scratch = String::new();
    for (i, ch) in s.char_indices() {
        if replace(ch, &mut scratch) {
            let mut out = String::with_capacity(s.len() + 16);
            out.push_str(&s[..i]);
            out.push_str(&scratch);
            for ch in s[i + ch.len_utf8()..].chars() {
                scratch.clear();
                if replace(ch, &mut scratch) {
                    out.push_str(&scratch);
                } else {
                    out.push(ch);
                }
            }
            return Cow::Owned(out);
        }
    }
    Cow::Borrowed(s)
}

/// Escapes character data.
///
/// - `<`, `>`, `&` become entity references
/// - `\r` becomes `&#xD;`
/// - `\n` becomes `eol` when given (the configured line separator)
/// - characters rejected by `strategy` become `&#xHH;`
///
/// # Examples
///
/// ```
/// use xmloutput::format::escape::escape_text;
/// use xmloutput::format::EscapeStrategy;
///
/// let s = escape_text("a < b & \u{e9}", &EscapeStrategy::Ascii, None);
/// assert_eq!(s, "a &lt; b &amp; &#xE9;");
/// ```
#[must_use]
pub fn escape_text<'a>(s: &'a str, strategy: &EscapeStrategy, eol: Option<&str>) -> Cow<'a, str> {
    escape_with(s, |ch, out| {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\r' => out.push_str("&#xD;"),
            '\n' => match eol {
                Some(eol) if eol != "\n" => out.push_str(eol),
                _ => return false,
            },
            c if strategy.should_escape(c) => write_hex_char_ref(out, c),
            _ => return false,
        }
        true
    })
}

/// Escapes an attribute value for use inside double quotes.
///
/// - `<`, `>`, `"`, `&` become entity references
/// - `\r`, `\t`, `\n` become `&#xD;`, `&#x9;`, `&#xA;` so that attribute
///   value normalization does not turn them into spaces
/// - characters rejected by `strategy` become `&#xHH;`
#[must_use]
pub fn escape_attribute<'a>(s: &'a str, strategy: &EscapeStrategy) -> Cow<'a, str> {
    escape_with(s, |ch, out| {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '\r' => out.push_str("&#xD;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            c if strategy.should_escape(c) => write_hex_char_ref(out, c),
            _ => return false,
        }
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_text_markup() {
        let s = escape_text("a < b & c > d", &EscapeStrategy::Unicode, None);
        assert_eq!(s, "a &lt; b &amp; c &gt; d");
    }

    #[test]
    fn test_escape_text_borrows_when_clean() {
        let s = escape_text("plain text", &EscapeStrategy::Unicode, Some("\r\n"));
        assert!(matches!(s, Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_text_newlines() {
        let strategy = EscapeStrategy::Unicode;
        assert_eq!(escape_text("a\nb", &strategy, None), "a\nb");
        assert_eq!(escape_text("a\nb", &strategy, Some("\r\n")), "a\r\nb");
        assert_eq!(escape_text("a\rb", &strategy, None), "a&#xD;b");
    }

    #[test]
    fn test_escape_text_does_not_touch_quotes() {
        let s = escape_text("\"quoted\" 'too'", &EscapeStrategy::Unicode, None);
        assert_eq!(s, "\"quoted\" 'too'");
    }

    #[test]
    fn test_escape_text_strategy() {
        let s = escape_text("caf\u{e9} \u{263a}", &EscapeStrategy::Latin1, None);
        assert_eq!(s, "caf\u{e9} &#x263A;");
        let s = escape_text("\u{1F600}", &EscapeStrategy::Ascii, None);
        assert_eq!(s, "&#x1F600;");
    }

    #[test]
    fn test_escape_attribute() {
        let s = escape_attribute("He said \"hi\" & <bye>\t\n\r", &EscapeStrategy::Unicode);
        assert_eq!(s, "He said &quot;hi&quot; &amp; &lt;bye&gt;&#x9;&#xA;&#xD;");
    }

    #[test]
    fn test_escape_is_idempotent_per_input() {
        let strategy = EscapeStrategy::for_encoding("US-ASCII");
        let a = escape_text("x & \u{e9}", &strategy, None).into_owned();
        let b = escape_text("x & \u{e9}", &strategy, None).into_owned();
        assert_eq!(a, b);
    }

    #[test]
    fn test_for_encoding() {
        assert!(matches!(EscapeStrategy::for_encoding("utf-8"), EscapeStrategy::Unicode));
        assert!(matches!(EscapeStrategy::for_encoding("ascii"), EscapeStrategy::Ascii));
        assert!(matches!(EscapeStrategy::for_encoding("Latin1"), EscapeStrategy::Latin1));
        assert!(matches!(
            EscapeStrategy::for_encoding("Shift_JIS"),
            EscapeStrategy::Charset(_)
        ));
        assert!(matches!(EscapeStrategy::for_encoding("bogus"), EscapeStrategy::Ascii));
    }

    #[test]
    fn test_charset_strategy() {
        let strategy = EscapeStrategy::for_encoding("Shift_JIS");
        assert!(!strategy.should_escape('\u{3042}'));
        assert!(strategy.should_escape('\u{e9}'));
    }

    #[test]
    fn test_custom_strategy() {
        let strategy = EscapeStrategy::custom(|c| c == 'x');
        assert_eq!(escape_text("axb", &strategy, None), "a&#x78;b");
        assert_eq!(format!("{strategy:?}"), "Custom(..)");
    }
}
