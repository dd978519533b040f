//! Output encoding support.
//!
//! Resolves the encoding named in a [`Format`](crate::format::Format) to an
//! `encoding_rs` encoding, answers "can this character be written as-is"
//! for the escape strategy, and transcodes the formatted character stream
//! into bytes.
//!
//! `encoding_rs` has no UTF-16 encoders (its UTF-16 encodings report UTF-8 as
//! their output encoding), so UTF-16LE and UTF-16BE are produced here
//! directly from `str::encode_utf16`.

use std::fmt;
use std::io::{self, Write};

use encoding_rs::{EncoderResult, Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// An error that occurs when resolving an output encoding.
#[derive(Debug, Clone)]
pub struct EncodingError {
    /// A human-readable description of the encoding error.
    pub message: String,
}

impl EncodingError {
    /// Creates a new `EncodingError` with the given message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "encoding error: {}", self.message)
    }
}

impl std::error::Error for EncodingError {}

/// Looks up an encoding by its IANA label (case-insensitive).
///
/// # Errors
///
/// Returns `EncodingError` if `encoding_rs` does not know the label.
///
/// # Examples
///
/// ```
/// use xmloutput::encoding::lookup;
///
/// assert_eq!(lookup("latin1").unwrap().name(), "windows-1252");
/// assert!(lookup("NOT-AN-ENCODING").is_err());
/// ```
pub fn lookup(label: &str) -> Result<&'static Encoding, EncodingError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| EncodingError::new(format!("unsupported encoding: {label}")))
}

/// Returns `true` if the label names UTF-8 or one of the UTF-16 forms,
/// i.e. an encoding that can represent every character.
#[must_use]
pub fn is_unicode_label(label: &str) -> bool {
    matches!(
        label.trim().to_ascii_uppercase().as_str(),
        "UTF-8" | "UTF8" | "UTF-16" | "UTF16" | "UTF-16LE" | "UTF-16BE"
    )
}

/// The highest code point of the single-byte encodings that `encoding_rs`
/// would otherwise resolve to windows-1252: 0x7F for US-ASCII, 0xFF for
/// ISO-8859-1.
#[must_use]
pub fn single_byte_limit(label: &str) -> Option<u32> {
    match label.trim().to_ascii_uppercase().as_str() {
        "US-ASCII" | "ASCII" => Some(0x7F),
        "ISO-8859-1" | "ISO8859-1" | "ISO8859_1" | "ISO-LATIN-1" | "LATIN1" | "L1" => Some(0xFF),
        _ => None,
    }
}

/// Returns `true` if `encoding` can represent `ch` without a character
/// reference.
#[must_use]
pub fn can_encode(encoding: &'static Encoding, ch: char) -> bool {
    if encoding == UTF_8 || encoding == UTF_16LE || encoding == UTF_16BE {
        return true;
    }
    let mut encoder = encoding.new_encoder();
    let mut src = [0u8; 4];
    // Large enough for one character plus any ISO-2022-JP escape sequences.
    let mut dst = [0u8; 16];
    let (result, _, _) =
        encoder.encode_from_utf8_without_replacement(ch.encode_utf8(&mut src), &mut dst, true);
    !matches!(result, EncoderResult::Unmappable(_))
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Utf8,
    Utf16 { big_endian: bool },
    SingleByte { max: u32 },
    Legacy(&'static Encoding),
}

/// Writes a character stream to an `io::Write` in a given encoding.
///
/// Characters the encoding cannot represent are written as decimal
/// numeric character references (`&#NNNN;`), so the output always stays
/// well-formed.
///
/// # Examples
///
/// ```
/// use xmloutput::encoding::EncodedWriter;
///
/// let mut out = EncodedWriter::new(Vec::new(), "ISO-8859-1").unwrap();
/// out.write_str("caf\u{e9} \u{263a}").unwrap();
/// assert_eq!(out.into_inner(), b"caf\xE9 &#9786;".to_vec());
/// ```
#[derive(Debug)]
pub struct EncodedWriter<W: Write> {
    inner: W,
    target: Target,
}

impl<W: Write> EncodedWriter<W> {
    /// Creates a writer that encodes into the encoding named by `label`.
    ///
    /// US-ASCII and ISO-8859-1 are written byte for byte, with character
    /// references above their range.
    ///
    /// # Errors
    ///
    /// Returns `EncodingError` if the label is unknown.
    pub fn new(inner: W, label: &str) -> Result<Self, EncodingError> {
        if let Some(max) = single_byte_limit(label) {
            return Ok(Self {
                inner,
                target: Target::SingleByte { max },
            });
        }
        let encoding = lookup(label)?;
        let target = if encoding == UTF_8 {
            Target::Utf8
        } else if encoding == UTF_16LE {
            Target::Utf16 { big_endian: false }
        } else if encoding == UTF_16BE {
            Target::Utf16 { big_endian: true }
        } else {
            Target::Legacy(encoding.output_encoding())
        };
        Ok(Self { inner, target })
    }

    /// Encodes and writes a string.
    ///
    /// # Errors
    ///
    /// Returns any error of the underlying writer.
    pub fn write_str(&mut self, s: &str) -> io::Result<()> {
        match self.target {
            Target::Utf8 => self.inner.write_all(s.as_bytes()),
            Target::Utf16 { big_endian } => {
                let mut buf = Vec::with_capacity(s.len() * 2);
                for unit in s.encode_utf16() {
                    if big_endian {
                        buf.extend_from_slice(&unit.to_be_bytes());
                    } else {
                        buf.extend_from_slice(&unit.to_le_bytes());
                    }
                }
                self.inner.write_all(&buf)
            }
            Target::SingleByte { max } => {
                let mut buf = Vec::with_capacity(s.len());
                for ch in s.chars() {
                    let code = u32::from(ch);
                    match u8::try_from(code) {
                        Ok(byte) if code <= max => buf.push(byte),
                        _ => buf.extend_from_slice(format!("&#{code};").as_bytes()),
                    }
                }
                self.inner.write_all(&buf)
            }
            Target::Legacy(encoding) => {
                let (bytes, _, _) = encoding.encode(s);
                self.inner.write_all(&bytes)
            }
        }
    }

    /// Flushes the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns any error of the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lookup_known_labels() {
        assert_eq!(lookup("UTF-8").unwrap().name(), "UTF-8");
        assert_eq!(lookup("utf-16be").unwrap().name(), "UTF-16BE");
        assert_eq!(lookup(" Shift_JIS ").unwrap().name(), "Shift_JIS");
    }

    #[test]
    fn test_lookup_unknown_label() {
        let err = lookup("UNKNOWN-ENCODING-42").unwrap_err();
        assert!(err.message.contains("unsupported encoding"));
        assert_eq!(
            err.to_string(),
            "encoding error: unsupported encoding: UNKNOWN-ENCODING-42"
        );
    }

    #[test]
    fn test_is_unicode_label() {
        assert!(is_unicode_label("utf-8"));
        assert!(is_unicode_label("UTF-16"));
        assert!(!is_unicode_label("ISO-8859-1"));
    }

    #[test]
    fn test_can_encode() {
        let latin1 = lookup("ISO-8859-1").unwrap();
        assert!(can_encode(latin1, 'e'));
        assert!(can_encode(latin1, '\u{e9}'));
        assert!(!can_encode(latin1, '\u{263a}'));
        assert!(can_encode(UTF_8, '\u{1F600}'));
    }

    #[test]
    fn test_write_utf8() {
        let mut out = EncodedWriter::new(Vec::new(), "UTF-8").unwrap();
        out.write_str("h\u{e9}").unwrap();
        assert_eq!(out.into_inner(), "h\u{e9}".as_bytes().to_vec());
    }

    #[test]
    fn test_write_utf16be() {
        let mut out = EncodedWriter::new(Vec::new(), "UTF-16BE").unwrap();
        out.write_str("<a").unwrap();
        assert_eq!(out.into_inner(), vec![0x00, b'<', 0x00, b'a']);
    }

    #[test]
    fn test_write_utf16le() {
        let mut out = EncodedWriter::new(Vec::new(), "UTF-16LE").unwrap();
        out.write_str("<").unwrap();
        assert_eq!(out.into_inner(), vec![b'<', 0x00]);
    }

    #[test]
    fn test_write_unmappable_becomes_reference() {
        let mut out = EncodedWriter::new(Vec::new(), "windows-1252").unwrap();
        out.write_str("\u{4e2d}").unwrap();
        assert_eq!(out.into_inner(), b"&#20013;".to_vec());
    }

    #[test]
    fn test_single_byte_labels() {
        assert_eq!(single_byte_limit("us-ascii"), Some(0x7F));
        assert_eq!(single_byte_limit("ISO-8859-1"), Some(0xFF));
        assert_eq!(single_byte_limit("windows-1252"), None);
    }

    #[test]
    fn test_write_ascii_never_emits_high_bytes() {
        let mut out = EncodedWriter::new(Vec::new(), "US-ASCII").unwrap();
        out.write_str("<!--caf\u{e9}-->").unwrap();
        assert_eq!(out.into_inner(), b"<!--caf&#233;-->".to_vec());
    }

    #[test]
    fn test_write_latin1_is_not_windows_1252() {
        let mut out = EncodedWriter::new(Vec::new(), "ISO-8859-1").unwrap();
        out.write_str("\u{80}\u{e9}\u{20ac}").unwrap();
        assert_eq!(out.into_inner(), b"\x80\xE9&#8364;".to_vec());
    }

    #[test]
    fn test_encoding_error_is_error_trait() {
        let err = EncodingError::new("test");
        let _: &dyn std::error::Error = &err;
    }
}
