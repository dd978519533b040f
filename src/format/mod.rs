//! Output format configuration.
//!
//! A [`Format`] is built once by the caller and only read while formatting,
//! so one value can be shared by any number of concurrent calls. The subset
//! of settings that may change while descending the tree lives in the
//! per-call [`FormatStack`].

pub mod escape;
pub mod stack;

pub use escape::EscapeStrategy;
pub use stack::FormatStack;

/// Text content whitespace policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextMode {
    /// Output content exactly as it is in the tree. No trimming, no
    /// indentation.
    #[default]
    Preserve,
    /// Strip leading XML whitespace from each text run.
    TrimLeft,
    /// Strip trailing XML whitespace from each text run.
    TrimRight,
    /// Strip XML whitespace from both ends of each text run.
    TrimBoth,
    /// Trim both ends and collapse inner whitespace runs to one space.
    Compact,
    /// Keep text unchanged but drop runs that are only whitespace, so
    /// indentation can be applied around elements.
    None,
}

/// Options controlling XML output.
///
/// # Examples
///
/// ```
/// use xmloutput::format::{Format, TextMode};
///
/// let format = Format::pretty().indent(Some("\t")).expand_empty_elements(true);
/// assert_eq!(format.text_mode, TextMode::TrimBoth);
/// assert_eq!(format.indent.as_deref(), Some("\t"));
/// ```
#[derive(Debug, Clone)]
pub struct Format {
    /// Output encoding name, used in the declaration and to pick the
    /// escape strategy. Defaults to `"UTF-8"`.
    pub encoding: String,
    /// String written after the declaration and at each padded boundary.
    /// Defaults to `"\n"`.
    pub line_separator: String,
    /// String repeated once per nesting level; `None` disables pretty
    /// printing.
    pub indent: Option<String>,
    /// Default whitespace policy for text content.
    pub text_mode: TextMode,
    /// Suppress the `<?xml ...?>` declaration.
    pub omit_declaration: bool,
    /// Suppress the `encoding` pseudo-attribute of the declaration.
    pub omit_encoding: bool,
    /// Write `<a></a>` instead of `<a/>` for elements without content.
    pub expand_empty_elements: bool,
    /// Master switch for escaping text and attribute values.
    pub escape_output: bool,
    /// Explicit escape strategy; derived from `encoding` when `None`.
    pub escape_strategy: Option<EscapeStrategy>,
    /// Write `javax.xml.transform.*-output-escaping` processing
    /// instructions literally instead of treating them as escape toggles.
    pub ignore_trax_escaping_pis: bool,
    /// Write attributes sorted by qualified name.
    pub sort_attributes: bool,
}

impl Default for Format {
    fn default() -> Self {
        Self::raw()
    }
}

impl Format {
    /// Output that reproduces the tree as-is: [`TextMode::Preserve`], no
    /// indentation.
    #[must_use]
    pub fn raw() -> Self {
        Self {
            encoding: "UTF-8".to_string(),
            line_separator: "\n".to_string(),
            indent: None,
            text_mode: TextMode::Preserve,
            omit_declaration: false,
            omit_encoding: false,
            expand_empty_elements: false,
            escape_output: true,
            escape_strategy: None,
            ignore_trax_escaping_pis: false,
            sort_attributes: false,
        }
    }

    /// Indented output: two spaces per level, text trimmed at both ends.
    #[must_use]
    pub fn pretty() -> Self {
        Self {
            indent: Some("  ".to_string()),
            text_mode: TextMode::TrimBoth,
            ..Self::raw()
        }
    }

    /// Whitespace-normalized output without indentation.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            text_mode: TextMode::Compact,
            ..Self::raw()
        }
    }

    /// Sets the output encoding name.
    #[must_use]
    pub fn encoding(mut self, encoding: &str) -> Self {
        self.encoding = encoding.to_string();
        self
    }

    /// Sets the line separator.
    #[must_use]
    pub fn line_separator(mut self, separator: &str) -> Self {
        self.line_separator = separator.to_string();
        self
    }

    /// Sets the per-level indent; `None` disables pretty printing.
    #[must_use]
    pub fn indent(mut self, indent: Option<&str>) -> Self {
        self.indent = indent.map(str::to_string);
        self
    }

    /// Sets the default text mode.
    #[must_use]
    pub fn text_mode(mut self, mode: TextMode) -> Self {
        self.text_mode = mode;
        self
    }

    /// Enables or disables the XML declaration.
    #[must_use]
    pub fn omit_declaration(mut self, omit: bool) -> Self {
        self.omit_declaration = omit;
        self
    }

    /// Enables or disables the encoding in the XML declaration.
    #[must_use]
    pub fn omit_encoding(mut self, omit: bool) -> Self {
        self.omit_encoding = omit;
        self
    }

    /// Chooses between `<a/>` (false) and `<a></a>` (true).
    #[must_use]
    pub fn expand_empty_elements(mut self, expand: bool) -> Self {
        self.expand_empty_elements = expand;
        self
    }

    /// Enables or disables escaping of text and attribute values.
    #[must_use]
    pub fn escape_output(mut self, escape: bool) -> Self {
        self.escape_output = escape;
        self
    }

    /// Sets an explicit escape strategy.
    #[must_use]
    pub fn escape_strategy(mut self, strategy: EscapeStrategy) -> Self {
        self.escape_strategy = Some(strategy);
        self
    }

    /// Chooses whether TrAX escaping processing instructions are written
    /// literally (true) or act as escape toggles (false).
    #[must_use]
    pub fn ignore_trax_escaping_pis(mut self, ignore: bool) -> Self {
        self.ignore_trax_escaping_pis = ignore;
        self
    }

    /// Enables or disables sorting attributes by qualified name.
    #[must_use]
    pub fn sort_attributes(mut self, sort: bool) -> Self {
        self.sort_attributes = sort;
        self
    }

    /// The escape strategy in effect: the explicit one, or the default for
    /// the configured encoding.
    #[must_use]
    pub fn resolved_escape_strategy(&self) -> EscapeStrategy {
        self.escape_strategy
            .clone()
            .unwrap_or_else(|| EscapeStrategy::for_encoding(&self.encoding))
    }
}
