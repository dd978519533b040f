//! Per-depth formatting state.
//!
//! A [`FormatStack`] is created for each outputter call. The driver pushes a
//! level when it enters an element's content and pops it when it leaves, so
//! [`depth`](FormatStack::depth) always equals the current element nesting.
//! Only the text mode (via `xml:space`) and the escape-output bit (via the
//! TrAX processing instructions) vary per level; everything else is read
//! straight from the [`Format`].

use super::{EscapeStrategy, Format, TextMode};

#[derive(Debug, Clone, Copy)]
struct Level {
    text_mode: TextMode,
    escape_output: bool,
}

/// Stack of per-level formatting state over a shared [`Format`].
///
/// # Examples
///
/// ```
/// use xmloutput::format::{Format, FormatStack, TextMode};
///
/// let format = Format::pretty();
/// let mut stack = FormatStack::new(&format);
/// stack.push();
/// assert_eq!(stack.pad_between().as_deref(), Some("\n  "));
/// assert_eq!(stack.pad_last().as_deref(), Some("\n"));
/// stack.set_text_mode(TextMode::Preserve);
/// assert_eq!(stack.pad_between(), None);
/// stack.pop();
/// assert_eq!(stack.text_mode(), TextMode::TrimBoth);
/// ```
#[derive(Debug)]
pub struct FormatStack<'f> {
    format: &'f Format,
    strategy: Option<EscapeStrategy>,
    levels: Vec<Level>,
}

impl<'f> FormatStack<'f> {
    /// Creates a stack at depth 0 with the format's defaults.
    #[must_use]
    pub fn new(format: &'f Format) -> Self {
        let strategy = format
            .escape_output
            .then(|| format.resolved_escape_strategy());
        Self {
            format,
            strategy,
            levels: vec![Level {
                text_mode: format.text_mode,
                escape_output: format.escape_output,
            }],
        }
    }

    /// Enters a new level that starts as a copy of the current one.
    pub fn push(&mut self) {
        let top = *self.top();
        self.levels.push(top);
    }

    /// Leaves the current level.
    ///
    /// # Panics
    ///
    /// Panics if called more times than [`push`](Self::push); that is a bug
    /// in the caller.
    pub fn pop(&mut self) {
        assert!(self.levels.len() > 1, "FormatStack popped below depth 0");
        self.levels.pop();
    }

    /// Current nesting depth; 0 at document level.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    fn top(&self) -> &Level {
        // The base level is never popped.
        &self.levels[self.levels.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Level {
        let last = self.levels.len() - 1;
        &mut self.levels[last]
    }

    /// The configuration this stack reads from.
    #[must_use]
    pub fn format(&self) -> &'f Format {
        self.format
    }

    /// Text mode at the current level.
    #[must_use]
    pub fn text_mode(&self) -> TextMode {
        self.top().text_mode
    }

    /// Overrides the text mode for the current level.
    pub fn set_text_mode(&mut self, mode: TextMode) {
        self.top_mut().text_mode = mode;
    }

    /// The configuration's base text mode, restored by `xml:space="default"`.
    #[must_use]
    pub fn default_mode(&self) -> TextMode {
        self.format.text_mode
    }

    /// The escape strategy, or `None` when the configuration turns escaping
    /// off.
    #[must_use]
    pub fn escape_strategy(&self) -> Option<&EscapeStrategy> {
        self.strategy.as_ref()
    }

    /// Whether escaping is currently enabled. A TrAX processing instruction
    /// can flip this for the rest of a sibling scope.
    #[must_use]
    pub fn escape_output(&self) -> bool {
        self.top().escape_output
    }

    /// Sets the escape-output bit for the current level.
    pub fn set_escape_output(&mut self, escape: bool) {
        self.top_mut().escape_output = escape;
    }

    /// The configured line separator.
    #[must_use]
    pub fn line_separator(&self) -> &'f str {
        &self.format.line_separator
    }

    /// The end-of-line used when escaping `\n` in text, `None` while
    /// preserving.
    #[must_use]
    pub fn level_eol(&self) -> Option<&'f str> {
        (self.text_mode() != TextMode::Preserve).then_some(self.line_separator())
    }

    fn pad(&self, levels: usize) -> Option<String> {
        if self.text_mode() == TextMode::Preserve {
            return None;
        }
        let indent = self.format.indent.as_deref()?;
        let mut pad = String::with_capacity(self.format.line_separator.len() + indent.len() * levels);
        pad.push_str(&self.format.line_separator);
        for _ in 0..levels {
            pad.push_str(indent);
        }
        Some(pad)
    }

    /// Line separator plus one indent per level, written before each child
    /// of the current element.
    #[must_use]
    pub fn pad_between(&self) -> Option<String> {
        self.pad(self.depth())
    }

    /// Line separator plus the parent's indentation, written before the
    /// closing tag.
    #[must_use]
    pub fn pad_last(&self) -> Option<String> {
        self.pad(self.depth().saturating_sub(1))
    }

    /// The output encoding name.
    #[must_use]
    pub fn encoding(&self) -> &'f str {
        &self.format.encoding
    }

    /// Whether the XML declaration is suppressed.
    #[must_use]
    pub fn is_omit_declaration(&self) -> bool {
        self.format.omit_declaration
    }

    /// Whether the declaration's encoding is suppressed.
    #[must_use]
    pub fn is_omit_encoding(&self) -> bool {
        self.format.omit_encoding
    }

    /// Whether empty elements are written as `<a></a>`.
    #[must_use]
    pub fn is_expand_empty_elements(&self) -> bool {
        self.format.expand_empty_elements
    }

    /// Whether TrAX escaping processing instructions are written literally.
    #[must_use]
    pub fn is_ignore_trax_escaping_pis(&self) -> bool {
        self.format.ignore_trax_escaping_pis
    }

    /// Whether attributes are written sorted by qualified name.
    #[must_use]
    pub fn is_sort_attributes(&self) -> bool {
        self.format.sort_attributes
    }
}
