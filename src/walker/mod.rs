//! Linearization of sibling content into output steps.
//!
//! A [`Walker`] takes the children of one element (or the top-level content
//! of a document) and yields, once and in order, what the outputter has to
//! emit: pass-through nodes, formatted text and CDATA runs, the padding
//! between them, and escape toggles requested by TrAX processing
//! instructions.
//!
//! In [`TextMode::Preserve`] every node passes through untouched. In every
//! other mode adjacent text, CDATA and entity references are coalesced into
//! a [`MultiText`] run which is trimmed as a whole:
//!
//! | mode        | run start | run end | inner whitespace |
//! |-------------|-----------|---------|------------------|
//! | `None`      | kept      | kept    | kept (whitespace-only runs dropped) |
//! | `TrimLeft`  | stripped  | kept    | kept             |
//! | `TrimRight` | kept      | stripped| kept             |
//! | `TrimBoth`  | stripped  | stripped| kept             |
//! | `Compact`   | stripped  | stripped| one space        |
//!
//! CDATA sections inside a run are never merged with the text around them
//! and are trimmed on their own with the same mode.

use std::borrow::Cow;

use crate::content::Content;
use crate::format::escape::escape_text;
use crate::format::{FormatStack, TextMode};
use crate::util::text::{collapse_whitespace, is_all_whitespace, trim_both, trim_left, trim_right};

/// Processing instruction target that turns output escaping off.
pub const DISABLE_OUTPUT_ESCAPING: &str = "javax.xml.transform.disable-output-escaping";

/// Processing instruction target that turns output escaping back on.
pub const ENABLE_OUTPUT_ESCAPING: &str = "javax.xml.transform.enable-output-escaping";

/// One unit of output produced by a [`Walker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<'a> {
    /// A node to output as-is (elements, comments, PIs, entity references,
    /// and, when preserving, text and CDATA).
    Content(&'a Content),
    /// Text ready to be written raw: already trimmed and, if the walker
    /// escapes, escaped. Padding is also delivered as text.
    Text(Cow<'a, str>),
    /// The content of a CDATA section, to be wrapped by the caller.
    CData(Cow<'a, str>),
    /// Output escaping is switched on (`true`) or off (`false`) for the rest
    /// of the sibling scope.
    Escaping(bool),
}

#[derive(Debug)]
enum Segment<'a> {
    Text(Cow<'a, str>),
    CData(Cow<'a, str>),
    Raw(&'a Content),
}

/// A maximal run of adjacent text-like siblings, split into segments at
/// CDATA and entity reference boundaries.
#[derive(Debug)]
pub struct MultiText<'a> {
    segments: Vec<Segment<'a>>,
}

fn map_cow<'a>(s: Cow<'a, str>, f: impl Fn(&str) -> &str) -> Cow<'a, str> {
    match s {
        Cow::Borrowed(b) => Cow::Borrowed(f(b)),
        Cow::Owned(o) => Cow::Owned(f(&o).to_string()),
    }
}

fn trim_alone(s: &str, mode: TextMode) -> Cow<'_, str> {
    match mode {
        TextMode::Preserve | TextMode::None => Cow::Borrowed(s),
        TextMode::TrimLeft => Cow::Borrowed(trim_left(s)),
        TextMode::TrimRight => Cow::Borrowed(trim_right(s)),
        TextMode::TrimBoth => Cow::Borrowed(trim_both(s)),
        TextMode::Compact => Cow::Owned(trim_both(&collapse_whitespace(s)).to_string()),
    }
}

impl<'a> MultiText<'a> {
    /// Builds a run from text-like nodes and applies `mode`.
    ///
    /// Returns `None` when nothing is left after trimming.
    fn build(nodes: &'a [Content], mode: TextMode) -> Option<Self> {
        let mut segments = Vec::new();
        let mut buffer: Option<Cow<'a, str>> = None;

        for node in nodes {
            match node {
                Content::Text(text) if text.is_empty() => {}
                Content::Text(text) => {
                    buffer = Some(match buffer.take() {
                        None => Cow::Borrowed(text.as_str()),
                        Some(mut b) => {
                            b.to_mut().push_str(text);
                            b
                        }
                    });
                }
                Content::CData(text) => {
                    if let Some(b) = buffer.take() {
                        segments.push(Segment::Text(b));
                    }
                    let trimmed = trim_alone(text, mode);
                    if !trimmed.is_empty() {
                        segments.push(Segment::CData(trimmed));
                    }
                }
                Content::EntityRef(_) => {
                    if let Some(b) = buffer.take() {
                        segments.push(Segment::Text(b));
                    }
                    segments.push(Segment::Raw(node));
                }
                // Callers only hand over text-like nodes.
                _ => {}
            }
        }
        if let Some(b) = buffer.take() {
            segments.push(Segment::Text(b));
        }

        let mut run = Self { segments };
        run.trim(mode);
        (!run.segments.is_empty()).then_some(run)
    }

    fn trim(&mut self, mode: TextMode) {
        let (left, right) = match mode {
            TextMode::Preserve => return,
            TextMode::None => {
                let blank = self
                    .segments
                    .iter()
                    .all(|s| matches!(s, Segment::Text(t) if is_all_whitespace(t)));
                if blank {
                    self.segments.clear();
                }
                return;
            }
            TextMode::TrimLeft => (true, false),
            TextMode::TrimRight => (false, true),
            TextMode::TrimBoth => (true, true),
            TextMode::Compact => {
                for segment in &mut self.segments {
                    if let Segment::Text(t) = segment {
                        *t = Cow::Owned(collapse_whitespace(t));
                    }
                }
                (true, true)
            }
        };

        if left {
            if let Some(Segment::Text(t)) = self.segments.first_mut() {
                *t = map_cow(std::mem::take(t), trim_left);
                if t.is_empty() {
                    self.segments.remove(0);
                }
            }
        }
        if right {
            if let Some(Segment::Text(t)) = self.segments.last_mut() {
                *t = map_cow(std::mem::take(t), trim_right);
                if t.is_empty() {
                    self.segments.pop();
                }
            }
        }
    }

    fn len(&self) -> usize {
        self.segments.len()
    }

    fn step(&self, index: usize, escape: bool, fstack: &FormatStack<'_>) -> Option<Step<'a>> {
        let step = match self.segments.get(index)? {
            Segment::Text(text) => {
                match fstack.escape_strategy().filter(|_| escape && fstack.escape_output()) {
                    Some(strategy) => Step::Text(match text {
                        Cow::Borrowed(s) => escape_text(*s, strategy, fstack.level_eol()),
                        Cow::Owned(s) => {
                            Cow::Owned(escape_text(s, strategy, fstack.level_eol()).into_owned())
                        }
                    }),
                    None => Step::Text(text.clone()),
                }
            }
            Segment::CData(text) => Step::CData(text.clone()),
            Segment::Raw(node) => Step::Content(node),
        };
        Some(step)
    }
}

#[derive(Debug)]
enum Item<'a> {
    Node(&'a Content),
    Run(MultiText<'a>),
    Escaping(bool),
}

impl Item<'_> {
    fn is_visible(&self) -> bool {
        !matches!(self, Item::Escaping(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    BeforeFirst,
    InMultiText { item: usize, segment: usize },
    BetweenItems { next: usize, padded: bool },
    Exhausted,
}

/// Single-pass stepper over one list of siblings.
///
/// The walker reads the [`FormatStack`] when it is built (text mode,
/// padding, TrAX handling) and again on every [`next`](Self::next) (escape
/// strategy and the escape-output bit), so an escape toggle applied by the
/// caller affects the text that follows it.
///
/// # Examples
///
/// ```
/// use xmloutput::format::{Format, FormatStack};
/// use xmloutput::walker::{Step, Walker};
/// use xmloutput::Content;
///
/// let content = vec![
///     Content::Text("  a ".into()),
///     Content::CData(" b ".into()),
///     Content::Text(" c  ".into()),
/// ];
/// let format = Format::pretty();
/// let fstack = FormatStack::new(&format);
/// let mut walker = Walker::new(&content, &fstack, true);
/// assert!(walker.is_all_text());
/// assert_eq!(walker.next(&fstack), Some(Step::Text("a ".into())));
/// assert_eq!(walker.next(&fstack), Some(Step::CData("b".into())));
/// assert_eq!(walker.next(&fstack), Some(Step::Text(" c".into())));
/// assert_eq!(walker.next(&fstack), None);
/// ```
#[derive(Debug)]
pub struct Walker<'a> {
    items: Vec<Item<'a>>,
    pad: Option<String>,
    escape: bool,
    all_text: bool,
    all_whitespace: bool,
    emitted_visible: bool,
    state: State,
}

impl<'a> Walker<'a> {
    /// Prepares a walk over `content`.
    ///
    /// `escape` is false where text must reach the caller unescaped: for
    /// document-level content and for tree outputs.
    #[must_use]
    pub fn new(content: &'a [Content], fstack: &FormatStack<'_>, escape: bool) -> Self {
        let mode = fstack.text_mode();
        let honour_trax = !fstack.is_ignore_trax_escaping_pis();
        let all_text = content.iter().all(Content::is_text_like);
        let all_whitespace = all_text
            && content
                .iter()
                .all(|c| matches!(c, Content::Text(t) if is_all_whitespace(t)));

        let classify = |node: &'a Content| match node {
            Content::ProcessingInstruction(pi) if honour_trax && pi.target == DISABLE_OUTPUT_ESCAPING => {
                Item::Escaping(false)
            }
            Content::ProcessingInstruction(pi) if honour_trax && pi.target == ENABLE_OUTPUT_ESCAPING => {
                Item::Escaping(true)
            }
            _ => Item::Node(node),
        };

        let mut items = Vec::with_capacity(content.len());
        if mode == TextMode::Preserve {
            items.extend(content.iter().map(classify));
        } else {
            let mut i = 0;
            while i < content.len() {
                if content[i].is_text_like() {
                    let start = i;
                    while i < content.len() && content[i].is_text_like() {
                        i += 1;
                    }
                    if let Some(run) = MultiText::build(&content[start..i], mode) {
                        items.push(Item::Run(run));
                    }
                } else {
                    items.push(classify(&content[i]));
                    i += 1;
                }
            }
        }

        let state = if items.is_empty() {
            State::Exhausted
        } else {
            State::BeforeFirst
        };
        Self {
            items,
            pad: if all_text { None } else { fstack.pad_between() },
            escape,
            all_text,
            all_whitespace,
            emitted_visible: false,
            state,
        }
    }

    /// `true` if the content is empty or entirely text, CDATA and entity
    /// references. Such content is written inline, without padding.
    #[must_use]
    pub fn is_all_text(&self) -> bool {
        self.all_text
    }

    /// `true` if the content is all text and that text is XML whitespace.
    #[must_use]
    pub fn is_all_whitespace(&self) -> bool {
        self.all_whitespace
    }

    /// `true` while there are steps left.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.state != State::Exhausted
    }

    /// `true` if the content yields any step other than an escape toggle.
    /// Content made only of TrAX processing instructions writes nothing.
    #[must_use]
    pub fn has_visible(&self) -> bool {
        self.has_next() && self.items.iter().any(Item::is_visible)
    }

    /// Produces the next step, or `None` once the content is exhausted.
    pub fn next(&mut self, fstack: &FormatStack<'_>) -> Option<Step<'a>> {
        let (step, state) = match self.state {
            State::Exhausted => return None,
            State::BeforeFirst => self.emit(0, 0, fstack)?,
            State::BetweenItems { next, padded } => match &self.pad {
                Some(pad) if !padded && self.emitted_visible && self.items.get(next)?.is_visible() => (
                    Step::Text(Cow::Owned(pad.clone())),
                    State::BetweenItems { next, padded: true },
                ),
                _ => self.emit(next, 0, fstack)?,
            },
            State::InMultiText { item, segment } => self.emit(item, segment, fstack)?,
        };
        if !matches!(step, Step::Escaping(_)) {
            self.emitted_visible = true;
        }
        self.state = state;
        Some(step)
    }

    fn emit(&self, item: usize, segment: usize, fstack: &FormatStack<'_>) -> Option<(Step<'a>, State)> {
        match self.items.get(item)? {
            Item::Node(node) => Some((Step::Content(node), self.after(item))),
            Item::Escaping(on) => Some((Step::Escaping(*on), self.after(item))),
            Item::Run(run) => {
                let step = run.step(segment, self.escape, fstack)?;
                let state = if segment + 1 < run.len() {
                    State::InMultiText {
                        item,
                        segment: segment + 1,
                    }
                } else {
                    self.after(item)
                };
                Some((step, state))
            }
        }
    }

    fn after(&self, item: usize) -> State {
        if item + 1 < self.items.len() {
            State::BetweenItems {
                next: item + 1,
                padded: false,
            }
        } else {
            State::Exhausted
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::content::{Element, ProcessingInstruction};
    use crate::format::Format;
    use pretty_assertions::assert_eq;

    fn describe(step: &Step<'_>) -> String {
        match step {
            Step::Content(Content::Element(e)) => format!("<{}>", e.name),
            Step::Content(Content::EntityRef(name)) => format!("&{name};"),
            Step::Content(Content::Text(t)) => format!("node:{t}"),
            Step::Content(Content::CData(t)) => format!("node-cdata:{t}"),
            Step::Content(Content::Comment(c)) => format!("<!--{c}-->"),
            Step::Content(Content::ProcessingInstruction(pi)) => format!("<?{}?>", pi.target),
            Step::Content(Content::DocType(d)) => format!("<!DOCTYPE {}>", d.element_name),
            Step::Text(t) => format!("text:{t}"),
            Step::CData(t) => format!("cdata:{t}"),
            Step::Escaping(on) => format!("escaping:{on}"),
        }
    }

    /// Walks `content` as the children of a depth-1 element.
    fn walk(content: &[Content], format: &Format) -> Vec<String> {
        let mut fstack = FormatStack::new(format);
        fstack.push();
        let mut walker = Walker::new(content, &fstack, true);
        let mut steps = Vec::new();
        while let Some(step) = walker.next(&fstack) {
            steps.push(describe(&step));
        }
        assert!(!walker.has_next());
        steps
    }

    fn text(s: &str) -> Content {
        Content::Text(s.to_string())
    }

    fn elem(name: &str) -> Content {
        Content::Element(Element::new(name))
    }

    #[test]
    fn test_empty_content() {
        let format = Format::pretty();
        let fstack = FormatStack::new(&format);
        let walker = Walker::new(&[], &fstack, true);
        assert!(walker.is_all_text());
        assert!(walker.is_all_whitespace());
        assert!(!walker.has_next());
    }

    #[test]
    fn test_trim_modes() {
        let content = [text("  a  b  ")];
        let cases = [
            (TextMode::TrimBoth, "text:a  b"),
            (TextMode::Compact, "text:a b"),
            (TextMode::None, "text:  a  b  "),
            (TextMode::TrimLeft, "text:a  b  "),
            (TextMode::TrimRight, "text:  a  b"),
        ];
        for (mode, expected) in cases {
            let format = Format::pretty().text_mode(mode);
            assert_eq!(walk(&content, &format), vec![expected.to_string()], "{mode:?}");
        }
        let format = Format::raw();
        assert_eq!(walk(&content, &format), vec!["node:  a  b  "]);
    }

    #[test]
    fn test_adjacent_text_is_trimmed_as_one_run() {
        let content = [text("  a "), text(" b  ")];
        assert_eq!(walk(&content, &Format::pretty()), vec!["text:a  b"]);
        assert_eq!(walk(&content, &Format::compact()), vec!["text:a b"]);
    }

    #[test]
    fn test_cdata_boundary_preserved() {
        let content = [text("a"), Content::CData("b".into()), text("c")];
        assert_eq!(
            walk(&content, &Format::pretty()),
            vec!["text:a", "cdata:b", "text:c"]
        );
    }

    #[test]
    fn test_entity_ref_is_its_own_segment() {
        let content = [text(" x "), Content::EntityRef("nbsp".into()), text(" y ")];
        assert_eq!(
            walk(&content, &Format::pretty()),
            vec!["text:x ", "&nbsp;", "text: y"]
        );
    }

    #[test]
    fn test_padding_between_items_only() {
        let content = [text("\n  "), elem("a"), text(" hi "), elem("b"), text("\n")];
        let walker_steps = walk(&content, &Format::pretty());
        assert_eq!(
            walker_steps,
            vec!["<a>", "text:\n  ", "text:hi", "text:\n  ", "<b>"]
        );
    }

    #[test]
    fn test_dropped_run_does_not_double_pad() {
        let content = [elem("a"), text("   "), elem("b")];
        assert_eq!(walk(&content, &Format::pretty()), vec!["<a>", "text:\n  ", "<b>"]);
    }

    #[test]
    fn test_no_padding_without_indent() {
        let content = [elem("a"), text(" x "), elem("b")];
        assert_eq!(walk(&content, &Format::compact()), vec!["<a>", "text:x", "<b>"]);
    }

    #[test]
    fn test_whitespace_only_text_drops_out() {
        let content = [text(" \n\t ")];
        for format in [Format::pretty(), Format::compact(), Format::pretty().text_mode(TextMode::None)] {
            let mut fstack = FormatStack::new(&format);
            fstack.push();
            let walker = Walker::new(&content, &fstack, true);
            assert!(walker.is_all_text());
            assert!(walker.is_all_whitespace());
            assert!(!walker.has_next());
        }
    }

    #[test]
    fn test_all_text_flags() {
        let format = Format::pretty();
        let fstack = FormatStack::new(&format);
        let content = [text("a"), Content::EntityRef("e".into())];
        let walker = Walker::new(&content, &fstack, true);
        assert!(walker.is_all_text());
        assert!(!walker.is_all_whitespace());

        let content = [Content::CData("  ".into())];
        let walker = Walker::new(&content, &fstack, true);
        assert!(walker.is_all_text());
        assert!(!walker.is_all_whitespace());

        let content = [text(" "), Content::Comment("c".into())];
        let walker = Walker::new(&content, &fstack, true);
        assert!(!walker.is_all_text());
        assert!(!walker.is_all_whitespace());
    }

    #[test]
    fn test_text_is_escaped() {
        let content = [text("a < b\nc")];
        let format = Format::pretty().line_separator("\r\n");
        assert_eq!(walk(&content, &format), vec!["text:a &lt; b\r\nc"]);
    }

    #[test]
    fn test_cdata_is_never_escaped() {
        let content = [Content::CData("x < 1 && y".into())];
        assert_eq!(walk(&content, &Format::pretty()), vec!["cdata:x < 1 && y"]);
    }

    #[test]
    fn test_unescaped_walker() {
        let content = [text("a & b")];
        let format = Format::pretty();
        let mut fstack = FormatStack::new(&format);
        fstack.push();
        let mut walker = Walker::new(&content, &fstack, false);
        assert_eq!(walker.next(&fstack), Some(Step::Text("a & b".into())));
    }

    #[test]
    fn test_trax_pis_become_toggles() {
        let content = [
            Content::ProcessingInstruction(ProcessingInstruction::new(DISABLE_OUTPUT_ESCAPING, "")),
            text("<raw>"),
            Content::ProcessingInstruction(ProcessingInstruction::new(ENABLE_OUTPUT_ESCAPING, "")),
            text("<esc>"),
        ];
        let format = Format::compact();
        let mut fstack = FormatStack::new(&format);
        fstack.push();
        let mut walker = Walker::new(&content, &fstack, true);
        let mut seen = Vec::new();
        while let Some(step) = walker.next(&fstack) {
            if let Step::Escaping(on) = step {
                fstack.set_escape_output(on);
            }
            seen.push(describe(&step));
        }
        assert_eq!(
            seen,
            vec!["escaping:false", "text:<raw>", "escaping:true", "text:&lt;esc&gt;"]
        );
    }

    #[test]
    fn test_trax_pis_not_padded() {
        let content = [
            elem("a"),
            Content::ProcessingInstruction(ProcessingInstruction::new(DISABLE_OUTPUT_ESCAPING, "")),
            elem("b"),
        ];
        assert_eq!(
            walk(&content, &Format::pretty()),
            vec!["<a>", "escaping:false", "text:\n  ", "<b>"]
        );
    }

    #[test]
    fn test_toggles_alone_are_not_visible() {
        let disable = Content::ProcessingInstruction(ProcessingInstruction::new(DISABLE_OUTPUT_ESCAPING, ""));
        let format = Format::pretty();
        let mut fstack = FormatStack::new(&format);
        fstack.push();

        let content = [disable.clone(), text("  \n ")];
        let walker = Walker::new(&content, &fstack, true);
        assert!(walker.has_next());
        assert!(!walker.has_visible());

        let content = [disable, text("x")];
        assert!(Walker::new(&content, &fstack, true).has_visible());

        let ignoring = Format::pretty().ignore_trax_escaping_pis(true);
        let fstack = FormatStack::new(&ignoring);
        let content = [Content::ProcessingInstruction(ProcessingInstruction::new(
            DISABLE_OUTPUT_ESCAPING,
            "",
        ))];
        assert!(Walker::new(&content, &fstack, true).has_visible());
    }

    #[test]
    fn test_trax_pis_ignored_when_configured() {
        let content = [Content::ProcessingInstruction(ProcessingInstruction::new(
            DISABLE_OUTPUT_ESCAPING,
            "",
        ))];
        let format = Format::pretty().ignore_trax_escaping_pis(true);
        assert_eq!(
            walk(&content, &format),
            vec![format!("<?{DISABLE_OUTPUT_ESCAPING}?>")]
        );
    }

    #[test]
    fn test_preserve_passes_everything_through() {
        let content = [text("  a "), Content::CData(" b ".into()), elem("c")];
        assert_eq!(
            walk(&content, &Format::raw()),
            vec!["node:  a ", "node-cdata: b ", "<c>"]
        );
    }

    #[test]
    fn test_cdata_trimmed_independently() {
        let content = [text(" a "), Content::CData("  b  ".into()), text(" c ")];
        assert_eq!(
            walk(&content, &Format::pretty()),
            vec!["text:a ", "cdata:b", "text: c"]
        );
        assert_eq!(
            walk(&content, &Format::pretty().text_mode(TextMode::None)),
            vec!["text: a ", "cdata:  b  ", "text: c "]
        );
    }
}
