//! Single-pass extraction of title, headings and link entries.
//!
//! The extractor never builds a tree. It listens to a flat stream of
//! start-tag, end-tag and text events and keeps two independent pieces of
//! state: a [`CaptureMode`] for the title/heading/nav-section axis and an
//! optional [`PendingLink`] for the anchor currently open. Both can be active
//! at once, so a heading nested inside a link feeds text to both.
//!
//! Tokenizing is delegated to `html5gum`, which tolerates malformed markup.
//! Unbalanced tags simply never produce the end event that would flush a
//! capture, so that text is dropped instead of raising an error.
//!
//! The tokenizer switches states by start-tag name, approximating what a tree
//! builder would do. Besides `<script>` and `<style>`, this makes the content
//! of `<title>`, `<textarea>`, `<iframe>`, `<noembed>`, `<noframes>` and
//! `<xmp>` plain text: markup inside a title is kept literally
//! (`<title>A <b>B</b></title>` yields `A <b>B</b>`), and anchors inside those
//! elements are not collected.

use html5gum::{DefaultEmitter, Token, Tokenizer};

use crate::summary::{NavLink, PageSummary};

/// Collapse every run of whitespace to one space and trim both ends.
///
/// ```
/// use pagesum_web::normalize;
///
/// assert_eq!(normalize("  a\n\tb  "), "a b");
/// assert_eq!(normalize(&normalize(" x  y ")), normalize(" x  y "));
/// ```
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// What the extractor is currently buffering text for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaptureMode {
    #[default]
    None,
    Title,
    Heading1,
    Heading2,
    NavSection,
}

impl CaptureMode {
    fn for_text_tag(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "h1" => Some(Self::Heading1),
            "h2" => Some(Self::Heading2),
            _ => None,
        }
    }

    /// Title and heading modes accumulate text; the nav section only marks context.
    pub fn captures_text(self) -> bool {
        matches!(self, Self::Title | Self::Heading1 | Self::Heading2)
    }
}

/// Anchor opened with an `href` and not yet closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLink {
    pub href: String,
    pub text: String,
}

/// One tag-stream event, independent of the tokenizer that produced it.
///
/// Tag names are expected in lowercase, as `html5gum` reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagEvent<'a> {
    Start { name: &'a str, href: Option<&'a str> },
    End { name: &'a str },
    Text(&'a str),
}

/// Streaming consumer that turns markup into a [`PageSummary`].
///
/// Build a fresh value per document. Feeding a second document into the same
/// instance is not supported.
///
/// ```
/// use pagesum_web::Extractor;
///
/// let mut extractor = Extractor::new();
/// extractor.feed(r#"<title>Docs</title><nav><a href="/guide">Guide</a></nav>"#);
///
/// assert_eq!(extractor.title(), "Docs");
/// assert_eq!(extractor.nav_links()[0].href, "/guide");
/// ```
#[derive(Debug, Default)]
pub struct Extractor {
    mode: CaptureMode,
    buffer: String,
    link: Option<PendingLink>,
    summary: PageSummary,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the whole input through the tokenizer in one left-to-right pass.
    pub fn feed(&mut self, markup: &str) {
        let mut emitter = DefaultEmitter::default();
        // Raw-text elements (script, style, title, iframe, ...) yield text, not tags.
        emitter.naively_switch_states(true);

        let mut events = 0usize;
        for token in Tokenizer::new_with_emitter(markup, emitter).flatten() {
            match token {
                Token::StartTag(tag) => {
                    let name = String::from_utf8_lossy(&tag.name);
                    let href = tag
                        .attributes
                        .iter()
                        .find(|(key, _)| key.as_slice() == b"href")
                        .map(|(_, value)| String::from_utf8_lossy(value));
                    self.handle(TagEvent::Start {
                        name: &name,
                        href: href.as_deref(),
                    });
                    if tag.self_closing {
                        self.handle(TagEvent::End { name: &name });
                    }
                }
                Token::EndTag(tag) => {
                    self.handle(TagEvent::End {
                        name: &String::from_utf8_lossy(&tag.name),
                    });
                }
                Token::String(data) => {
                    self.handle(TagEvent::Text(&String::from_utf8_lossy(&data)));
                }
                _ => continue,
            }
            events += 1;
        }

        tracing::debug!(
            events,
            input_len = markup.len(),
            h1 = self.summary.h1.len(),
            h2 = self.summary.h2.len(),
            nav_links = self.summary.nav_links.len(),
            unflushed = self.mode.captures_text() || self.link.is_some(),
            "extract.done"
        );
    }

    /// Advance both state machines by one event.
    pub fn handle(&mut self, event: TagEvent<'_>) {
        match event {
            TagEvent::Start { name, href } => {
                if let Some(kind) = CaptureMode::for_text_tag(name) {
                    if !self.mode.captures_text() {
                        self.mode = kind;
                        self.buffer.clear();
                    }
                }
                match name {
                    "nav" => self.mode = CaptureMode::NavSection,
                    // An empty href counts as missing. A nested anchor replaces the open one.
                    "a" => {
                        if let Some(href) = href.filter(|h| !h.is_empty()) {
                            self.link = Some(PendingLink {
                                href: href.to_string(),
                                text: String::new(),
                            });
                        }
                    }
                    _ => {}
                }
            }
            TagEvent::End { name } => {
                match CaptureMode::for_text_tag(name) {
                    Some(kind) if self.mode == kind => self.flush(kind),
                    _ => {}
                }
                match name {
                    "nav" if self.mode == CaptureMode::NavSection => {
                        self.mode = CaptureMode::None;
                    }
                    "a" => {
                        if let Some(link) = self.link.take() {
                            let text = normalize(&link.text);
                            if !text.is_empty() {
                                self.summary.nav_links.push(NavLink {
                                    href: link.href,
                                    text,
                                });
                            }
                        }
                    }
                    _ => {}
                }
            }
            TagEvent::Text(data) => {
                if self.mode.captures_text() {
                    self.buffer.push_str(data);
                }
                if let Some(link) = self.link.as_mut() {
                    link.text.push_str(data);
                }
            }
        }
    }

    fn flush(&mut self, kind: CaptureMode) {
        let text = normalize(&self.buffer);
        self.buffer.clear();
        match kind {
            CaptureMode::Title => self.summary.title = text,
            CaptureMode::Heading1 if !text.is_empty() => self.summary.h1.push(text),
            CaptureMode::Heading2 if !text.is_empty() => self.summary.h2.push(text),
            _ => {}
        }
        self.mode = CaptureMode::None;
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn pending_link(&self) -> Option<&PendingLink> {
        self.link.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.summary.title
    }

    pub fn h1(&self) -> &[String] {
        &self.summary.h1
    }

    pub fn h2(&self) -> &[String] {
        &self.summary.h2
    }

    pub fn nav_links(&self) -> &[NavLink] {
        &self.summary.nav_links
    }

    pub fn into_summary(self) -> PageSummary {
        self.summary
    }
}

/// Extract a summary from a complete document with a fresh [`Extractor`].
pub fn extract(markup: &str) -> PageSummary {
    let mut extractor = Extractor::new();
    extractor.feed(markup);
    extractor.into_summary()
}
