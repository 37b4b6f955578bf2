//! Lightweight rich text used by special-rule callouts.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Visual weight of a span of callout text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanStyle {
    /// Regular text.
    Plain,
    /// Rendered bold.
    Strong,
    /// Rendered italic or dimmed, depending on the frontend.
    Emphasis,
}

/// A single styled run of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Text content without markup.
    pub text: String,
    /// Style applied to the whole run.
    pub style: SpanStyle,
}

/// Structured callout content.
///
/// Authored as a markup string where `**text**` is strong and `_text_` is
/// emphasis. A backslash makes the next `*`, `_` or `\` literal. Serialises
/// back to the same markup so content tables stay human-editable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RichText {
    spans: Vec<Span>,
}

static MARKUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\([\\*_])|\*\*(.+?)\*\*|_(.+?)_").expect("failed to compile markup regex")
});

impl RichText {
    /// Parse markup into styled spans.
    pub fn parse(markup: &str) -> Self {
        let mut spans = Vec::new();
        let mut last = 0;
        for caps in MARKUP_RE.captures_iter(markup) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if whole.start() > last {
                push_plain(&mut spans, &markup[last..whole.start()]);
            }
            if let Some(escaped) = caps.get(1) {
                push_plain(&mut spans, escaped.as_str());
            } else if let Some(strong) = caps.get(2) {
                spans.push(Span {
                    text: strong.as_str().to_string(),
                    style: SpanStyle::Strong,
                });
            } else if let Some(emphasis) = caps.get(3) {
                spans.push(Span {
                    text: emphasis.as_str().to_string(),
                    style: SpanStyle::Emphasis,
                });
            }
            last = whole.end();
        }
        if last < markup.len() {
            push_plain(&mut spans, &markup[last..]);
        }
        Self { spans }
    }

    /// Plain, unstyled text.
    pub fn plain(text: impl Into<String>) -> Self {
        let mut spans = Vec::new();
        push_plain(&mut spans, &text.into());
        Self { spans }
    }

    /// Styled runs in display order.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Concatenated text with markup removed.
    pub fn to_plain_string(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Returns true when there is no visible text.
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|span| span.text.is_empty())
    }
}

/// Appends plain text, joining it onto a trailing plain span.
fn push_plain(spans: &mut Vec<Span>, text: &str) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.style == SpanStyle::Plain => last.text.push_str(text),
        _ => spans.push(Span {
            text: text.to_string(),
            style: SpanStyle::Plain,
        }),
    }
}

impl From<String> for RichText {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for RichText {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<RichText> for String {
    fn from(value: RichText) -> Self {
        value.to_string()
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            match span.style {
                SpanStyle::Plain => {
                    for ch in span.text.chars() {
                        if matches!(ch, '\\' | '*' | '_') {
                            f.write_str("\\")?;
                        }
                        write!(f, "{ch}")?;
                    }
                }
                SpanStyle::Strong => write!(f, "**{}**", span.text)?,
                SpanStyle::Emphasis => write!(f, "_{}_", span.text)?,
            }
        }
        Ok(())
    }
}
