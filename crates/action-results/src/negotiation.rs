//! Output formatter selection for object results.
//!
//! The `Accept` header is parsed into media ranges ordered by quality. Each
//! range is offered to the formatters in registration order; the first
//! formatter that can both write the value and produce a matching media type
//! wins.
//!
//! ```
//! use action_results::negotiation::{select_formatter, FormatterOptions, OutputFormatter};
//! use serde_json::json;
//!
//! let options = FormatterOptions::default();
//! let picked = select_formatter(Some("text/plain;q=0.5, application/json"), &json!("hi"), &options);
//! assert_eq!(picked.map(|s| s.formatter), Some(OutputFormatter::Json));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

// ============================================================================
// Media ranges
// ============================================================================

/// One entry of an `Accept` header.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    pub type_: String,
    pub subtype: String,
    pub quality: f32,
}

impl MediaRange {
    /// Parse `type/subtype;param=x;q=0.8`. Parameters other than `q` are ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().split(';');
        let (type_, subtype) = parts.next()?.trim().split_once('/')?;
        let type_ = type_.trim().to_lowercase();
        let subtype = subtype.trim().to_lowercase();
        if type_.is_empty() || subtype.is_empty() {
            return None;
        }

        let quality = parts
            .filter_map(|p| p.split_once('='))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("q"))
            .and_then(|(_, v)| v.trim().parse::<f32>().ok())
            .unwrap_or(1.0)
            .clamp(0.0, 1.0);

        Some(Self {
            type_,
            subtype,
            quality,
        })
    }

    pub fn is_any(&self) -> bool {
        self.type_ == "*" && self.subtype == "*"
    }

    /// Whether a concrete `type/subtype` falls inside this range.
    /// `application/*+json` style suffix ranges are honoured.
    pub fn matches(&self, media_type: &str) -> bool {
        let Some((type_, subtype)) = media_type.split_once('/') else {
            return false;
        };
        let type_ok = self.type_ == "*" || self.type_.eq_ignore_ascii_case(type_);
        let subtype_ok = match self.subtype.strip_prefix("*+") {
            Some(suffix) => subtype.ends_with(&format!("+{suffix}")) || subtype.eq_ignore_ascii_case(suffix),
            None => self.subtype == "*" || self.subtype.eq_ignore_ascii_case(subtype),
        };
        type_ok && subtype_ok
    }
}

/// Parse an `Accept` header, dropping unparsable and `q=0` entries and
/// sorting by quality (stable, so header order breaks ties).
pub fn parse_accept(header: &str) -> Vec<MediaRange> {
    let mut ranges: Vec<MediaRange> = header
        .split(',')
        .filter_map(MediaRange::parse)
        .filter(|r| r.quality > 0.0)
        .collect();
    ranges.sort_by(|a, b| b.quality.partial_cmp(&a.quality).unwrap_or(Ordering::Equal));
    ranges
}

// ============================================================================
// Formatters
// ============================================================================

/// Built-in output formatters, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatter {
    /// Writes string values verbatim.
    PlainText,
    /// Writes any value as JSON.
    Json,
}

impl OutputFormatter {
    pub const ALL: [OutputFormatter; 2] = [OutputFormatter::PlainText, OutputFormatter::Json];

    pub fn supported_media_types(self) -> &'static [&'static str] {
        match self {
            OutputFormatter::PlainText => &["text/plain"],
            OutputFormatter::Json => &["application/json", "text/json"],
        }
    }

    pub fn can_write(self, value: &Value) -> bool {
        match self {
            OutputFormatter::PlainText => value.is_string(),
            OutputFormatter::Json => true,
        }
    }

    /// Render the body. Strings go out raw for the text formatter.
    pub fn render(self, value: &Value) -> Result<Vec<u8>, serde_json::Error> {
        match (self, value) {
            (OutputFormatter::PlainText, Value::String(text)) => Ok(text.clone().into_bytes()),
            _ => serde_json::to_vec(value),
        }
    }
}

/// A formatter together with the `Content-Type` it should announce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub formatter: OutputFormatter,
    pub content_type: String,
}

impl Selection {
    fn new(formatter: OutputFormatter, media_type: &str) -> Self {
        Self {
            formatter,
            content_type: format!("{media_type}; charset=utf-8"),
        }
    }

    fn default_for(formatter: OutputFormatter) -> Self {
        Self::new(formatter, formatter.supported_media_types()[0])
    }
}

/// Knobs mirroring the usual MVC formatter options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatterOptions {
    /// Honour `Accept` even when it contains `*/*` (browsers always send it).
    #[serde(default)]
    pub respect_browser_accept_header: bool,

    /// Answer 406 when nothing matches instead of falling back.
    #[serde(default)]
    pub return_http_not_acceptable: bool,
}

/// Pick a formatter for `value`. `None` means 406 Not Acceptable.
pub fn select_formatter(
    accept: Option<&str>,
    value: &Value,
    options: &FormatterOptions,
) -> Option<Selection> {
    select_formatter_for(accept, value, options, &[])
}

/// Like [`select_formatter`], restricted to `content_types` when non-empty.
pub fn select_formatter_for(
    accept: Option<&str>,
    value: &Value,
    options: &FormatterOptions,
    content_types: &[String],
) -> Option<Selection> {
    let candidates: Vec<OutputFormatter> = OutputFormatter::ALL
        .into_iter()
        .filter(|f| f.can_write(value))
        .collect();

    // Media types each candidate may announce, honouring the restriction.
    let offers: Vec<(OutputFormatter, String)> = candidates
        .iter()
        .flat_map(|&f| {
            f.supported_media_types()
                .iter()
                .map(move |m| (f, m.to_string()))
        })
        .filter(|(_, m)| {
            content_types.is_empty()
                || content_types
                    .iter()
                    .any(|ct| MediaRange::parse(ct).is_some_and(|r| r.matches(m)))
        })
        .collect();

    let fallback = || {
        offers
            .first()
            .map(|(f, m)| Selection::new(*f, m))
            .or_else(|| candidates.first().map(|f| Selection::default_for(*f)))
    };

    let ranges = accept.map(parse_accept).unwrap_or_default();
    let ignore_accept =
        ranges.is_empty() || (!options.respect_browser_accept_header && ranges.iter().any(MediaRange::is_any));
    if ignore_accept {
        return fallback();
    }

    let matched = ranges.iter().find_map(|range| {
        offers
            .iter()
            .find(|(_, m)| range.matches(m))
            .map(|(f, m)| Selection::new(*f, m))
    });

    match matched {
        Some(selection) => Some(selection),
        None if options.return_http_not_acceptable => None,
        None => fallback(),
    }
}
