//! Scrubbing of terminal-query echo artifacts from PTY output
//!
//! Agent-driven shells tend to leak responses to terminal queries (device
//! attributes, cursor position, palette colors) back into the output stream,
//! where they show up as garbage like `;rgb:1e1e/1e1e/1e1e` or `0;276R`.
//! This module removes the specific artifact shapes seen in the wild before
//! the text reaches the screen. It is a heuristic filter, not an ANSI
//! parser; the transforms run in a fixed order and each one consumes the
//! previous one's output.

use once_cell::sync::Lazy;
use regex::Regex;

struct Scrubbers {
    /// `ESC [ ? <digits>(;<digits>)* c` - primary device attribute reports
    device_attributes: Regex,
    /// Bare `<digits>(;<digits>)* c|R` tokens at whitespace/line boundaries -
    /// echoed query responses that lost their escape prefix
    response_codes: Regex,
    /// `<digits>;rgb:<hex>/<hex>/<hex>` - OSC color query responses
    color_reports: Regex,
    /// Remaining bare `rgb:<hex>(/<hex>)*` tokens
    rgb_tokens: Regex,
    /// Standalone 4-hex-digit token at whitespace/line boundaries -
    /// residual fragment of a split color report
    hex_fragments: Regex,
    /// `ESC ] <digits> ; <text>` terminated by BEL or ESC
    osc_sequences: Regex,
    /// Blank line between two newlines
    blank_lines: Regex,
}

static SCRUBBERS: Lazy<Option<Scrubbers>> = Lazy::new(|| {
    Some(Scrubbers {
        device_attributes: Regex::new(r"\x1b\[\?\d+(?:;\d+)*c").ok()?,
        response_codes: Regex::new(r"(?m)(^|\s)\d+(?:;\d+)*[cR](\s|$)").ok()?,
        color_reports: Regex::new(r"\d+;rgb:[0-9a-fA-F]+/[0-9a-fA-F]+/[0-9a-fA-F]+").ok()?,
        rgb_tokens: Regex::new(r"rgb:[0-9a-fA-F]+(?:/[0-9a-fA-F]+)*").ok()?,
        hex_fragments: Regex::new(r"(?m)(^|\s)[0-9a-fA-F]{4}(\s|$)").ok()?,
        osc_sequences: Regex::new(r"\x1b\]\d+;[^\x07\x1b]*(?:\x07|\x1b\\|\x1b)").ok()?,
        blank_lines: Regex::new(r"\n\s*\n").ok()?,
    })
});

/// Scrub one chunk of PTY output before it is written to the surface.
///
/// Best effort: if the scrubber set is unavailable the chunk passes through
/// unmodified. Normal program output is unaffected; false negatives on
/// exotic artifact shapes are acceptable.
pub fn sanitize_chunk(chunk: &str) -> String {
    let Some(s) = SCRUBBERS.as_ref() else {
        return chunk.to_string();
    };

    let text = s.device_attributes.replace_all(chunk, "");
    let text = s.response_codes.replace_all(&text, "${1}${2}");
    let text = s.color_reports.replace_all(&text, "");
    let text = s.rgb_tokens.replace_all(&text, "");
    let text = s.hex_fragments.replace_all(&text, " ");
    let text = s.osc_sequences.replace_all(&text, "");
    let text = s.blank_lines.replace_all(&text, "\n");
    text.into_owned()
}
