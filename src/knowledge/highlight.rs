//! Keyword emphasis for protocol steps
//!
//! Dispatch scripts use a handful of uppercase cue words the operator must
//! not miss. Every occurrence is wrapped in a `highlight` span; nothing else
//! in the step is touched.
//!
//! [`render_steps`] is what the console shows: payload text is HTML-escaped
//! first, so only the emphasis markers survive as markup.

use regex::Regex;
use std::sync::OnceLock;

/// Cue phrases, matched case-sensitively in this order.
pub const KEYWORDS: [&str; 8] = [
    "SAY THIS",
    "STAY",
    "PUSH",
    "FAST",
    "HARD",
    "DON'T STOP",
    "CONFIRM",
    "MONITOR",
];

const OPEN_MARKER: &str = "<span class='highlight'>";
const CLOSE_MARKER: &str = "</span>";

static KEYWORD_RE: OnceLock<Regex> = OnceLock::new();

fn keyword_regex() -> &'static Regex {
    KEYWORD_RE.get_or_init(|| {
        let alternation = KEYWORDS
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        // Built from escaped literals, cannot fail.
        #[allow(clippy::expect_used)]
        Regex::new(&format!("({alternation})")).expect("keyword alternation is a valid regex")
    })
}

/// Wrap every cue phrase in `step` with the emphasis marker.
pub fn highlight(step: &str) -> String {
    keyword_regex()
        .replace_all(step, format!("{OPEN_MARKER}${{1}}{CLOSE_MARKER}").as_str())
        .into_owned()
}

/// Escape each step as HTML text, then highlight it. Order is preserved.
///
/// Only `&`, `<` and `>` are escaped, so apostrophes in cue phrases such as
/// "DON'T STOP" still match.
pub fn render_steps(steps: &[String]) -> Vec<String> {
    steps
        .iter()
        .map(|s| highlight(&html_escape::encode_text(s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(word: &str) -> String {
        format!("{OPEN_MARKER}{word}{CLOSE_MARKER}")
    }

    #[test]
    fn test_wraps_single_keyword_only() {
        let out = highlight("Please STAY on the line.");
        assert_eq!(out, format!("Please {} on the line.", marked("STAY")));
    }

    #[test]
    fn test_wraps_every_occurrence() {
        let out = highlight("PUSH, PUSH, PUSH");
        assert_eq!(out.matches(OPEN_MARKER).count(), 3);
    }

    #[test]
    fn test_case_sensitive() {
        let out = highlight("push hard and fast");
        assert_eq!(out, "push hard and fast");
    }

    #[test]
    fn test_multi_word_phrases() {
        let out = highlight("SAY THIS: DON'T STOP until help arrives");
        assert!(out.contains(&marked("SAY THIS")));
        assert!(out.contains(&marked("DON'T STOP")));
    }

    #[test]
    fn test_plain_text_unchanged() {
        let text = "Ask the caller for their address.";
        assert_eq!(highlight(text), text);
    }

    #[test]
    fn test_keyword_inside_word_is_still_wrapped() {
        // No word boundaries: "STAYING" contains "STAY".
        let out = highlight("STAYING");
        assert_eq!(out, format!("{}ING", marked("STAY")));
    }

    #[test]
    fn test_render_steps_keeps_order() {
        let steps = vec!["CONFIRM address".to_string(), "MONITOR breathing".to_string()];
        let out = render_steps(&steps);
        assert_eq!(out.len(), 2);
        assert!(out[0].starts_with(&marked("CONFIRM")));
        assert!(out[1].starts_with(&marked("MONITOR")));
    }

    #[test]
    fn test_render_steps_escapes_payload_markup() {
        let steps = vec!["<img src=x onerror=alert(1)> STAY & wait".to_string()];
        let out = render_steps(&steps);
        assert_eq!(
            out[0],
            format!("&lt;img src=x onerror=alert(1)&gt; {} &amp; wait", marked("STAY"))
        );
    }

    #[test]
    fn test_render_steps_keeps_apostrophe_cues() {
        let out = render_steps(&["DON'T STOP compressions".to_string()]);
        assert_eq!(out[0], format!("{} compressions", marked("DON'T STOP")));
    }
}
