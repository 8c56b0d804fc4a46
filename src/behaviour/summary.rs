//! Text helpers for action summaries.

const ELLIPSIS: &str = "...";

/// Collapses whitespace to single spaces and cuts the text to at most
/// `max_chars` characters, ending with `...` when cut. Limits too small to
/// hold the ellipsis get a plain cut.
#[must_use]
pub fn shorten_text(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    if max_chars <= ELLIPSIS.len() {
        return collapsed.chars().take(max_chars).collect();
    }

    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = collapsed.chars().take(keep).collect();
    out.truncate(out.trim_end().len());
    out.push_str(ELLIPSIS);
    out
}
