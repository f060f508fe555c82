//! Whitespace normalisation applied to extracted text before rewriting.

/// Replace non-breaking spaces, collapse runs of spaces and tabs, trim.
///
/// Line breaks are preserved: paragraph structure carries meaning in
/// judgments (numbered grounds, the operative part).
pub fn clean(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        match c {
            ' ' | '\t' | '\u{a0}' => pending_space = true,
            _ => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            }
        }
    }

    out.trim().to_string()
}
