//! `:shortcode:` → glyph substitution.
//!
//! Unknown shortcodes and stray colons are left untouched, so expansion is
//! idempotent: already-expanded text passes through unchanged.

/// Expand every known `:shortcode:` in `text` to its emoji glyph.
#[must_use]
pub fn emojify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(':') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find(':') {
            Some(end) => {
                let name = &after[..end];
                if let Some(emoji) = emojis::get_by_shortcode(name) {
                    out.push_str(emoji.as_str());
                    rest = &after[end + 1..];
                } else {
                    // Not a shortcode; the closing colon may open the next one.
                    out.push(':');
                    rest = after;
                }
            },
            None => {
                out.push(':');
                rest = after;
            },
        }
    }

    out.push_str(rest);
    out
}
