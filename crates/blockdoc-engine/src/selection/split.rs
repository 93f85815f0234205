use crate::selection::markup::{Token, tokenize, visible_len};

/// The two halves of an editable region's content, split at the caret and
/// re-serialized with balanced markup.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitFragments {
    /// Everything from the start of the region up to the caret.
    pub current: String,
    /// Everything from the caret to the end.
    pub next: String,
}

/// Splits inline markup at a caret position (a visible-character offset).
///
/// Splitting inside nested formatting preserves the markup boundary on both
/// sides: tags open at the caret are closed in `current` and reopened (with
/// their original attributes) in `next`, so naive text-offset corruption of
/// formatting cannot occur.
///
/// Returns `None` — the "do not split" signal — when the caret lies outside
/// the region's content. Callers must skip their split/insert sequence in
/// that case rather than proceeding with undefined fragments.
///
/// ```rust
/// use blockdoc_engine::selection::extract_fragments;
///
/// let fragments = extract_fragments("he<b>ll</b>o", 3).unwrap();
/// assert_eq!(fragments.current, "he<b>l</b>");
/// assert_eq!(fragments.next, "<b>l</b>o");
/// ```
pub fn extract_fragments(markup: &str, caret: usize) -> Option<SplitFragments> {
    if caret > visible_len(markup) {
        return None;
    }

    let tokens = tokenize(markup);
    let mut current = String::new();
    let mut remaining = caret;
    // Tags currently open: (name, raw open tag with attributes).
    let mut open: Vec<(&str, &str)> = Vec::new();

    let mut boundary: Option<(usize, &str)> = None; // (first token of `next`, text carry-over)

    for (index, token) in tokens.iter().enumerate() {
        if remaining == 0 {
            match token {
                // Trailing close tags belong to `current`; this keeps the
                // split from reopening tags just to close them again.
                Token::Close { name, raw } => {
                    current.push_str(raw);
                    if open.last().is_some_and(|(n, _)| n == name) {
                        open.pop();
                    }
                    continue;
                }
                _ => {
                    boundary = Some((index, ""));
                    break;
                }
            }
        }
        match token {
            Token::Text(raw) => {
                let width = raw.chars().count();
                if width <= remaining {
                    current.push_str(raw);
                    remaining -= width;
                } else {
                    // Caret falls inside this run: split at the char boundary.
                    let at = raw
                        .char_indices()
                        .nth(remaining)
                        .map(|(i, _)| i)
                        .unwrap_or(raw.len());
                    current.push_str(&raw[..at]);
                    remaining = 0;
                    boundary = Some((index + 1, &raw[at..]));
                    break;
                }
            }
            Token::Entity(raw) => {
                current.push_str(raw);
                remaining -= 1;
            }
            Token::Open { name, raw } => {
                open.push((name, raw));
                current.push_str(raw);
            }
            Token::Close { name, raw } => {
                current.push_str(raw);
                if open.last().is_some_and(|(n, _)| n == name) {
                    open.pop();
                }
            }
            Token::Void(raw) => current.push_str(raw),
        }
    }

    // Balance `current` by closing everything still open...
    for (name, _) in open.iter().rev() {
        current.push_str(&format!("</{name}>"));
    }

    // ...and start `next` by reopening the same tags in order.
    let mut next = String::new();
    for (_, raw) in &open {
        next.push_str(raw);
    }
    if let Some((start, carry)) = boundary {
        next.push_str(carry);
        for token in &tokens[start..] {
            next.push_str(token.raw());
        }
    }

    Some(SplitFragments { current, next })
}
