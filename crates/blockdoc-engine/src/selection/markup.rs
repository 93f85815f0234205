//! Tokenizer for the inline-markup strings blocks keep in their `data`
//! payloads (the escaped-HTML text an editable surface produces).
//!
//! Caret positions are visible-character offsets: one position per text
//! character, one per character entity, zero for tags.

/// One lexeme of an inline-markup string. Every variant keeps the raw slice
/// so token streams re-serialize losslessly.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// A run of plain text (no tags, no entities).
    Text(&'a str),
    /// A character entity such as `&amp;`, counted as one visible position.
    Entity(&'a str),
    /// An opening inline tag, attributes included in `raw`.
    Open { name: String, raw: &'a str },
    /// A closing inline tag.
    Close { name: String, raw: &'a str },
    /// A void or self-closing tag (`<br>`, `<img …/>`); never on the open
    /// stack, zero visible width.
    Void(&'a str),
}

impl Token<'_> {
    pub fn raw(&self) -> &str {
        match self {
            Token::Text(raw) | Token::Entity(raw) | Token::Void(raw) => raw,
            Token::Open { raw, .. } | Token::Close { raw, .. } => raw,
        }
    }

    /// Visible positions this token occupies.
    pub fn width(&self) -> usize {
        match self {
            Token::Text(raw) => raw.chars().count(),
            Token::Entity(_) => 1,
            _ => 0,
        }
    }
}

/// Byte cursor over a markup string.
#[derive(Clone)]
struct Cursor<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    fn bump(&mut self) {
        self.i += 1;
    }
}

const VOID_TAGS: [&str; 4] = ["br", "hr", "img", "wbr"];

/// Splits a markup string into tokens. Malformed constructs (an unclosed
/// `<` or a bare `&`) fall back to literal text, never an error.
pub fn tokenize(markup: &str) -> Vec<Token<'_>> {
    let mut cur = Cursor::new(markup);
    let mut out = Vec::new();
    let mut text_start = cur.i;

    // Emit the pending text run, if any.
    fn flush<'a>(out: &mut Vec<Token<'a>>, s: &'a str, start: usize, end: usize) {
        if end > start {
            out.push(Token::Text(&s[start..end]));
        }
    }

    while !cur.eof() {
        // On failure the try-parsers restore the cursor, so `here` is the
        // token's start whenever one of them succeeds.
        let here = cur.i;
        if let Some(token) = try_parse_tag(&mut cur) {
            flush(&mut out, markup, text_start, here);
            text_start = cur.i;
            out.push(token);
            continue;
        }
        if let Some(token) = try_parse_entity(&mut cur) {
            flush(&mut out, markup, text_start, here);
            text_start = cur.i;
            out.push(token);
            continue;
        }
        cur.bump();
    }
    flush(&mut out, markup, text_start, cur.i);
    out
}

/// Attempts to parse a tag at the current position. On failure the cursor is
/// restored and the `<` is treated as literal text by the caller.
fn try_parse_tag<'a>(cur: &mut Cursor<'a>) -> Option<Token<'a>> {
    if cur.peek() != Some(b'<') {
        return None;
    }
    let saved = cur.clone();
    let start = cur.i;
    cur.bump(); // <

    let closing = cur.peek() == Some(b'/');
    if closing {
        cur.bump();
    }

    let name_start = cur.i;
    while let Some(b) = cur.peek() {
        if b.is_ascii_alphanumeric() {
            cur.bump();
        } else {
            break;
        }
    }
    if cur.i == name_start {
        // "<" not followed by a name, e.g. "a < b".
        *cur = saved;
        return None;
    }
    let name = cur.s[name_start..cur.i].to_ascii_lowercase();

    while let Some(b) = cur.peek() {
        if b == b'>' {
            break;
        }
        cur.bump();
    }
    if cur.peek() != Some(b'>') {
        *cur = saved;
        return None;
    }
    cur.bump(); // >

    let raw = &cur.s[start..cur.i];
    if closing {
        return Some(Token::Close { name, raw });
    }
    if raw.ends_with("/>") || VOID_TAGS.contains(&name.as_str()) {
        return Some(Token::Void(raw));
    }
    Some(Token::Open { name, raw })
}

fn try_parse_entity<'a>(cur: &mut Cursor<'a>) -> Option<Token<'a>> {
    if cur.peek() != Some(b'&') {
        return None;
    }
    let saved = cur.clone();
    let start = cur.i;
    cur.bump(); // &

    let body_start = cur.i;
    while let Some(b) = cur.peek() {
        if b.is_ascii_alphanumeric() || b == b'#' {
            cur.bump();
        } else {
            break;
        }
    }
    if cur.i == body_start || cur.peek() != Some(b';') {
        *cur = saved;
        return None;
    }
    cur.bump(); // ;
    Some(Token::Entity(&cur.s[start..cur.i]))
}

/// Number of visible caret positions in a markup string.
pub fn visible_len(markup: &str) -> usize {
    tokenize(markup).iter().map(Token::width).sum()
}

/// True when the markup renders to nothing but whitespace (tags stripped,
/// entities decoded — `&nbsp;` is blank, `&amp;` is not).
pub fn is_blank(markup: &str) -> bool {
    tokenize(markup).iter().all(|token| match token {
        Token::Text(raw) => raw.trim().is_empty(),
        // NBSP decodes to U+00A0, which `trim` treats as whitespace.
        Token::Entity(raw) => html_escape::decode_html_entities(*raw).trim().is_empty(),
        _ => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_token() {
        assert_eq!(tokenize("hello"), vec![Token::Text("hello")]);
    }

    #[test]
    fn tags_and_text_interleave() {
        let tokens = tokenize("a <b>bold</b> z");
        assert_eq!(
            tokens,
            vec![
                Token::Text("a "),
                Token::Open {
                    name: "b".to_string(),
                    raw: "<b>"
                },
                Token::Text("bold"),
                Token::Close {
                    name: "b".to_string(),
                    raw: "</b>"
                },
                Token::Text(" z"),
            ]
        );
    }

    #[test]
    fn attributes_stay_in_raw() {
        let tokens = tokenize(r#"<a href="/x">y</a>"#);
        assert_eq!(
            tokens[0],
            Token::Open {
                name: "a".to_string(),
                raw: r#"<a href="/x">"#
            }
        );
    }

    #[test]
    fn unclosed_angle_bracket_is_text() {
        assert_eq!(tokenize("a < b"), vec![Token::Text("a < b")]);
        assert_eq!(tokenize("2<3"), vec![Token::Text("2<3")]);
    }

    #[test]
    fn entities_count_as_one_position() {
        let markup = "a&amp;b";
        assert_eq!(
            tokenize(markup),
            vec![
                Token::Text("a"),
                Token::Entity("&amp;"),
                Token::Text("b"),
            ]
        );
        assert_eq!(visible_len(markup), 3);
    }

    #[test]
    fn bare_ampersand_is_text() {
        assert_eq!(tokenize("a & b"), vec![Token::Text("a & b")]);
    }

    #[test]
    fn void_tags_have_zero_width() {
        let tokens = tokenize("a<br>b");
        assert_eq!(tokens[1], Token::Void("<br>"));
        assert_eq!(visible_len("a<br>b"), 2);
    }

    #[test]
    fn visible_len_ignores_markup() {
        assert_eq!(visible_len("<b><i>hi</i></b>"), 2);
        assert_eq!(visible_len(""), 0);
    }

    #[test]
    fn blankness_is_entity_aware() {
        assert!(is_blank(""));
        assert!(is_blank("  "));
        assert!(is_blank("<b></b>"));
        assert!(is_blank("&nbsp;"));
        assert!(!is_blank("&amp;"));
        assert!(!is_blank("<b>x</b>"));
    }
}
