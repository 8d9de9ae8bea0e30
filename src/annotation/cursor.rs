//! A tiny forward-only reader shared by the per-tag grammars.

/// `\w` in the annotation grammar: ASCII letters, digits and underscore.
pub(crate) fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Unconsumed input
    pub(crate) fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_str(&mut self, expected: &str) -> bool {
        if self.rest().starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    /// Consume the longest prefix whose chars satisfy `pred` (possibly empty).
    pub(crate) fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// Like [`Cursor::take_while`] but fails on an empty match.
    pub(crate) fn take_while1(&mut self, pred: impl Fn(char) -> bool) -> Option<&'a str> {
        let taken = self.take_while(pred);
        if taken.is_empty() {
            None
        } else {
            Some(taken)
        }
    }

    /// Consume exactly one whitespace char.
    pub(crate) fn eat_ws(&mut self) -> bool {
        match self.peek() {
            Some(c) if c.is_whitespace() => {
                self.pos += c.len_utf8();
                true
            }
            _ => false,
        }
    }

    /// Consume one or more whitespace chars.
    pub(crate) fn skip_ws1(&mut self) -> bool {
        !self.take_while(char::is_whitespace).is_empty()
    }

    pub(crate) fn skip_ws(&mut self) {
        self.take_while(char::is_whitespace);
    }
}

/// Try `parse` after every occurrence of `tag` that is followed by whitespace.
///
/// The first occurrence whose grammar matches wins. The cursor handed to
/// `parse` sits just past the single whitespace char following the tag.
pub(crate) fn scan_tag<'a, T>(
    line: &'a str,
    tag: &str,
    mut parse: impl FnMut(&mut Cursor<'a>) -> Option<T>,
) -> Option<T> {
    for (idx, _) in line.match_indices(tag) {
        let mut cursor = Cursor::new(&line[idx + tag.len()..]);
        if !cursor.eat_ws() {
            continue;
        }
        if let Some(value) = parse(&mut cursor) {
            return Some(value);
        }
    }
    None
}

/// Read the single `\w*` word following `tag`, e.g. `@apiName getItem`.
pub(crate) fn tag_word<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    scan_tag(line, tag, |c| Some(c.take_while(is_word)))
}
