/// Half-open byte range `[start, end)` into a source string.
///
/// Both ends always fall on `char` boundaries of the string the span was
/// produced from, so slicing with it never panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    pub fn char_len(&self, source: &str) -> usize {
        self.slice(source).chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `s` into maximal runs of characters for which `is_boundary` is false.
pub fn fields_by<F>(s: &str, is_boundary: F) -> Vec<Span>
where
    F: Fn(char) -> bool,
{
    let mut spans = Vec::with_capacity(32);
    let mut field_start: Option<usize> = None;

    for (i, ch) in s.char_indices() {
        if is_boundary(ch) {
            if let Some(start) = field_start.take() {
                spans.push(Span::new(start, i));
            }
        } else if field_start.is_none() {
            field_start = Some(i);
        }
    }

    // Last field may run to the end of the string.
    if let Some(start) = field_start {
        spans.push(Span::new(start, s.len()));
    }

    spans
}

/// Whitespace-separated words of `s`.
pub fn fields(s: &str) -> Vec<Span> {
    fields_by(s, char::is_whitespace)
}
