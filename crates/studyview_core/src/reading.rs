/// Which rendition of the material is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentView {
    #[default]
    Original,
    MicroUnits,
    Simplified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingMode {
    #[default]
    Normal,
    /// Dims everything but the paragraph in focus; rendering only.
    Focus,
    /// Bolds the leading half of every word.
    Bionic,
}

impl ReadingMode {
    /// Renders `source` for this mode. The source itself is never modified.
    pub fn render(self, source: &str) -> String {
        match self {
            ReadingMode::Normal | ReadingMode::Focus => source.to_string(),
            ReadingMode::Bionic => bionic_markup(source),
        }
    }
}

/// Bionic transform over markup: tags pass through, text between them is
/// split on single spaces and each word longer than one character gets its
/// first `ceil(len / 2)` characters wrapped in `<strong>`.
pub fn bionic_markup(source: &str) -> String {
    let mut out = String::with_capacity(source.len() * 2);
    let mut rest = source;
    while let Some(open) = rest.find('<') {
        let (text, tail) = rest.split_at(open);
        out.push_str(&bionic_text(text));
        match tail.find('>') {
            Some(close) => {
                out.push_str(&tail[..=close]);
                rest = &tail[close + 1..];
            }
            None => {
                rest = tail;
                break;
            }
        }
    }
    if !rest.is_empty() {
        out.push_str(&bionic_text(rest));
    }
    out
}

fn bionic_text(text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }
    text.split(' ').map(bionic_word).collect::<Vec<_>>().join(" ")
}

fn bionic_word(word: &str) -> String {
    let starts = char_starts(word);
    if starts.len() <= 1 {
        return word.to_string();
    }
    let midpoint = starts.len().div_ceil(2);
    let split_at = starts.get(midpoint).copied().unwrap_or(word.len());
    format!("<strong>{}</strong>{}", &word[..split_at], &word[split_at..])
}

/// Byte offsets where each visible character starts; an HTML entity such as
/// `&amp;` counts as a single character.
fn char_starts(word: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut chars = word.char_indices().peekable();
    while let Some((start, ch)) = chars.next() {
        starts.push(start);
        if ch == '&' {
            if let Some(len) = entity_len(&word[start..]) {
                while chars.peek().is_some_and(|(idx, _)| *idx < start + len) {
                    chars.next();
                }
            }
        }
    }
    starts
}

fn entity_len(tail: &str) -> Option<usize> {
    let end = tail.find(';')?;
    let body = &tail[1..end];
    let valid = !body.is_empty()
        && body.len() <= 10
        && body
            .strip_prefix('#')
            .unwrap_or(body)
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric());
    valid.then_some(end + 1)
}
