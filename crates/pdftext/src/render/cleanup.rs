/// Normalize raw lines into the final text.
///
/// Each line is trimmed. Blank lines are kept only directly after a
/// non-blank line, so runs collapse to a single blank line and leading
/// blanks disappear. The result ends with exactly one `\n`, unless it is
/// empty.
pub fn normalize_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cleaned: Vec<String> = Vec::new();

    for line in lines {
        let stripped = line.as_ref().trim();
        if stripped.is_empty() {
            if cleaned.last().is_some_and(|prev| !prev.is_empty()) {
                cleaned.push(String::new());
            }
            continue;
        }
        cleaned.push(stripped.to_string());
    }

    let mut text = cleaned.join("\n");
    text.truncate(text.trim_end().len());
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

/// Flatten per-page text into raw lines, with a blank line after every page.
pub fn page_lines<S: AsRef<str>>(pages: &[S]) -> Vec<String> {
    let mut lines = Vec::new();
    for page in pages {
        lines.extend(split_lines(page.as_ref()).map(str::to_string));
        lines.push(String::new());
    }
    lines
}

/// Split on every line boundary: `\r\n`, `\n`, `\r`, vertical tab, form feed,
/// the file/group/record separators, NEL, and the Unicode line and paragraph
/// separators.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text).filter(|t| !t.is_empty());
    std::iter::from_fn(move || {
        let current = rest?;
        match current.char_indices().find(|&(_, c)| is_line_break(c)) {
            Some((idx, c)) => {
                let mut next = idx + c.len_utf8();
                if c == '\r' && current[next..].starts_with('\n') {
                    next += 1;
                }
                rest = Some(&current[next..]).filter(|t| !t.is_empty());
                Some(&current[..idx])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0B}'
            | '\u{0C}'
            | '\u{1C}'
            | '\u{1D}'
            | '\u{1E}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}
