//! Small text helpers.

/// Remove the common leading indentation from a multi-line string.
///
/// The indentation of the first indented line that starts with a word
/// character is stripped from every line carrying it. Blank first and last
/// lines are dropped; deeper indentation is kept relative to the rest.
pub fn dedent(text: &str) -> String {
    let indent = leading_indent(text);
    let lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len().saturating_sub(1);

    lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let blank = line.trim().is_empty();
            if blank && (index == 0 || index == last) {
                None
            } else {
                Some(line.strip_prefix(indent).unwrap_or(line))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn leading_indent(text: &str) -> &str {
    for line in text.split('\n') {
        let rest = line.trim_start_matches([' ', '\t']);
        let indent = &line[..line.len() - rest.len()];
        let starts_word = rest
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        if !indent.is_empty() && starts_word {
            return indent;
        }
    }
    ""
}

/// Count the characters a player actually reads.
pub fn visible_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}
