//! Caption text utilities.

/// Default character budget per caption line.
pub const DEFAULT_WRAP_WIDTH: usize = 50;

/// Re-flow `text` into newline-joined lines of at most `width` characters.
///
/// Words are packed greedily and separated by single spaces. A word longer
/// than `width` occupies its own line and is never split. Lengths are counted
/// in `char`s. With `width == 0` every word lands on its own line.
pub fn wrap_text(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}
