/// Greedy word wrap at `width` columns.
///
/// Whitespace runs collapse to a single space; words longer than `width` are
/// split into `width`-sized pieces. Columns are counted in chars.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut rest = word;
        loop {
            let len = rest.chars().count();
            let needed = if current_len == 0 { len } else { current_len + 1 + len };
            if needed <= width {
                if current_len > 0 {
                    current.push(' ');
                }
                current.push_str(rest);
                current_len = needed;
                break;
            }
            if len <= width {
                // fits on a fresh line
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }
            // overlong word: fill what is left of this line, or a whole line
            let room = if current_len == 0 {
                width
            } else {
                width.saturating_sub(current_len + 1)
            };
            if room == 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }
            let split = rest.char_indices().nth(room).map(|(i, _)| i).unwrap_or(rest.len());
            if current_len > 0 {
                current.push(' ');
            }
            current.push_str(&rest[..split]);
            lines.push(std::mem::take(&mut current));
            current_len = 0;
            rest = &rest[split..];
        }
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}
