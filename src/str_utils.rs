pub fn line_break_offsets(s: &str) -> Vec<usize> {
    s.bytes()
        .enumerate()
        .filter_map(|(i, b)| match b {
            0x0A => Some(i),
            _ => None,
        })
        .collect()
}

// Splits on '\n', dropping a trailing '\r' from each line. A trailing line
// break yields a final empty line, the way editors count lines.
pub fn split_lines(s: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut start = 0;
    for offset in line_break_offsets(s) {
        lines.push(strip_carriage_return(&s[start..offset]).to_string());
        start = offset + 1;
    }
    lines.push(strip_carriage_return(&s[start..]).to_string());

    lines
}

pub fn leading_space_count(s: &str) -> usize {
    s.bytes().take_while(|b| *b == b' ').count()
}

fn strip_carriage_return(s: &str) -> &str {
    s.strip_suffix('\r').unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_break_offsets_correct() {
        let mut line = String::from("");
        let mut offsets = line_break_offsets(&line);
        assert_eq!(vec![0usize; 0], offsets);

        line = String::from("abc\ndef\nghijk\nl");
        offsets = line_break_offsets(&line);
        assert_eq!(vec![3, 7, 13], offsets);
    }

    #[test]
    fn split_lines_empty_text_is_one_line() {
        assert_eq!(split_lines(""), vec![String::new()]);
    }

    #[test]
    fn split_lines_keeps_trailing_empty_line() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b", ""]);
    }

    #[test]
    fn split_lines_strips_crlf() {
        assert_eq!(split_lines("  a\r\n\tb"), vec!["  a", "\tb"]);
    }

    #[test]
    fn leading_space_count_stops_at_tab() {
        assert_eq!(leading_space_count("   \t  x"), 3);
        assert_eq!(leading_space_count("x   "), 0);
        assert_eq!(leading_space_count(""), 0);
    }
}
