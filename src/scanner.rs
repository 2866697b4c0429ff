use crate::document::Document;

const TAB: u8 = b'\t';
const SPACE: u8 = b' ';

/// One indent unit: `start..end` columns on `line`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct IndentRange {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl IndentRange {
    pub fn new(line: usize, start: usize, end: usize) -> IndentRange {
        IndentRange { line, start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Splits the leading indentation of `text` into indent units.
///
/// A tab is always one unit. Otherwise the next `tab_size` characters must
/// all be spaces to form a unit; anything else ends the scan, so a partial
/// run of spaces is never reported. With `tab_size == 0` only tabs match.
///
/// Indentation is ASCII, so the byte offsets walked here are also character
/// columns for every range that gets emitted.
pub fn scan_line(line: usize, text: &str, tab_size: usize) -> Vec<IndentRange> {
    let bytes = text.as_bytes();
    let mut ranges = Vec::new();
    let mut column = 0;

    while column < bytes.len() {
        if bytes[column] == TAB {
            ranges.push(IndentRange::new(line, column, column + 1));
            column += 1;
        } else if is_space_unit(&bytes[column..], tab_size) {
            ranges.push(IndentRange::new(line, column, column + tab_size));
            column += tab_size;
        } else {
            break;
        }
    }

    ranges
}

/// Scans every line of `document`, ordered by line then column.
pub fn scan_document(document: &dyn Document, tab_size: usize) -> Vec<IndentRange> {
    (0..document.line_count())
        .flat_map(|idx| scan_line(idx, document.line_at(idx).content, tab_size))
        .collect()
}

fn is_space_unit(rest: &[u8], tab_size: usize) -> bool {
    tab_size > 0 && rest.len() >= tab_size && rest[..tab_size].iter().all(|b| *b == SPACE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentId, TextDocument};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn tabs_are_single_units() {
        let ranges = scan_line(0, "\t\tx", 4);
        assert_eq!(
            ranges,
            vec![IndentRange::new(0, 0, 1), IndentRange::new(0, 1, 2)]
        );
    }

    #[test]
    fn full_space_runs_are_units() {
        let ranges = scan_line(3, "        x", 4);
        assert_eq!(
            ranges,
            vec![IndentRange::new(3, 0, 4), IndentRange::new(3, 4, 8)]
        );
    }

    #[test]
    fn partial_space_run_is_not_a_unit() {
        assert_eq!(scan_line(0, "  x", 4), Vec::<IndentRange>::new());
        assert_eq!(scan_line(0, "      x", 4), vec![IndentRange::new(0, 0, 4)]);
    }

    #[test]
    fn mixed_tabs_and_spaces() {
        let ranges = scan_line(0, "\t  \t x", 2);
        assert_eq!(
            ranges,
            vec![
                IndentRange::new(0, 0, 1),
                IndentRange::new(0, 1, 3),
                IndentRange::new(0, 3, 4),
            ]
        );
    }

    #[test]
    fn whitespace_after_content_is_ignored() {
        assert_eq!(scan_line(0, "x\t    y", 4), Vec::<IndentRange>::new());
    }

    #[test]
    fn whitespace_only_line_is_fully_scanned() {
        assert_eq!(
            scan_line(0, "    \t", 4),
            vec![IndentRange::new(0, 0, 4), IndentRange::new(0, 4, 5)]
        );
    }

    #[test]
    fn space_run_reaching_end_of_line_must_be_complete() {
        assert_eq!(scan_line(0, "     ", 4), vec![IndentRange::new(0, 0, 4)]);
        assert_eq!(scan_line(0, "   ", 4), Vec::<IndentRange>::new());
    }

    #[test]
    fn zero_tab_size_matches_tabs_only() {
        assert_eq!(scan_line(0, "    x", 0), Vec::<IndentRange>::new());
        assert_eq!(
            scan_line(0, "\t  x", 0),
            vec![IndentRange::new(0, 0, 1)]
        );
    }

    #[test]
    fn empty_line_has_no_units() {
        assert_eq!(scan_line(0, "", 4), Vec::<IndentRange>::new());
    }

    #[test]
    fn non_ascii_content_after_indent() {
        assert_eq!(scan_line(0, "  é", 2), vec![IndentRange::new(0, 0, 2)]);
    }

    #[test]
    fn scan_document_concatenates_lines_in_order() {
        let document = TextDocument::new(DocumentId(1), "python", "def f():\n  a\n\t\tb\n   c");
        let ranges = scan_document(&document, 2);
        assert_eq!(
            ranges,
            vec![
                IndentRange::new(1, 0, 2),
                IndentRange::new(2, 0, 1),
                IndentRange::new(2, 1, 2),
                IndentRange::new(3, 0, 2),
            ]
        );
    }

    proptest! {
        #[test]
        fn k_tabs_yield_k_single_column_units(k in 0usize..32, tab_size in 1usize..16) {
            let line = format!("{}x", "\t".repeat(k));
            let ranges = scan_line(0, &line, tab_size);
            let expected = (0..k).map(|c| IndentRange::new(0, c, c + 1)).collect::<Vec<_>>();
            prop_assert_eq!(ranges, expected);
        }

        #[test]
        fn m_space_runs_yield_m_units(m in 0usize..16, tab_size in 1usize..9) {
            let line = format!("{}x", " ".repeat(m * tab_size));
            let ranges = scan_line(0, &line, tab_size);
            prop_assert_eq!(ranges.len(), m);
            for (i, range) in ranges.iter().enumerate() {
                prop_assert_eq!(*range, IndentRange::new(0, i * tab_size, (i + 1) * tab_size));
            }
        }

        #[test]
        fn partial_remainder_is_never_covered(m in 0usize..8, tab_size in 2usize..9, extra in 1usize..8) {
            let extra = extra % tab_size;
            prop_assume!(extra > 0);
            let line = format!("{}x", " ".repeat(m * tab_size + extra));
            let ranges = scan_line(0, &line, tab_size);
            prop_assert_eq!(ranges.len(), m);
            prop_assert!(ranges.iter().all(|r| r.end <= m * tab_size));
        }
    }
}
