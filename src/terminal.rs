use crate::config::{ConfigWarning, MARKER_COLOR_TOKEN};
use crate::document::Document;
use crate::host::{EditorId, Host, HostError, MarkerFactory, WarningAction};
use crate::registry::MarkerStyle;
use crate::scanner::IndentRange;

use crossterm::{
    queue,
    style::{style, Color, Print, PrintStyledContent, Stylize},
};
use std::collections::HashMap;
use std::io::Write;

const MIN_WIDTH_LINE_NUMBER: usize = 3;
const DEFAULT_MARKER_BACKGROUND: Color = Color::Rgb {
    r: 59,
    g: 66,
    b: 82,
};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MarkerId(u64);

/// Host that draws documents to a terminal, replacing every decorated indent
/// unit with its marker's filler on the marker background.
#[derive(Debug, Default)]
pub struct TerminalHost {
    theme: HashMap<String, String>,
    markers: HashMap<MarkerId, MarkerStyle>,
    next_marker: u64,
    decorations: HashMap<EditorId, HashMap<MarkerId, Vec<IndentRange>>>,
    notifications: Vec<String>,
}

impl TerminalHost {
    pub fn new(theme: HashMap<String, String>) -> TerminalHost {
        TerminalHost {
            theme,
            ..TerminalHost::default()
        }
    }

    pub fn set_theme(&mut self, theme: HashMap<String, String>) {
        self.theme = theme;
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notifications)
    }

    /// Applied ranges for `editor` with the marker width covering each,
    /// ordered by line then column.
    pub fn decorations(&self, editor: EditorId) -> Vec<(IndentRange, u32)> {
        let mut decorations = match self.decorations.get(&editor) {
            Some(by_marker) => by_marker
                .iter()
                .filter_map(|(marker, ranges)| {
                    self.markers
                        .get(marker)
                        .map(|style| ranges.iter().map(move |range| (*range, style.width)))
                })
                .flatten()
                .collect::<Vec<(IndentRange, u32)>>(),
            None => vec![],
        };
        decorations.sort();

        decorations
    }

    pub fn marker_background(&self, token: &str) -> Color {
        self.theme
            .get(token)
            .and_then(|value| parse_hex_color(value))
            .unwrap_or(DEFAULT_MARKER_BACKGROUND)
    }

    pub fn render(
        &self,
        screen: &mut impl Write,
        editor: EditorId,
        document: &dyn Document,
    ) -> Result<(), HostError> {
        let background = self.marker_background(MARKER_COLOR_TOKEN);
        let gutter_width = line_number_width(document.line_count());
        let decorations = self.decorations(editor);
        let mut decorations = decorations.iter().peekable();

        for line_index in 0..document.line_count() {
            let line = document.line_at(line_index);
            let gutter = format!(
                "{:>min_width$} ",
                line_index + 1,
                min_width = gutter_width - 1
            );
            queue!(screen, PrintStyledContent(style(gutter).with(Color::Blue)))?;

            let mut column = 0;
            while let Some((range, width)) = decorations.peek() {
                if range.line != line_index {
                    break;
                }
                // overlapping ranges from another marker never draw twice
                if range.start < column {
                    decorations.next();
                    continue;
                }
                if let Some(text) = line.content.get(column..range.start) {
                    queue!(screen, Print(text))?;
                }
                let filler = MarkerStyle::for_width(*width).filler;
                queue!(screen, PrintStyledContent(style(filler).on(background)))?;
                column = range.end;
                decorations.next();
            }
            if let Some(text) = line.content.get(column..) {
                queue!(screen, Print(text))?;
            }
            queue!(screen, Print("\n"))?;
        }
        screen.flush()?;

        Ok(())
    }
}

impl MarkerFactory for TerminalHost {
    type Marker = MarkerId;

    fn create_marker(&mut self, style: &MarkerStyle) -> MarkerId {
        let marker = MarkerId(self.next_marker);
        self.next_marker += 1;
        self.markers.insert(marker, style.clone());

        marker
    }

    fn dispose_marker(&mut self, marker: MarkerId) {
        self.markers.remove(&marker);
        for by_marker in self.decorations.values_mut() {
            by_marker.remove(&marker);
        }
    }
}

impl Host for TerminalHost {
    fn apply_markers(
        &mut self,
        editor: EditorId,
        marker: &MarkerId,
        ranges: &[IndentRange],
    ) -> Result<(), HostError> {
        if !self.markers.contains_key(marker) {
            return Err(HostError::MarkerDisposed);
        }
        self.decorations
            .entry(editor)
            .or_default()
            .insert(*marker, ranges.to_vec());

        Ok(())
    }

    fn show_warning(&mut self, warning: &ConfigWarning, actions: &[WarningAction]) {
        let actions = actions
            .iter()
            .map(|action| action.title())
            .collect::<Vec<&str>>();
        self.notifications
            .push(format!("warning: {} [{}]", warning, actions.join(", ")));
    }
}

fn line_number_width(line_count: usize) -> usize {
    // Number of columns the display of line numbers will require: max(3, num_digits) + 1 space
    let line_number_digits = line_count.to_string().len();
    std::cmp::max(MIN_WIDTH_LINE_NUMBER, line_number_digits) + 1
}

/// Parses `#rrggbb` (an `#rrggbbaa` alpha suffix is ignored).
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#')?;
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return None;
    }
    let channel = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16).ok();

    Some(Color::Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidthError;
    use crate::document::{DocumentId, TextDocument};
    use crate::registry::FILLER;

    fn rendered(host: &TerminalHost, editor: EditorId, document: &TextDocument) -> String {
        let mut screen = Vec::new();
        host.render(&mut screen, editor, document).unwrap();
        String::from_utf8(screen).unwrap()
    }

    #[test]
    fn line_number_width_correct() {
        assert_eq!(line_number_width(1), 4);
        assert_eq!(line_number_width(999), 4);
        assert_eq!(line_number_width(1000), 5);
    }

    #[test]
    fn parse_hex_color_correct() {
        assert_eq!(
            parse_hex_color("#3b4252"),
            Some(Color::Rgb {
                r: 59,
                g: 66,
                b: 82
            })
        );
        assert_eq!(
            parse_hex_color("#ff000080"),
            Some(Color::Rgb { r: 255, g: 0, b: 0 })
        );
        assert_eq!(parse_hex_color("3b4252"), None);
        assert_eq!(parse_hex_color("#3b42"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn marker_background_falls_back_to_default() {
        let mut host = TerminalHost::default();
        assert_eq!(
            host.marker_background(MARKER_COLOR_TOKEN),
            DEFAULT_MARKER_BACKGROUND
        );

        let mut theme = HashMap::new();
        theme.insert(String::from(MARKER_COLOR_TOKEN), String::from("#010203"));
        host.set_theme(theme);
        assert_eq!(
            host.marker_background(MARKER_COLOR_TOKEN),
            Color::Rgb { r: 1, g: 2, b: 3 }
        );
    }

    #[test]
    fn apply_replaces_previous_ranges_of_same_marker() {
        let mut host = TerminalHost::default();
        let marker = host.create_marker(&MarkerStyle::for_width(2));
        let editor = EditorId(1);

        host.apply_markers(editor, &marker, &[IndentRange::new(0, 0, 4), IndentRange::new(1, 0, 4)])
            .unwrap();
        host.apply_markers(editor, &marker, &[IndentRange::new(2, 0, 1)])
            .unwrap();

        assert_eq!(host.decorations(editor), vec![(IndentRange::new(2, 0, 1), 2)]);
    }

    #[test]
    fn dispose_clears_decorations() {
        let mut host = TerminalHost::default();
        let marker = host.create_marker(&MarkerStyle::for_width(2));
        host.apply_markers(EditorId(1), &marker, &[IndentRange::new(0, 0, 1)])
            .unwrap();

        host.dispose_marker(marker);

        assert!(host.decorations(EditorId(1)).is_empty());
        assert_eq!(host.marker_count(), 0);
        assert!(matches!(
            host.apply_markers(EditorId(1), &marker, &[]),
            Err(HostError::MarkerDisposed)
        ));
    }

    #[test]
    fn show_warning_records_notification() {
        let mut host = TerminalHost::default();
        host.show_warning(
            &ConfigWarning::InvalidDefault {
                reason: WidthError::NotPositive,
            },
            &[WarningAction::OpenSettings],
        );

        assert_eq!(
            host.take_notifications(),
            vec![String::from(
                "warning: indentMask.indentSize must be greater than 0 [Open Settings]"
            )]
        );
        assert!(host.notifications().is_empty());
    }

    #[test]
    fn render_replaces_indent_units_with_filler() {
        let mut host = TerminalHost::default();
        let document = TextDocument::new(DocumentId(1), "python", "def f():\n        return 1");
        let marker = host.create_marker(&MarkerStyle::for_width(1));
        host.apply_markers(
            EditorId(1),
            &marker,
            &[IndentRange::new(1, 0, 4), IndentRange::new(1, 4, 8)],
        )
        .unwrap();

        let output = rendered(&host, EditorId(1), &document);

        assert!(output.contains("def f():"));
        assert!(output.contains("return 1"));
        assert!(!output.contains("    return"));
        assert_eq!(output.matches(FILLER).count(), 2);
        assert_eq!(output.matches('\n').count(), 2);
    }

    #[test]
    fn render_draws_overlapping_ranges_once() {
        let mut host = TerminalHost::default();
        let document = TextDocument::new(DocumentId(1), "python", "    x");
        let narrow = host.create_marker(&MarkerStyle::for_width(2));
        let wide = host.create_marker(&MarkerStyle::for_width(4));
        host.apply_markers(EditorId(1), &narrow, &[IndentRange::new(0, 0, 4)])
            .unwrap();
        host.apply_markers(EditorId(1), &wide, &[IndentRange::new(0, 0, 4)])
            .unwrap();

        let output = rendered(&host, EditorId(1), &document);

        assert_eq!(output.matches(FILLER).count(), 2);
        assert!(output.contains('x'));
    }

    #[test]
    fn render_without_decorations_prints_text_unchanged() {
        let host = TerminalHost::default();
        let document = TextDocument::new(DocumentId(1), "python", "    x");

        let output = rendered(&host, EditorId(1), &document);

        assert!(output.contains("    x"));
        assert_eq!(output.matches(FILLER).count(), 0);
    }
}
