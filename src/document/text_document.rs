use super::{Document, DocumentId, Line};
use crate::str_utils;

/// Owned, line-oriented document. Every mutation bumps `version`.
#[derive(Clone, Debug)]
pub struct TextDocument {
    id: DocumentId,
    version: u64,
    language_id: String,
    lines: Vec<String>,
}

impl TextDocument {
    pub fn new(id: DocumentId, language_id: impl Into<String>, text: &str) -> TextDocument {
        TextDocument {
            id,
            version: 0,
            language_id: language_id.into(),
            lines: str_utils::split_lines(text),
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.lines = str_utils::split_lines(text);
        self.version += 1;
    }

    pub fn replace_line(&mut self, idx: usize, content: &str) {
        if let Some(line) = self.lines.get_mut(idx) {
            *line = content.to_string();
            self.version += 1;
        }
    }

    pub fn set_language_id(&mut self, language_id: impl Into<String>) {
        self.language_id = language_id.into();
    }

    pub fn all_content(&self) -> String {
        self.lines.join("\n")
    }
}

impl Document for TextDocument {
    fn id(&self) -> DocumentId {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn language_id(&self) -> &str {
        &self.language_id
    }

    fn line_at(&self, idx: usize) -> Line<'_> {
        let content = self.lines.get(idx).map(String::as_str).unwrap_or("");
        Line::new(idx, content)
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }
}
