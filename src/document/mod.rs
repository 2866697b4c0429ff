pub mod line;
pub mod text_document;

pub use line::Line;
pub use text_document::TextDocument;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DocumentId(pub u64);

/// Read-only view of a document as the host editor exposes it.
///
/// `version` must change whenever the text changes; cached per-document
/// results are keyed on it.
pub trait Document {
    fn id(&self) -> DocumentId;
    fn version(&self) -> u64;
    fn language_id(&self) -> &str;
    fn line_at(&self, idx: usize) -> Line<'_>;
    fn line_count(&self) -> usize;
}
