use crate::config::{ConfigWarning, SECTION, THEME_SECTION};
use crate::document::{Document, DocumentId};
use crate::registry::MarkerStyle;
use crate::scanner::IndentRange;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EditorId(pub u64);

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EditorOptions {
    /// Explicit tab width reported by the host, if any.
    pub tab_size: Option<usize>,
}

/// An editor currently shown by the host, and the document inside it.
#[derive(Clone, Copy)]
pub struct VisibleEditor<'a> {
    pub id: EditorId,
    pub document: &'a dyn Document,
    pub options: EditorOptions,
}

impl<'a> VisibleEditor<'a> {
    pub fn new(id: EditorId, document: &'a dyn Document, options: EditorOptions) -> VisibleEditor<'a> {
        VisibleEditor {
            id,
            document,
            options,
        }
    }
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("editor {0:?} is not visible")]
    EditorNotVisible(EditorId),

    #[error("marker has already been disposed")]
    MarkerDisposed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WarningAction {
    OpenSettings,
}

impl WarningAction {
    pub fn title(&self) -> &'static str {
        match self {
            WarningAction::OpenSettings => "Open Settings",
        }
    }
}

/// Creates and releases markers: the host's rendering primitive for one
/// indent unit of a given width.
pub trait MarkerFactory {
    type Marker;

    fn create_marker(&mut self, style: &MarkerStyle) -> Self::Marker;

    /// Releasing a marker also removes it from every editor it was applied to.
    fn dispose_marker(&mut self, marker: Self::Marker);
}

pub trait Host: MarkerFactory {
    /// Replaces whatever ranges `marker` previously covered in `editor`.
    fn apply_markers(
        &mut self,
        editor: EditorId,
        marker: &Self::Marker,
        ranges: &[IndentRange],
    ) -> Result<(), HostError>;

    fn show_warning(&mut self, warning: &ConfigWarning, actions: &[WarningAction]);
}

/// The configuration keys touched by one change notification.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConfigurationChange {
    keys: Vec<String>,
}

impl ConfigurationChange {
    pub fn new<I, S>(keys: I) -> ConfigurationChange
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ConfigurationChange {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// True when a changed key is `section`, lies inside it, or contains it.
    pub fn affects(&self, section: &str) -> bool {
        self.keys
            .iter()
            .any(|key| is_within(key, section) || is_within(section, key))
    }

    pub fn is_relevant(&self) -> bool {
        self.affects(SECTION) || self.affects(THEME_SECTION)
    }
}

fn is_within(key: &str, section: &str) -> bool {
    match key.strip_prefix(section) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HostEvent {
    ConfigurationChanged(ConfigurationChange),
    SelectionChanged(EditorId),
    DocumentClosed(DocumentId),
}
