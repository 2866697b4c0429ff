use crate::config::{self, ConfigWarning, Settings, WidthMapping};
use crate::document::DocumentId;
use crate::host::{Host, HostError, HostEvent, VisibleEditor, WarningAction};
use crate::registry::MarkerRegistry;
use crate::scanner;
use crate::tab_size::{InferenceScope, TabSizeCache};
use tracing::{debug, warn};

/// Configuration in effect between two configuration changes.
#[derive(Debug)]
pub struct ConfigSnapshot<M> {
    pub enabled: bool,
    pub mapping: WidthMapping,
    pub registry: MarkerRegistry<M>,
}

impl<M> Default for ConfigSnapshot<M> {
    fn default() -> ConfigSnapshot<M> {
        ConfigSnapshot {
            enabled: false,
            mapping: WidthMapping::default(),
            registry: MarkerRegistry::empty(),
        }
    }
}

/// Outcome of updating a single editor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EditorUpdate {
    /// Markers were applied; `ranges` indent units are covered.
    Applied { width: u32, tab_size: usize, ranges: usize },
    /// Nothing to decorate: disabled, or no marker for the width.
    Skipped,
}

/// Owns the configuration snapshot and keeps visible editors decorated.
///
/// Starts disabled with no markers; call `update_configuration` first.
#[derive(Debug)]
pub struct IndentController<M> {
    snapshot: ConfigSnapshot<M>,
    tab_sizes: TabSizeCache,
    scope: InferenceScope,
}

impl<M> Default for IndentController<M> {
    fn default() -> IndentController<M> {
        IndentController::new()
    }
}

impl<M> IndentController<M> {
    pub fn new() -> IndentController<M> {
        IndentController::with_scope(InferenceScope::default())
    }

    pub fn with_scope(scope: InferenceScope) -> IndentController<M> {
        IndentController {
            snapshot: ConfigSnapshot::default(),
            tab_sizes: TabSizeCache::new(),
            scope,
        }
    }

    pub fn snapshot(&self) -> &ConfigSnapshot<M> {
        &self.snapshot
    }

    /// Rebuilds the snapshot from `settings`, then releases the previous
    /// markers. Every warning is logged and shown through the host.
    pub fn update_configuration<H>(&mut self, host: &mut H, settings: &Settings) -> Vec<ConfigWarning>
    where
        H: Host<Marker = M>,
    {
        let resolution = config::resolve(settings.indent_size.as_ref());
        for warning in &resolution.warnings {
            warn!(%warning, "ignoring invalid configuration value");
            host.show_warning(warning, &[WarningAction::OpenSettings]);
        }

        let registry = if settings.enabled {
            MarkerRegistry::build(&resolution.mapping, host)
        } else {
            MarkerRegistry::empty()
        };
        let previous = std::mem::replace(
            &mut self.snapshot,
            ConfigSnapshot {
                enabled: settings.enabled,
                mapping: resolution.mapping,
                registry,
            },
        );
        previous.registry.dispose(host);
        debug!(
            enabled = self.snapshot.enabled,
            default_width = self.snapshot.mapping.default_width(),
            markers = self.snapshot.registry.len(),
            "configuration updated"
        );

        resolution.warnings
    }

    pub fn update_editor<H>(&mut self, host: &mut H, editor: &VisibleEditor<'_>) -> Result<EditorUpdate, HostError>
    where
        H: Host<Marker = M>,
    {
        if !self.snapshot.enabled {
            return Ok(EditorUpdate::Skipped);
        }

        let document = editor.document;
        let width = self.snapshot.mapping.width_for(document.language_id());
        let marker = match self.snapshot.registry.marker_for(width) {
            Some(marker) => marker,
            None => return Ok(EditorUpdate::Skipped),
        };

        let tab_size = match editor.options.tab_size {
            Some(tab_size) => tab_size,
            None => self.tab_sizes.tab_size(document, self.scope),
        };
        let ranges = scanner::scan_document(document, tab_size);
        // the document may have switched width since the last update
        for (other_width, other) in self.snapshot.registry.iter() {
            if other_width != width {
                host.apply_markers(editor.id, other, &[])?;
            }
        }
        host.apply_markers(editor.id, marker, &ranges)?;
        debug!(editor = ?editor.id, width, tab_size, ranges = ranges.len(), "editor updated");

        Ok(EditorUpdate::Applied {
            width,
            tab_size,
            ranges: ranges.len(),
        })
    }

    /// Updates every editor, logging failures instead of stopping at them.
    /// Returns how many editors were updated without error.
    pub fn update_editors<H>(&mut self, host: &mut H, editors: &[VisibleEditor<'_>]) -> usize
    where
        H: Host<Marker = M>,
    {
        let mut updated = 0;
        for editor in editors {
            match self.update_editor(host, editor) {
                Ok(_) => updated += 1,
                Err(error) => warn!(editor = ?editor.id, %error, "failed to update editor"),
            }
        }

        updated
    }

    pub fn handle_event<H>(
        &mut self,
        host: &mut H,
        event: &HostEvent,
        settings: &Settings,
        editors: &[VisibleEditor<'_>],
    ) where
        H: Host<Marker = M>,
    {
        match event {
            HostEvent::ConfigurationChanged(change) => {
                if change.is_relevant() {
                    self.update_configuration(host, settings);
                    self.update_editors(host, editors);
                }
            }
            HostEvent::SelectionChanged(id) => {
                let selected = editors
                    .iter()
                    .copied()
                    .filter(|editor| editor.id == *id)
                    .collect::<Vec<VisibleEditor<'_>>>();
                self.update_editors(host, &selected);
            }
            HostEvent::DocumentClosed(document) => self.document_closed(*document),
        }
    }

    /// Drops the cached tab size of a document the host has closed.
    pub fn document_closed(&mut self, document: DocumentId) {
        self.tab_sizes.forget(document);
    }

    pub fn dispose<H>(self, host: &mut H)
    where
        H: Host<Marker = M>,
    {
        self.snapshot.registry.dispose(host);
    }
}
