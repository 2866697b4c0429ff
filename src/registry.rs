use crate::config::{WidthMapping, MARKER_COLOR_TOKEN};
use crate::host::MarkerFactory;
use std::collections::BTreeMap;
use tracing::debug;

/// Filler character a marker is drawn with. Its glyph is irrelevant; only the
/// count matters, so per-character backgrounds line up with the masked text.
pub const FILLER: char = '\u{00a0}';

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarkerStyle {
    pub width: u32,
    /// Exactly `width` filler characters.
    pub filler: String,
    pub color_token: &'static str,
    /// The marker takes no horizontal space of its own.
    pub zero_advance: bool,
}

impl MarkerStyle {
    pub fn for_width(width: u32) -> MarkerStyle {
        MarkerStyle {
            width,
            filler: std::iter::repeat(FILLER).take(width as usize).collect(),
            color_token: MARKER_COLOR_TOKEN,
            zero_advance: true,
        }
    }
}

/// One marker per distinct configured width.
#[derive(Debug)]
pub struct MarkerRegistry<M> {
    markers: BTreeMap<u32, M>,
}

impl<M> Default for MarkerRegistry<M> {
    fn default() -> MarkerRegistry<M> {
        MarkerRegistry::empty()
    }
}

impl<M> MarkerRegistry<M> {
    pub fn empty() -> MarkerRegistry<M> {
        MarkerRegistry {
            markers: BTreeMap::new(),
        }
    }

    /// Creates markers for every positive width in `mapping`, smallest first.
    pub fn build<F>(mapping: &WidthMapping, factory: &mut F) -> MarkerRegistry<M>
    where
        F: MarkerFactory<Marker = M>,
    {
        let markers = mapping
            .distinct_widths()
            .into_iter()
            .map(|width| (width, factory.create_marker(&MarkerStyle::for_width(width))))
            .collect::<BTreeMap<u32, M>>();
        debug!(widths = ?markers.keys().collect::<Vec<_>>(), "built marker registry");

        MarkerRegistry { markers }
    }

    pub fn marker_for(&self, width: u32) -> Option<&M> {
        self.markers.get(&width)
    }

    pub fn widths(&self) -> impl Iterator<Item = u32> + '_ {
        self.markers.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &M)> + '_ {
        self.markers.iter().map(|(width, marker)| (*width, marker))
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn dispose<F>(self, factory: &mut F)
    where
        F: MarkerFactory<Marker = M>,
    {
        for (_, marker) in self.markers {
            factory.dispose_marker(marker);
        }
    }
}
