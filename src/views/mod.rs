mod depicts;
mod map;

pub use depicts::{DepictsView, TreemapCell};
pub use map::{MapView, RegionShade};

use serde::{Deserialize, Serialize};

use crate::filter::{FilterCommand, FilterListener};

/// Pointer events as seen by a view, independent of any UI toolkit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Interaction {
    /// The pointer entered the element with this id (tag or region name).
    PointerEnter { id: String },
    PointerMove { x: f64, y: f64 },
    PointerLeave,
}

impl Interaction {
    pub fn enter(id: impl Into<String>) -> Self {
        Interaction::PointerEnter { id: id.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewId {
    Depicts,
    Map,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tooltip {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub visible: bool,
}

impl Tooltip {
    fn show(&mut self, text: String) {
        self.text = text;
        self.visible = true;
    }

    fn move_to(&mut self, x: f64, y: f64, offset: [f64; 2]) {
        self.x = x + offset[0];
        self.y = y + offset[1];
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}

/// A view that re-renders on filter changes and may publish a filter of
/// its own when the pointer moves over it.
pub trait LinkedView: FilterListener {
    fn interact(&mut self, interaction: &Interaction) -> Option<FilterCommand>;
}
