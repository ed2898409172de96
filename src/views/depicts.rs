use serde::Serialize;
use tracing::{debug, warn};

use super::{Interaction, LinkedView, Tooltip};
use crate::aggregate::{FieldSelector, aggregate, drop_singletons};
use crate::color::Rgb;
use crate::config::TreemapConfig;
use crate::error::StructureError;
use crate::filter::{FilterCommand, FilterListener, FilterPredicate};
use crate::hierarchy::{self, SENTINEL_ROOT};
use crate::layout::{self, LabelPolicy, LayoutRect};
use crate::palette::ColorAssignment;
use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapCell {
    pub rect: LayoutRect,
    pub color: Rgb,
    pub label: Option<String>,
    pub is_root: bool,
}

impl TreemapCell {
    pub fn id(&self) -> &str {
        &self.rect.id
    }
}

/// Treemap of depicts tags. Cells are rebuilt on every filter change; the
/// palette is not.
#[derive(Debug)]
pub struct DepictsView {
    width: f64,
    height: f64,
    palette: ColorAssignment,
    label_policy: LabelPolicy,
    tooltip_offset: [f64; 2],
    filter_on_hover: bool,
    cells: Vec<TreemapCell>,
    tooltip: Tooltip,
    hovered: Option<String>,
    last_error: Option<StructureError>,
}

impl DepictsView {
    pub fn new(width: f64, height: f64, palette: ColorAssignment, config: &TreemapConfig) -> Self {
        Self {
            width,
            height,
            palette,
            label_policy: config.label,
            tooltip_offset: config.tooltip_offset,
            filter_on_hover: config.filter_on_hover,
            cells: Vec::new(),
            tooltip: Tooltip::default(),
            hovered: None,
            last_error: None,
        }
    }

    /// Colors every tag that survives the singleton policy (plus the root)
    /// up front, then lays out.
    pub fn initialize(&mut self, records: &[&Record]) {
        let counts = drop_singletons(aggregate(records.iter().copied(), FieldSelector::Depicts));
        self.palette.assign_all(
            counts
                .iter()
                .map(|count| count.key.as_str())
                .chain(std::iter::once(SENTINEL_ROOT)),
        );
        self.update(records);
    }

    pub fn update(&mut self, records: &[&Record]) {
        let counts = drop_singletons(aggregate(records.iter().copied(), FieldSelector::Depicts));
        let rects = match hierarchy::build(&counts)
            .and_then(|nodes| layout::layout(&nodes, self.width, self.height))
        {
            Ok(rects) => rects,
            Err(err) => {
                warn!(%err, "treemap pass aborted, keeping previous cells");
                self.last_error = Some(err);
                return;
            }
        };
        self.last_error = None;
        self.cells = rects
            .into_iter()
            .map(|rect| {
                let is_root = rect.id == SENTINEL_ROOT;
                let color = self.palette.color_for(&rect.id);
                let label = self.label_policy.label_for(&rect.id, rect.width());
                TreemapCell {
                    rect,
                    color,
                    label,
                    is_root,
                }
            })
            .collect();
        debug!(
            records = records.len(),
            tags = self.cells.len().saturating_sub(1),
            "treemap updated"
        );
    }

    /// Root first, then leaves largest first.
    pub fn cells(&self) -> &[TreemapCell] {
        &self.cells
    }

    pub fn leaves(&self) -> impl Iterator<Item = &TreemapCell> {
        self.cells.iter().filter(|cell| !cell.is_root)
    }

    pub fn cell(&self, id: &str) -> Option<&TreemapCell> {
        self.cells.iter().find(|cell| cell.id() == id)
    }

    /// Topmost cell under a point in view coordinates.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<&TreemapCell> {
        self.cells
            .iter()
            .rev()
            .find(|cell| cell.rect.rect().contains(x, y))
    }

    pub fn palette(&self) -> &ColorAssignment {
        &self.palette
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn last_error(&self) -> Option<&StructureError> {
        self.last_error.as_ref()
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

impl FilterListener for DepictsView {
    fn on_filter(&mut self, records: &[&Record]) {
        self.update(records);
    }
}

impl LinkedView for DepictsView {
    fn interact(&mut self, interaction: &Interaction) -> Option<FilterCommand> {
        match interaction {
            Interaction::PointerEnter { id } => {
                if self.cell(id).is_none() {
                    return None;
                }
                self.tooltip.show(id.clone());
                self.hovered = Some(id.clone());
                if self.filter_on_hover && id != SENTINEL_ROOT {
                    return Some(FilterCommand::Set(FilterPredicate::depicts(id)));
                }
                None
            }
            Interaction::PointerMove { x, y } => {
                self.tooltip.move_to(*x, *y, self.tooltip_offset);
                None
            }
            Interaction::PointerLeave => {
                self.tooltip.hide();
                let left = self.hovered.take();
                match left {
                    Some(id) if self.filter_on_hover && id != SENTINEL_ROOT => {
                        Some(FilterCommand::Clear)
                    }
                    _ => None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Record> {
        vec![
            Record::new("France", &["cat", "dog", "owl"]),
            Record::new("France", &["cat", "dog"]),
            Record::new("Spain", &["cat", "tree", "tree"]),
        ]
    }

    fn view(config: &TreemapConfig) -> DepictsView {
        DepictsView::new(400.0, 300.0, ColorAssignment::with_seed(1), config)
    }

    #[test]
    fn drops_one_off_tags() {
        let data = records();
        let all: Vec<&Record> = data.iter().collect();
        let mut view = view(&TreemapConfig::default());
        view.initialize(&all);
        let ids: Vec<&str> = view.leaves().map(TreemapCell::id).collect();
        assert_eq!(ids, vec!["cat", "dog", "tree"]);
        assert!(view.cell("owl").is_none());
        assert_eq!(view.cells()[0].rect.value, 7.0);
        assert!(view.palette().get(SENTINEL_ROOT).is_some());
    }

    #[test]
    fn colors_survive_filtering() {
        let data = records();
        let all: Vec<&Record> = data.iter().collect();
        let mut view = view(&TreemapConfig::default());
        view.initialize(&all);
        let cat = view.cell("cat").unwrap().color;

        let spain: Vec<&Record> = data.iter().filter(|r| r.country() == Some("Spain")).collect();
        view.update(&spain);
        assert!(view.cell("cat").is_none());
        assert_eq!(view.cell("tree").unwrap().rect.value, 2.0);

        view.update(&all);
        assert_eq!(view.cell("cat").unwrap().color, cat);
    }

    #[test]
    fn empty_dataset_leaves_root_only() {
        let mut view = view(&TreemapConfig::default());
        view.initialize(&[]);
        assert_eq!(view.cells().len(), 1);
        let root = &view.cells()[0];
        assert!(root.is_root);
        assert_eq!(root.rect.value, 0.0);
        assert_eq!(root.label.as_deref(), Some(SENTINEL_ROOT));
    }

    #[test]
    fn sentinel_tag_aborts_the_pass() {
        let data = records();
        let all: Vec<&Record> = data.iter().collect();
        let mut view = view(&TreemapConfig::default());
        view.initialize(&all);
        let before = view.cells().to_vec();

        let poisoned = vec![
            Record::new("France", &[SENTINEL_ROOT]),
            Record::new("France", &[SENTINEL_ROOT]),
        ];
        let poisoned: Vec<&Record> = poisoned.iter().collect();
        view.update(&poisoned);
        assert_eq!(view.last_error(), Some(&StructureError::SentinelCollision));
        assert_eq!(view.cells(), before.as_slice());
    }

    #[test]
    fn tooltip_follows_pointer() {
        let data = records();
        let all: Vec<&Record> = data.iter().collect();
        let mut view = view(&TreemapConfig::default());
        view.initialize(&all);

        assert!(view.interact(&Interaction::enter("cat")).is_none());
        assert_eq!(view.tooltip().text, "cat");
        assert!(view.tooltip().visible);
        view.interact(&Interaction::PointerMove { x: 50.0, y: 40.0 });
        assert_eq!((view.tooltip().x, view.tooltip().y), (60.0, 30.0));
        assert!(view.interact(&Interaction::PointerLeave).is_none());
        assert!(!view.tooltip().visible);
        assert!(view.interact(&Interaction::enter("unknown")).is_none());
        assert!(view.hovered().is_none());
    }

    #[test]
    fn optional_tag_filter_on_hover() {
        let data = records();
        let all: Vec<&Record> = data.iter().collect();
        let config = TreemapConfig {
            filter_on_hover: true,
            ..TreemapConfig::default()
        };
        let mut view = view(&config);
        view.initialize(&all);
        match view.interact(&Interaction::enter("dog")) {
            Some(FilterCommand::Set(predicate)) => {
                assert!(predicate.matches(&data[0]));
                assert!(!predicate.matches(&data[2]));
            }
            other => panic!("expected a predicate, got {other:?}"),
        }
        assert!(matches!(
            view.interact(&Interaction::PointerLeave),
            Some(FilterCommand::Clear)
        ));
    }

    #[test]
    fn hit_testing_prefers_leaves() {
        let data = records();
        let all: Vec<&Record> = data.iter().collect();
        let mut view = view(&TreemapConfig::default());
        view.initialize(&all);
        let cat = view.cell("cat").unwrap().rect.clone();
        let hit = view
            .cell_at((cat.x0 + cat.x1) / 2.0, (cat.y0 + cat.y1) / 2.0)
            .unwrap();
        assert_eq!(hit.id(), "cat");
        assert!(view.cell_at(1000.0, 1000.0).is_none());
    }

    #[test]
    fn pointer_coordinates_hit_test_directly() {
        let data = records();
        let all: Vec<&Record> = data.iter().collect();
        let mut view = view(&TreemapConfig::default());
        view.initialize(&all);
        let cat = view.cell("cat").unwrap().rect.clone();
        let (x, y) = ((cat.x0 + cat.x1) / 2.0, (cat.y0 + cat.y1) / 2.0);
        assert_eq!(view.cell_at(x, y).map(TreemapCell::id), Some("cat"));

        view.interact(&Interaction::PointerMove { x, y });
        let [dx, dy] = TreemapConfig::default().tooltip_offset;
        assert_eq!((view.tooltip().x, view.tooltip().y), (x + dx, y + dy));
    }
}
