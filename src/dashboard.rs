use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tracing::debug;

use crate::config::Config;
use crate::filter::{CrossFilter, FilterState};
use crate::geo::Region;
use crate::palette::ColorAssignment;
use crate::record::Record;
use crate::views::{DepictsView, Interaction, LinkedView, MapView, ViewId};

/// Both views wired to one coordinator over one dataset.
pub struct Dashboard {
    filter: CrossFilter,
    depicts: Rc<RefCell<DepictsView>>,
    map: Rc<RefCell<MapView>>,
}

impl Dashboard {
    pub fn new(records: Vec<Record>, regions: Vec<Region>, config: &Config) -> Self {
        Self::with_palette(
            records,
            regions,
            config,
            ColorAssignment::from_seed(config.palette.seed),
        )
    }

    pub fn with_palette(
        records: Vec<Record>,
        regions: Vec<Region>,
        config: &Config,
        palette: ColorAssignment,
    ) -> Self {
        let mut filter = CrossFilter::new(records);
        let (width, height) = config.render.view_size();

        let map = MapView::new(filter.records(), regions, &config.map);
        let mut depicts = DepictsView::new(width, height, palette, &config.treemap);
        {
            let all = filter.effective_records();
            depicts.initialize(&all);
        }

        let depicts = Rc::new(RefCell::new(depicts));
        let map = Rc::new(RefCell::new(map));
        filter.subscribe(map.clone());
        filter.subscribe(depicts.clone());
        debug!(records = filter.records().len(), "dashboard ready");
        Self {
            filter,
            depicts,
            map,
        }
    }

    /// Routes one pointer event to a view, then applies whatever filter
    /// change it asked for. The view borrow ends before listeners run.
    pub fn dispatch(&mut self, target: ViewId, interaction: &Interaction) -> FilterState {
        let command = match target {
            ViewId::Depicts => self.depicts.borrow_mut().interact(interaction),
            ViewId::Map => self.map.borrow_mut().interact(interaction),
        };
        if let Some(command) = command {
            self.filter.apply(command);
        }
        self.filter.state()
    }

    pub fn filter(&self) -> &CrossFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut CrossFilter {
        &mut self.filter
    }

    pub fn depicts(&self) -> Ref<'_, DepictsView> {
        self.depicts.borrow()
    }

    pub fn map(&self) -> Ref<'_, MapView> {
        self.map.borrow()
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterPredicate;

    fn dashboard() -> Dashboard {
        let records = vec![
            Record::new("France", &["cat", "dog"]),
            Record::new("France", &["cat"]),
            Record::new("Spain", &["dog"]),
        ];
        let regions = ["France", "Spain"]
            .iter()
            .map(|name| Region {
                name: name.to_string(),
                polygons: Vec::new(),
            })
            .collect();
        Dashboard::with_palette(
            records,
            regions,
            &Config::default(),
            ColorAssignment::with_seed(3),
        )
    }

    #[test]
    fn map_hover_narrows_the_treemap() {
        let mut dashboard = dashboard();
        assert_eq!(dashboard.depicts().leaves().count(), 2);

        let state = dashboard.dispatch(ViewId::Map, &Interaction::enter("Spain"));
        assert!(matches!(state, FilterState::Filtered(_)));
        assert_eq!(dashboard.depicts().leaves().count(), 0);
        assert_eq!(dashboard.map().count("France"), 0);

        let state = dashboard.dispatch(ViewId::Map, &Interaction::PointerLeave);
        assert_eq!(state, FilterState::Unfiltered);
        assert_eq!(dashboard.depicts().leaves().count(), 2);
        assert_eq!(dashboard.map().count("France"), 2);
    }

    #[test]
    fn pointer_moves_do_not_touch_the_filter() {
        let mut dashboard = dashboard();
        dashboard.dispatch(ViewId::Map, &Interaction::enter("France"));
        let state = dashboard.dispatch(ViewId::Map, &Interaction::PointerMove { x: 1.0, y: 2.0 });
        assert_eq!(
            state,
            FilterState::Filtered(FilterPredicate::country("France").label().to_string())
        );
    }

    #[test]
    fn treemap_hover_is_tooltip_only_by_default() {
        let mut dashboard = dashboard();
        let state = dashboard.dispatch(ViewId::Depicts, &Interaction::enter("cat"));
        assert_eq!(state, FilterState::Unfiltered);
        assert_eq!(dashboard.depicts().tooltip().text, "cat");
    }
}
