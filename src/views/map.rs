use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::{Interaction, LinkedView, Tooltip};
use crate::aggregate::count_by_country;
use crate::choropleth::CountryColorScale;
use crate::color::Rgb;
use crate::config::MapConfig;
use crate::filter::{FilterCommand, FilterListener, FilterPredicate};
use crate::geo::Region;
use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionShade {
    pub name: String,
    pub count: u64,
    pub fill: Rgb,
    pub highlighted: bool,
}

/// Choropleth of records per creator country.
#[derive(Debug)]
pub struct MapView {
    regions: Vec<Region>,
    scale: CountryColorScale,
    counts: BTreeMap<String, u64>,
    highlight: Rgb,
    highlighted: Option<String>,
    tooltip: Tooltip,
    tooltip_offset: [f64; 2],
    info_visible: bool,
}

impl MapView {
    /// The color domain comes from `all_records` here and never changes.
    pub fn new(all_records: &[Record], regions: Vec<Region>, config: &MapConfig) -> Self {
        let counts = count_by_country(all_records);
        let scale = CountryColorScale::from_counts(&counts, &config.ramp);
        debug!(domain = ?scale.domain(), regions = regions.len(), "map scale built");
        Self {
            regions,
            scale,
            counts,
            highlight: config.highlight,
            highlighted: None,
            tooltip: Tooltip::default(),
            tooltip_offset: config.tooltip_offset,
            info_visible: true,
        }
    }

    pub fn update(&mut self, records: &[&Record]) {
        self.counts = count_by_country(records.iter().copied());
    }

    pub fn fill(&self, region: &str) -> Rgb {
        if self.highlighted.as_deref() == Some(region) {
            return self.highlight;
        }
        self.scale.region_color(region, &self.counts)
    }

    pub fn count(&self, region: &str) -> u64 {
        self.counts.get(region).copied().unwrap_or(0)
    }

    pub fn shades(&self) -> Vec<RegionShade> {
        self.regions
            .iter()
            .map(|region| RegionShade {
                name: region.name.clone(),
                count: self.count(&region.name),
                fill: self.fill(&region.name),
                highlighted: self.highlighted.as_deref() == Some(region.name.as_str()),
            })
            .collect()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn counts(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }

    pub fn scale(&self) -> &CountryColorScale {
        &self.scale
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    /// Whether the painting details panel should be shown.
    pub fn info_visible(&self) -> bool {
        self.info_visible
    }
}

impl FilterListener for MapView {
    fn on_filter(&mut self, records: &[&Record]) {
        self.update(records);
    }
}

impl LinkedView for MapView {
    fn interact(&mut self, interaction: &Interaction) -> Option<FilterCommand> {
        match interaction {
            Interaction::PointerEnter { id } => {
                if !self.regions.iter().any(|region| region.name == *id) {
                    return None;
                }
                let count = self.count(id);
                let text = if count > 0 {
                    self.info_visible = true;
                    format!("{id}: {count}")
                } else {
                    self.info_visible = false;
                    id.clone()
                };
                self.tooltip.show(text);
                self.highlighted = Some(id.clone());
                Some(FilterCommand::Set(FilterPredicate::country(id)))
            }
            Interaction::PointerMove { x, y } => {
                self.tooltip.move_to(*x, *y, self.tooltip_offset);
                None
            }
            Interaction::PointerLeave => {
                self.highlighted = None;
                self.tooltip.hide();
                self.info_visible = true;
                Some(FilterCommand::Clear)
            }
        }
    }
}
