use crate::dashboard::Dashboard;
use crate::filter::FilterState;
use crate::views::{RegionShade, Tooltip};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Everything the renderer would need, as plain data.
#[derive(Debug, Serialize)]
pub struct DashboardSnapshot {
    pub filter: Option<String>,
    pub effective_records: usize,
    pub treemap: TreemapSnapshot,
    pub map: MapSnapshot,
}

#[derive(Debug, Serialize)]
pub struct TreemapSnapshot {
    pub width: f64,
    pub height: f64,
    pub cells: Vec<CellSnapshot>,
    pub tooltip: Tooltip,
}

#[derive(Debug, Serialize)]
pub struct CellSnapshot {
    pub id: String,
    pub value: f64,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub color: String,
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MapSnapshot {
    pub domain: Option<[u64; 2]>,
    pub regions: Vec<RegionShade>,
    pub highlighted: Option<String>,
    pub info_visible: bool,
    pub tooltip: Tooltip,
}

impl DashboardSnapshot {
    pub fn from_dashboard(dashboard: &Dashboard) -> Self {
        let depicts = dashboard.depicts();
        let (width, height) = depicts.size();
        let cells = depicts
            .cells()
            .iter()
            .map(|cell| CellSnapshot {
                id: cell.rect.id.clone(),
                value: cell.rect.value,
                x0: cell.rect.x0,
                y0: cell.rect.y0,
                x1: cell.rect.x1,
                y1: cell.rect.y1,
                color: cell.color.to_hex(),
                label: cell.label.clone(),
            })
            .collect();
        let treemap = TreemapSnapshot {
            width,
            height,
            cells,
            tooltip: depicts.tooltip().clone(),
        };

        let map_view = dashboard.map();
        let map = MapSnapshot {
            domain: map_view.scale().domain().map(|(min, max)| [min, max]),
            regions: map_view.shades(),
            highlighted: map_view.highlighted().map(str::to_string),
            info_visible: map_view.info_visible(),
            tooltip: map_view.tooltip().clone(),
        };

        let filter = match dashboard.filter().state() {
            FilterState::Unfiltered => None,
            FilterState::Filtered(label) => Some(label),
        };

        DashboardSnapshot {
            filter,
            effective_records: dashboard.filter().effective_records().len(),
            treemap,
            map,
        }
    }
}

pub fn write_snapshot(path: Option<&Path>, dashboard: &Dashboard) -> anyhow::Result<()> {
    let snapshot = DashboardSnapshot::from_dashboard(dashboard);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, &snapshot)?;
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }
    Ok(())
}
