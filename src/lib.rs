pub mod aggregate;
pub mod choropleth;
#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod geo;
pub mod hierarchy;
pub mod layout;
pub mod palette;
pub mod record;
pub mod render;
pub mod snapshot;
pub mod theme;
pub mod views;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{Error, Result};
pub use record::Record;
pub use render::{render_dashboard_svg, render_json};
