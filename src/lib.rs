//! Compare air-quality measurements against WHO guideline and Peru
//! national limits, and shape the results for charting.

pub mod app;
pub mod chart;
pub mod color;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
