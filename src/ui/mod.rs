//! egui collaborators: input form and report, chart, threshold table.

pub mod panels;
pub mod plot;
pub mod table;
