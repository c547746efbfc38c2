//! nephron viewer - desktop front end for the filtration simulation
//!
//! This crate provides:
//! - egui panels for the playback controls and indicators
//! - A painter that draws one [`nephron::Scene`] per kidney

pub mod ui;
