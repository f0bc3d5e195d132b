//! World map with animated location pins.
//!
//! A land topology and a point feature collection are loaded in parallel, drawn
//! into an append-only [`map::Scene`] (graticule, land, one pin group per
//! feature), then shown in the terminal or written out as SVG.

pub mod app;
pub mod braille;
pub mod config;
pub mod data;
pub mod error;
pub mod jitter;
pub mod map;
pub mod pipeline;
pub mod svg;
pub mod ui;
