//! Maturity rollup and heuristic quality assessment for hierarchical value
//! models (track, layer, component, sub-component).

pub mod maturity;
pub mod model;
pub mod paths;
pub mod portfolio;
pub mod quality;
pub mod resolver;
pub mod text;
