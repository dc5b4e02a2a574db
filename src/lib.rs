pub mod config;
pub mod constants;
pub mod error;
pub mod filters;
pub mod fusion;
pub mod geo;
pub mod location;
pub mod navigator;
pub mod output;
pub mod pipeline;
pub mod sources;
pub mod subscription;
pub mod trace;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::NavConfig;
pub use error::{NavError, Result};
pub use geo::Coordinate;
pub use navigator::{NavigationData, Navigator, TurnDirection};
pub use pipeline::{NavigationPipeline, SourceEvent};
