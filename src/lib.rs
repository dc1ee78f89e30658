pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{DuckDbSource, GeoapifyIsolineProvider, GeometryBackend, PostgisSource};
pub use config::GariConfig;
pub use crate::core::assembler::FeatureCollectionAssembler;
pub use utils::error::{GariError, Result};
