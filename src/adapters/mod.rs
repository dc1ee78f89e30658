// Adapters layer: concrete implementations for the external systems (PostGIS, DuckDB, Geoapify).

pub mod duckdb_source;
pub mod geoapify;
pub mod postgis_source;

use crate::config::{GariConfig, SourceKind};
use crate::domain::ports::GeometrySource;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use geojson::FeatureCollection;

pub use duckdb_source::DuckDbSource;
pub use geoapify::GeoapifyIsolineProvider;
pub use postgis_source::PostgisSource;

/// 以雙引號包住 SQL 識別字，`schema.table` 逐段處理；以數字開頭的欄位名稱（如 `2016_prist`）必須加引號
pub(crate) fn quote_identifier(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

/// 部署時由配置選定的資料來源，兩者不會同時使用
pub enum GeometryBackend {
    Postgis(PostgisSource),
    DuckDb(DuckDbSource),
}

impl GeometryBackend {
    pub fn from_config(config: &GariConfig) -> Result<Self> {
        match config.source.kind {
            SourceKind::Postgis => {
                let pg = validate_required_field("postgis", &config.postgis)?;
                Ok(GeometryBackend::Postgis(PostgisSource::new(pg)))
            }
            SourceKind::Duckdb => {
                let duck = validate_required_field("duckdb", &config.duckdb)?;
                Ok(GeometryBackend::DuckDb(DuckDbSource::new(duck)))
            }
        }
    }
}

#[async_trait]
impl GeometrySource for GeometryBackend {
    async fn fetch_feature_collection(&self) -> Result<FeatureCollection> {
        match self {
            GeometryBackend::Postgis(source) => source.fetch_feature_collection().await,
            GeometryBackend::DuckDb(source) => source.fetch_feature_collection().await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            GeometryBackend::Postgis(source) => source.name(),
            GeometryBackend::DuckDb(source) => source.name(),
        }
    }
}
