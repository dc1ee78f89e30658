use crate::adapters::quote_identifier;
use crate::config::{PostgisConfig, TlsMode};
use crate::domain::model::{feature_collection, tradename_or_default, TRADENAME_PROPERTY};
use crate::domain::ports::GeometrySource;
use crate::utils::error::{GariError, Result};
use async_trait::async_trait;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use std::time::Instant;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GariRow {
    pub geojson: Option<String>,
    pub tradename: Option<String>,
}

/// PostGIS 資料來源：幾何在查詢中轉換為 EPSG:4326 後輸出為 GeoJSON 字串
pub struct PostgisSource {
    pool: PgPool,
    query: String,
}

impl PostgisSource {
    /// 建立延遲連線的連線池，啟動時不需要資料庫可用
    pub fn new(config: &PostgisConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password)
            .ssl_mode(ssl_mode(config.tls_mode))
            .application_name("gari-map");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy_with(options);

        Self::with_pool(pool, &config.table)
    }

    pub fn with_pool(pool: PgPool, table: &str) -> Self {
        Self {
            pool,
            query: select_query(table),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn ssl_mode(mode: TlsMode) -> PgSslMode {
    match mode {
        TlsMode::Disable => PgSslMode::Disable,
        TlsMode::Prefer => PgSslMode::Prefer,
        // Require 只加密、不驗證憑證
        TlsMode::Require => PgSslMode::Require,
        TlsMode::VerifyFull => PgSslMode::VerifyFull,
    }
}

pub fn select_query(table: &str) -> String {
    format!(
        "SELECT ST_AsGeoJSON(ST_Transform(geom, 4326)) AS geojson, tradename FROM {}",
        quote_identifier(table)
    )
}

pub fn feature_from_row(row: GariRow) -> Result<Feature> {
    let geometry = row
        .geojson
        .as_deref()
        .map(|text| {
            serde_json::from_str::<Geometry>(text).map_err(|e| {
                GariError::data_source(format!("malformed geometry from PostGIS: {}", e))
            })
        })
        .transpose()?;

    let mut properties = JsonObject::new();
    properties.insert(
        TRADENAME_PROPERTY.to_string(),
        JsonValue::String(tradename_or_default(row.tradename)),
    );

    Ok(Feature {
        bbox: None,
        geometry,
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

#[async_trait]
impl GeometrySource for PostgisSource {
    async fn fetch_feature_collection(&self) -> Result<FeatureCollection> {
        let started = Instant::now();

        let mut conn = self.pool.acquire().await.map_err(|e| {
            tracing::error!("❌ Failed to acquire PostGIS connection: {}", e);
            GariError::from(e)
        })?;

        let rows = sqlx::query_as::<_, GariRow>(&self.query)
            .fetch_all(&mut *conn)
            .await;

        // 無論查詢成功與否，先把連線還給連線池
        drop(conn);

        let rows = rows.map_err(|e| {
            tracing::error!("❌ PostGIS query failed: {}", e);
            GariError::from(e)
        })?;

        let features = rows
            .into_iter()
            .map(feature_from_row)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "PostGIS returned {} features in {:?}",
            features.len(),
            started.elapsed()
        );
        Ok(feature_collection(features))
    }

    fn name(&self) -> &'static str {
        "postgis"
    }
}
