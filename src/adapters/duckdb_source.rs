use crate::config::DuckDbConfig;
use crate::adapters::quote_identifier;
use crate::domain::model::{ensure_tradename, feature_collection};
use crate::domain::ports::GeometrySource;
use crate::utils::error::{GariError, Result};
use crate::utils::shared_instance::SharedInstance;
use async_trait::async_trait;
use duckdb::{AccessMode, Config, Connection};
use geojson::{Feature, FeatureCollection};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

/// DuckDB 資料來源。
///
/// 幾何欄位在匯入時已轉為 EPSG:4326，每一列直接由 DuckDB 組成完整的 GeoJSON Feature 文件。
/// 資料庫實例在第一次使用時以唯讀模式開啟，整個行程共用；每次請求從實例複製一條連線，
/// 用完即關閉。
pub struct DuckDbSource {
    path: PathBuf,
    query: String,
    install_extensions: bool,
    instance: SharedInstance<Mutex<Connection>>,
}

impl DuckDbSource {
    pub fn new(config: &DuckDbConfig) -> Self {
        Self {
            path: PathBuf::from(&config.path),
            query: feature_query(
                &config.table,
                &config.geometry_column,
                &config.attribute_columns,
            ),
            install_extensions: config.install_extensions,
            instance: SharedInstance::new(),
        }
    }

    /// 資料庫實例被開啟的次數，正常情況下最多為 1
    pub fn initializations(&self) -> usize {
        self.instance.initializations()
    }

    async fn instance(&self) -> Result<&Mutex<Connection>> {
        self.instance
            .get_or_try_init(|| {
                let path = self.path.clone();
                let install_extensions = self.install_extensions;
                async move {
                    tokio::task::spawn_blocking(move || open_instance(&path, install_extensions))
                        .await
                        .map_err(|e| {
                            GariError::data_source(format!("DuckDB open task failed: {}", e))
                        })?
                }
            })
            .await
    }
}

fn open_instance(path: &Path, install_extensions: bool) -> Result<Mutex<Connection>> {
    if !path.exists() {
        return Err(GariError::data_source(format!(
            "DuckDB file not found: {}",
            path.display()
        )));
    }

    let config = Config::default().access_mode(AccessMode::ReadOnly)?;
    let conn = Connection::open_with_flags(path, config)?;

    if install_extensions {
        // json 已隨 duckdb 一起靜態連結，只需下載 spatial
        conn.execute_batch("INSTALL spatial;")?;
    }

    tracing::info!("🦆 Opened DuckDB instance at {}", path.display());
    Ok(Mutex::new(conn))
}

/// 由 DuckDB 的 `json_object` 與 `ST_AsGeoJSON` 組出每一列的 Feature 文件
pub fn feature_query(table: &str, geometry_column: &str, attribute_columns: &[String]) -> String {
    let mut properties = vec!["'id', id".to_string(), "'tradename', tradename".to_string()];
    for column in attribute_columns {
        properties.push(format!("'{}', {}", column, quote_identifier(column)));
    }

    format!(
        "SELECT json_object(\
            'type', 'Feature', \
            'geometry', ST_AsGeoJSON({}), \
            'properties', json_object({})\
         )::VARCHAR AS feature_json \
         FROM {}",
        quote_identifier(geometry_column),
        properties.join(", "),
        quote_identifier(table)
    )
}

/// 逐列解析 Feature 文件；任何一列無法解析即整個請求失敗
pub fn collect_features<I>(rows: I) -> Result<Vec<Feature>>
where
    I: IntoIterator<Item = Result<String>>,
{
    let mut features = Vec::new();
    for (index, row) in rows.into_iter().enumerate() {
        let text = row?;
        let mut feature: Feature = serde_json::from_str(&text).map_err(|e| {
            GariError::data_source(format!("malformed feature document at row {}: {}", index, e))
        })?;
        ensure_tradename(&mut feature);
        features.push(feature);
    }
    Ok(features)
}

fn load_extensions(conn: &Connection) -> Result<()> {
    conn.execute_batch("LOAD json; LOAD spatial;")?;
    Ok(())
}

/// 執行查詢並逐列轉為 Feature，第一欄必須是 Feature 文件字串
fn stream_features(conn: &Connection, query: &str) -> Result<Vec<Feature>> {
    let mut stmt = conn.prepare(query)?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    collect_features(rows.map(|row| row.map_err(GariError::from)))
}

fn read_features(conn: &Connection, query: &str) -> Result<Vec<Feature>> {
    load_extensions(conn)?;
    stream_features(conn, query)
}

#[async_trait]
impl GeometrySource for DuckDbSource {
    async fn fetch_feature_collection(&self) -> Result<FeatureCollection> {
        let started = Instant::now();
        let instance = self.instance().await?;

        let conn = instance
            .lock()
            .map_err(|_| GariError::data_source("DuckDB instance lock poisoned"))?
            .try_clone()?;

        let query = self.query.clone();
        let features = tokio::task::spawn_blocking(move || {
            let result = read_features(&conn, &query);
            // 只關閉這次請求的連線，共用實例保持開啟
            if let Err((_, e)) = conn.close() {
                tracing::warn!("Failed to close DuckDB connection: {}", e);
            }
            result
        })
        .await
        .map_err(|e| GariError::data_source(format!("DuckDB query task failed: {}", e)))??;

        tracing::debug!(
            "DuckDB returned {} features in {:?}",
            features.len(),
            started.elapsed()
        );
        Ok(feature_collection(features))
    }

    fn name(&self) -> &'static str {
        "duckdb"
    }
}
