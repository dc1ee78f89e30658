use crate::utils::error::{GariError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ISOLINE_BASE_URL: &str = "https://api.geoapify.com/v1/isoline";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GariConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub source: SourceConfig,
    pub postgis: Option<PostgisConfig>,
    pub duckdb: Option<DuckDbConfig>,
    pub isoline: IsolineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// `/api/jp_gari` 或 `/api/gari`，視部署版本而定
    #[serde(default = "default_map_data_path")]
    pub map_data_path: String,
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            map_data_path: default_map_data_path(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Postgis,
    Duckdb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub kind: SourceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    Disable,
    Prefer,
    /// 加密連線但不驗證憑證（雲端主機常見設定）
    #[default]
    Require,
    VerifyFull,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgisConfig {
    pub host: String,
    #[serde(default = "default_pg_port")]
    pub port: u16,
    pub database: String,
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub tls_mode: TlsMode,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_pg_table")]
    pub table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuckDbConfig {
    pub path: String,
    #[serde(default = "default_duckdb_table")]
    pub table: String,
    #[serde(default = "default_geometry_column")]
    pub geometry_column: String,
    #[serde(default = "default_attribute_columns")]
    pub attribute_columns: Vec<String>,
    #[serde(default)]
    pub install_extensions: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolineConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_isoline_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_map_data_path() -> String {
    "/api/jp_gari".to_string()
}

fn default_pg_port() -> u16 {
    5432
}

fn default_max_connections() -> u32 {
    5
}

fn default_pg_table() -> String {
    "public.jp_gari".to_string()
}

fn default_duckdb_table() -> String {
    "jp_gari".to_string()
}

fn default_geometry_column() -> String {
    "geom_wgs84".to_string()
}

fn default_attribute_columns() -> Vec<String> {
    ["2016_prist", "2016_zamin", "2019_zamin", "2019_prist"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_isoline_base_url() -> String {
    DEFAULT_ISOLINE_BASE_URL.to_string()
}

impl GariConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GariError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| GariError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEOAPIFY_API_KEY})；未設定的變數替換為空字串，交給驗證處理
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

        re.replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        })
        .to_string()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        self.server
            .bind
            .parse::<std::net::SocketAddr>()
            .map_err(|e| GariError::InvalidConfigValueError {
                field: "server.bind".to_string(),
                value: self.server.bind.clone(),
                reason: e.to_string(),
            })?;
        validation::validate_route_path("server.map_data_path", &self.server.map_data_path)?;
        if let Some(dir) = &self.server.static_dir {
            validation::validate_path("server.static_dir", dir)?;
        }

        // 只驗證實際啟用的資料來源
        match self.source.kind {
            SourceKind::Postgis => {
                let pg = validation::validate_required_field("postgis", &self.postgis)?;
                validation::validate_non_empty_string("postgis.host", &pg.host)?;
                validation::validate_non_empty_string("postgis.database", &pg.database)?;
                validation::validate_non_empty_string("postgis.user", &pg.user)?;
                validation::validate_range("postgis.port", pg.port, 1, u16::MAX)?;
                validation::validate_positive_number(
                    "postgis.max_connections",
                    pg.max_connections as usize,
                    1,
                )?;
                validation::validate_sql_identifier("postgis.table", &pg.table)?;
            }
            SourceKind::Duckdb => {
                let duck = validation::validate_required_field("duckdb", &self.duckdb)?;
                validation::validate_path("duckdb.path", &duck.path)?;
                validation::validate_sql_identifier("duckdb.table", &duck.table)?;
                validation::validate_sql_identifier(
                    "duckdb.geometry_column",
                    &duck.geometry_column,
                )?;
                for column in &duck.attribute_columns {
                    validation::validate_sql_identifier("duckdb.attribute_columns", column)?;
                }
            }
        }

        // 沒有 API 金鑰時拒絕啟動，等時線路徑永遠不會發出請求
        if self.isoline.api_key.trim().is_empty() {
            return Err(GariError::MissingConfigError {
                field: "isoline.api_key".to_string(),
            });
        }
        validation::validate_url("isoline.base_url", &self.isoline.base_url)?;

        Ok(())
    }
}

impl Validate for GariConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
