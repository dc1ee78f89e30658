use thiserror::Error;

#[derive(Error, Debug)]
pub enum GariError {
    #[error("Isoline provider request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required parameter: {field}")]
    MissingParameterError { field: String },

    #[error("Invalid parameter '{field}': {reason}")]
    InvalidParameterError { field: String, reason: String },

    #[error("Data source error: {message}")]
    DataSourceError { message: String },

    #[error("Isoline provider error: {status} - {body}")]
    UpstreamError { status: u16, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    DataSource,
    Upstream,
    Internal,
}

impl GariError {
    pub fn data_source(message: impl Into<String>) -> Self {
        GariError::DataSourceError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GariError::MissingParameterError { .. } | GariError::InvalidParameterError { .. } => {
                ErrorCategory::Validation
            }
            GariError::ConfigError { .. }
            | GariError::MissingConfigError { .. }
            | GariError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            GariError::DataSourceError { .. } => ErrorCategory::DataSource,
            GariError::UpstreamError { .. } | GariError::HttpError(_) => ErrorCategory::Upstream,
            GariError::IoError(_) => ErrorCategory::Internal,
        }
    }

    /// 呼叫端傳入的參數有誤（對應 4xx）
    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }
}

// 兩種資料庫驅動的錯誤一律歸類為資料來源錯誤，保留驅動訊息
impl From<sqlx::Error> for GariError {
    fn from(e: sqlx::Error) -> Self {
        GariError::data_source(e.to_string())
    }
}

impl From<duckdb::Error> for GariError {
    fn from(e: duckdb::Error) -> Self {
        GariError::data_source(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GariError>;
