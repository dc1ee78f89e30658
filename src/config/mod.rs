pub mod toml_config;

pub use toml_config::{
    DuckDbConfig, GariConfig, IsolineConfig, PostgisConfig, ServerConfig, SourceKind, TlsMode,
};

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "gari-map")]
#[command(about = "Serves gari sites as GeoJSON and proxies travel-time isolines")]
pub struct CliConfig {
    #[arg(long, default_value = "gari.toml")]
    pub config: String,

    #[arg(long, help = "Override server.bind, e.g. 0.0.0.0:3000")]
    pub bind: Option<String>,

    #[arg(long, help = "Override server.static_dir")]
    pub static_dir: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入配置檔，命令列參數優先於檔案內容
    pub fn load(&self) -> crate::utils::error::Result<GariConfig> {
        let mut config = GariConfig::from_file(&self.config)?;
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.server.static_dir = Some(dir.clone());
        }
        Ok(config)
    }
}
