use crate::config::IsolineConfig;
use crate::domain::isoline::{IsolineQuery, IsolineRequest, ISOLINE_TYPE};
use crate::domain::ports::IsolineProvider;
use crate::utils::error::{GariError, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// Geoapify Isoline API 用戶端
pub struct GeoapifyIsolineProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeoapifyIsolineProvider {
    pub fn new(config: &IsolineConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &IsolineConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// 組出供應商 URL：lat, lon, mode, type=time, range, apiKey
    pub fn build_url(&self, request: &IsolineRequest) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| GariError::InvalidConfigValueError {
            field: "isoline.base_url".to_string(),
            value: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        url.query_pairs_mut()
            .append_pair("lat", &request.lat.to_string())
            .append_pair("lon", &request.lon.to_string())
            .append_pair("mode", request.mode.as_str())
            .append_pair("type", ISOLINE_TYPE)
            .append_pair("range", &request.range)
            .append_pair("apiKey", &self.api_key);

        Ok(url)
    }
}

#[async_trait]
impl IsolineProvider for GeoapifyIsolineProvider {
    async fn fetch_isoline(&self, query: &IsolineQuery) -> Result<serde_json::Value> {
        if self.api_key.trim().is_empty() {
            return Err(GariError::ConfigError {
                message: "Geoapify API key is not set".to_string(),
            });
        }

        let request = query.validate()?;
        let url = self.build_url(&request)?;

        tracing::debug!(
            "Requesting isoline: lat={}, lon={}, mode={}, range={}",
            request.lat,
            request.lon,
            request.mode,
            request.range
        );
        // 錯誤訊息會回傳給瀏覽器，去掉帶有 apiKey 的 URL
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GariError::HttpError(e.without_url()))?;
        let status = response.status();
        tracing::debug!("Isoline provider response status: {}", status);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| GariError::HttpError(e.without_url()))?;
            return Err(GariError::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        // 回應原樣轉送，不檢查結構
        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GariError::HttpError(e.without_url()))?;
        Ok(data)
    }
}
