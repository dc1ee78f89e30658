use crate::domain::isoline::IsolineQuery;
use crate::utils::error::Result;
use async_trait::async_trait;
use geojson::FeatureCollection;

/// 地圖資料來源。所有實作回傳的幾何都必須是 EPSG:4326 經緯度。
#[async_trait]
pub trait GeometrySource: Send + Sync {
    async fn fetch_feature_collection(&self) -> Result<FeatureCollection>;

    fn name(&self) -> &'static str;
}

/// 外部等時線服務。回應內容原樣轉送，不做結構驗證。
#[async_trait]
pub trait IsolineProvider: Send + Sync {
    async fn fetch_isoline(&self, query: &IsolineQuery) -> Result<serde_json::Value>;
}
