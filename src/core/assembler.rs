use crate::core::{GeometrySource, IsolineProvider, IsolineQuery};
use crate::utils::error::Result;
use geojson::FeatureCollection;
use std::time::Instant;

/// 對外的單一入口：地圖資料交給資料來源，等時線交給外部供應商。
/// 不快取、不合併相同請求，錯誤原樣往上拋。
pub struct FeatureCollectionAssembler<G: GeometrySource, I: IsolineProvider> {
    source: G,
    isolines: I,
}

impl<G: GeometrySource, I: IsolineProvider> FeatureCollectionAssembler<G, I> {
    pub fn new(source: G, isolines: I) -> Self {
        Self { source, isolines }
    }

    pub fn source(&self) -> &G {
        &self.source
    }

    pub async fn get_map_data(&self) -> Result<FeatureCollection> {
        let started = Instant::now();
        let collection = self.source.fetch_feature_collection().await?;
        tracing::info!(
            "🗺️ Served {} features from {} in {:?}",
            collection.features.len(),
            self.source.name(),
            started.elapsed()
        );
        Ok(collection)
    }

    pub async fn get_isochrone(&self, query: &IsolineQuery) -> Result<serde_json::Value> {
        self.isolines.fetch_isoline(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::feature_collection;
    use crate::utils::error::GariError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct CountingSource {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl GeometrySource for CountingSource {
        async fn fetch_feature_collection(&self) -> Result<FeatureCollection> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GariError::data_source("relation \"public.jp_gari\" does not exist"));
            }
            Ok(feature_collection(Vec::new()))
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[derive(Clone, Default)]
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl IsolineProvider for CountingProvider {
        async fn fetch_isoline(&self, query: &IsolineQuery) -> Result<serde_json::Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let request = query.validate()?;
            Ok(serde_json::json!({ "type": "FeatureCollection", "range": request.range }))
        }
    }

    #[tokio::test]
    async fn test_empty_source_yields_empty_collection() {
        let assembler =
            FeatureCollectionAssembler::new(CountingSource::default(), CountingProvider::default());

        let collection = assembler.get_map_data().await.unwrap();
        assert_eq!(
            serde_json::to_value(&collection).unwrap(),
            serde_json::json!({ "type": "FeatureCollection", "features": [] })
        );
    }

    #[tokio::test]
    async fn test_source_errors_propagate_unchanged() {
        let source = CountingSource {
            fail: true,
            ..Default::default()
        };
        let assembler = FeatureCollectionAssembler::new(source, CountingProvider::default());

        assert!(matches!(
            assembler.get_map_data().await,
            Err(GariError::DataSourceError { .. })
        ));
    }

    #[tokio::test]
    async fn test_identical_requests_are_not_coalesced() {
        let source = CountingSource::default();
        let provider = CountingProvider::default();
        let assembler = FeatureCollectionAssembler::new(source.clone(), provider.clone());

        let query = IsolineQuery::new(
            42.69,
            23.32,
            crate::domain::isoline::TravelMode::Drive,
            vec![300, 600],
        );
        let (a, b) = tokio::join!(assembler.get_isochrone(&query), assembler.get_isochrone(&query));
        assert_eq!(a.unwrap()["range"], "300,600");
        assert!(b.is_ok());
        let _ = tokio::join!(assembler.get_map_data(), assembler.get_map_data());

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
