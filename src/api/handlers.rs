use crate::api::error::ApiError;
use crate::core::assembler::FeatureCollectionAssembler;
use crate::core::{GeometrySource, IsolineProvider, IsolineQuery};
use axum::extract::{Query, State};
use axum::Json;
use geojson::FeatureCollection;
use std::sync::Arc;

pub type SharedAssembler<G, I> = Arc<FeatureCollectionAssembler<G, I>>;

pub async fn map_data<G, I>(
    State(assembler): State<SharedAssembler<G, I>>,
) -> Result<Json<FeatureCollection>, ApiError>
where
    G: GeometrySource + 'static,
    I: IsolineProvider + 'static,
{
    assembler
        .get_map_data()
        .await
        .map(Json)
        .map_err(ApiError::MapData)
}

/// 參數以原始字串對取得，`range` 可重複出現；驗證交給等時線供應商
pub async fn isoline<G, I>(
    State(assembler): State<SharedAssembler<G, I>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    G: GeometrySource + 'static,
    I: IsolineProvider + 'static,
{
    let query = IsolineQuery::from_query_pairs(pairs);
    assembler
        .get_isochrone(&query)
        .await
        .map(Json)
        .map_err(ApiError::Isoline)
}
