// HTTP surface: map data, isoline proxy and the optional static frontend.

pub mod error;
pub mod handlers;

use crate::config::ServerConfig;
use crate::core::{GeometrySource, IsolineProvider};
use axum::routing::get;
use axum::Router;
use handlers::SharedAssembler;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub const ISOLINE_PATH: &str = "/api/isoline";

pub fn build_router<G, I>(assembler: SharedAssembler<G, I>, server: &ServerConfig) -> Router
where
    G: GeometrySource + 'static,
    I: IsolineProvider + 'static,
{
    let router = Router::new()
        .route(&server.map_data_path, get(handlers::map_data::<G, I>))
        .route(ISOLINE_PATH, get(handlers::isoline::<G, I>))
        .with_state(assembler);

    // 其餘路徑交給靜態前端，`/` 對應 index.html
    let router = match &server.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}
