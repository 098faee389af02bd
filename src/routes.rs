use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::DataClient;
use crate::handlers;
use crate::middleware::require_auth;
use crate::AppState;

pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(safra_routes())
        .merge(talhao_routes())
        .merge(funcionario_routes())
        .merge(insumo_routes())
        .merge(combustivel_routes())
        .merge(compra_routes())
        .merge(plantio_routes())
        .merge(colheita_routes())
        .merge(manutencao_routes())
        .merge(dashboard_routes())
        .layer(from_fn_with_state(state.clone(), require_auth));

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Protected API
        .merge(protected);

    if state.config.api.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router.with_state(state)
}

fn safra_routes() -> Router<AppState> {
    use handlers::safras;
    Router::new().route(
        "/api/safras",
        get(safras::list)
            .post(safras::create)
            .put(safras::update)
            .delete(safras::remove),
    )
}

fn talhao_routes() -> Router<AppState> {
    use handlers::talhoes;
    Router::new().route(
        "/api/talhoes",
        get(talhoes::list)
            .post(talhoes::create)
            .put(talhoes::update)
            .delete(talhoes::remove),
    )
}

fn funcionario_routes() -> Router<AppState> {
    use handlers::funcionarios;
    Router::new().route(
        "/api/funcionarios",
        get(funcionarios::list)
            .post(funcionarios::create)
            .put(funcionarios::update)
            .delete(funcionarios::remove),
    )
}

fn insumo_routes() -> Router<AppState> {
    use handlers::{estoque_insumos, insumos, movimentacoes_insumos};
    Router::new()
        .route(
            "/api/insumos",
            get(insumos::list)
                .post(insumos::create)
                .put(insumos::update)
                .delete(insumos::remove),
        )
        .route(
            "/api/estoque-insumos",
            get(estoque_insumos::list).post(estoque_insumos::create),
        )
        .route(
            "/api/movimentacoes-insumos",
            get(movimentacoes_insumos::list).post(movimentacoes_insumos::create),
        )
}

fn combustivel_routes() -> Router<AppState> {
    use handlers::combustivel;
    Router::new()
        .route(
            "/api/estoque-combustivel",
            get(combustivel::estoque_list).post(combustivel::estoque_upsert),
        )
        .route(
            "/api/abastecimentos",
            get(combustivel::abastecimento_list).post(combustivel::abastecimento_create),
        )
}

fn compra_routes() -> Router<AppState> {
    use handlers::compras;
    Router::new().route(
        "/api/compras",
        get(compras::list)
            .post(compras::create)
            .put(compras::update)
            .delete(compras::remove),
    )
}

fn plantio_routes() -> Router<AppState> {
    use handlers::plantios;
    Router::new().route(
        "/api/plantios",
        get(plantios::list)
            .post(plantios::create)
            .put(plantios::update)
            .delete(plantios::remove),
    )
}

fn colheita_routes() -> Router<AppState> {
    use handlers::colheitas;
    Router::new().route(
        "/api/colheitas",
        get(colheitas::list)
            .post(colheitas::create)
            .put(colheitas::update)
            .delete(colheitas::remove),
    )
}

fn manutencao_routes() -> Router<AppState> {
    use handlers::manutencoes;
    Router::new().route(
        "/api/manutencoes",
        get(manutencoes::list)
            .post(manutencoes::create)
            .put(manutencoes::update)
            .delete(manutencoes::remove),
    )
}

fn dashboard_routes() -> Router<AppState> {
    use handlers::dashboard;
    Router::new().route("/api/dashboard/resumo", get(dashboard::resumo))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Fazenda API",
            "version": version,
            "description": "Farm management backend API (Rust/Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "safras": "/api/safras (protected)",
                "talhoes": "/api/talhoes (protected)",
                "funcionarios": "/api/funcionarios (protected)",
                "insumos": "/api/insumos, /api/estoque-insumos, /api/movimentacoes-insumos (protected)",
                "combustivel": "/api/estoque-combustivel, /api/abastecimentos (protected)",
                "compras": "/api/compras (protected)",
                "plantios": "/api/plantios (protected)",
                "colheitas": "/api/colheitas (protected)",
                "manutencoes": "/api/manutencoes (protected)",
                "dashboard": "/api/dashboard/resumo (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DataClient::anon(&state.config.data_service, &state.http)
        .health()
        .await
    {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "data_service": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("health probe failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "data service unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
