use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use track_snap::types::TrackPiece;
use track_snap::{
    check_collision, find_collisions, find_snap_candidates, PlacedPiece, PlacementRecord, Point,
    SnapError, SnapReport, SnapSettings,
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/pieces", get(list_pieces))
        .route("/api/pieces/{id}", get(get_piece))
        .route("/api/snap", post(snap))
        .route("/api/collision", post(collision))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    pieces: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        pieces: state.catalog.len(),
    })
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

async fn list_pieces(State(state): State<AppState>) -> Json<Vec<TrackPiece>> {
    Json(state.catalog.pieces().cloned().collect())
}

async fn get_piece(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrackPiece>, ApiError> {
    let piece = state
        .catalog
        .get(&id)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Track piece not found"))?;
    Ok(Json(piece.as_ref().clone()))
}

/// The piece being dragged, its preview pose, and the current layout.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapRequest {
    piece_id: String,
    position: Point,
    #[serde(default)]
    rotation: f64,
    #[serde(default)]
    placed: Vec<PlacementRecord>,
    #[serde(default)]
    settings: SnapSettings,
}

#[derive(Serialize)]
struct SnapResponse {
    /// Best snap, or null.
    candidate: Option<SnapReport>,
    /// Every viable snap, closest first.
    candidates: Vec<SnapReport>,
}

async fn snap(
    State(state): State<AppState>,
    Json(req): Json<SnapRequest>,
) -> Result<Json<SnapResponse>, ApiError> {
    let (piece, placed) = resolve(&state, &req.piece_id, &req.placed)?;
    let candidates: Vec<SnapReport> =
        find_snap_candidates(&piece, req.position, req.rotation, &placed, &req.settings)
            .iter()
            .map(|c| c.report())
            .collect();
    Ok(Json(SnapResponse {
        candidate: candidates.first().cloned(),
        candidates,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollisionRequest {
    piece_id: String,
    position: Point,
    #[serde(default)]
    placed: Vec<PlacementRecord>,
}

#[derive(Serialize)]
struct CollisionResponse {
    collides: bool,
    with: Vec<String>,
}

async fn collision(
    State(state): State<AppState>,
    Json(req): Json<CollisionRequest>,
) -> Result<Json<CollisionResponse>, ApiError> {
    let (piece, placed) = resolve(&state, &req.piece_id, &req.placed)?;
    Ok(Json(CollisionResponse {
        collides: check_collision(&piece, req.position, &placed),
        with: find_collisions(&piece, req.position, &placed)
            .into_iter()
            .map(str::to_string)
            .collect(),
    }))
}

fn resolve(
    state: &AppState,
    piece_id: &str,
    records: &[PlacementRecord],
) -> Result<(std::sync::Arc<TrackPiece>, Vec<PlacedPiece>), ApiError> {
    let lookup = |e: SnapError| {
        tracing::warn!("Rejected request: {e}");
        error_response(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string())
    };
    let piece = state.catalog.require(piece_id).map_err(lookup)?;
    let placed = state.catalog.resolve(records).map_err(lookup)?;
    Ok((piece, placed))
}

fn error_response(status: StatusCode, msg: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: msg.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use std::sync::Arc;
    use tower::ServiceExt;
    use track_snap::Catalog;

    fn app() -> Router {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data");
        let state = AppState {
            catalog: Arc::new(Catalog::load(&dir).unwrap()),
        };
        router().with_state(state)
    }

    async fn call(req: Request<Body>) -> (StatusCode, Value) {
        let resp = app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["pieces"], 6);
    }

    #[tokio::test]
    async fn test_get_piece() {
        let req = Request::get("/api/pieces/straight-standard").body(Body::empty()).unwrap();
        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["connections"][1]["type"], "male");

        let req = Request::get("/api/pieces/nope").body(Body::empty()).unwrap();
        let (status, _) = call(req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_snap_endpoint() {
        let body = json!({
            "pieceId": "straight-standard",
            "position": {"x": 150.0, "y": 4.0},
            "placed": [
                {"id": "p1", "pieceId": "straight-standard", "position": {"x": 0.0, "y": 0.0}}
            ]
        });
        let (status, body) = call(post_json("/api/snap", body)).await;
        assert_eq!(status, StatusCode::OK);
        let c = &body["candidate"];
        assert_eq!(c["placedPieceId"], "p1");
        assert_eq!(c["snapRotation"], 0.0);
        assert_eq!(c["snapPosition"]["x"], 144.0);
        assert_eq!(c["snapPosition"]["y"], 0.0);
        assert_eq!(body["candidates"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_snap_disabled() {
        let body = json!({
            "pieceId": "straight-standard",
            "position": {"x": 150.0, "y": 4.0},
            "placed": [
                {"id": "p1", "pieceId": "straight-standard", "position": {"x": 0.0, "y": 0.0}}
            ],
            "settings": {"enabled": false}
        });
        let (status, body) = call(post_json("/api/snap", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["candidate"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_piece_rejected() {
        let body = json!({"pieceId": "monorail", "position": {"x": 0.0, "y": 0.0}});
        let (status, body) = call(post_json("/api/snap", body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("monorail"));
    }

    #[tokio::test]
    async fn test_collision_endpoint() {
        let body = json!({
            "pieceId": "straight-standard",
            "position": {"x": 40.0, "y": 0.0},
            "placed": [
                {"id": "p1", "pieceId": "straight-standard", "position": {"x": 0.0, "y": 0.0}},
                {"id": "p2", "pieceId": "straight-standard", "position": {"x": 900.0, "y": 0.0}}
            ]
        });
        let (status, body) = call(post_json("/api/collision", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["collides"], true);
        assert_eq!(body["with"], json!(["p1"]));
    }
}
