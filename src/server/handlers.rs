use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_stream::{Stream, StreamExt};

use crate::region::{AddressHints, District, Division, RegionId, Resolution, StoreStats, Upazila};
use crate::registry::Envelope;

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── POST /resolve ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResolveRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: AddressHints,
}

pub async fn resolve(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ResolveRequest>, JsonRejection>,
) -> Result<Json<Resolution>, ApiError> {
    let start = Instant::now();

    // Any body that is not a JSON object with the expected field
    // types gets one uniform rejection, before any dataset access.
    let Json(request) =
        payload.map_err(|_| api_error(StatusCode::BAD_REQUEST, "invalid payload"))?;

    let lat = request
        .latitude
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing 'latitude'"))?;
    let lon = request
        .longitude
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing 'longitude'"))?;

    let resolution = state
        .resolver
        .resolve(lat, lon, &request.address)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("{}", e)))?;

    let elapsed = start.elapsed();
    eprintln!(
        "[{}] POST /resolve lat={} lon={} -> {} ({:.1}ms)",
        Utc::now().format("%H:%M:%S"),
        lat,
        lon,
        describe(&resolution),
        elapsed.as_secs_f64() * 1000.0,
    );

    Ok(Json(resolution))
}

/// Compact "division/district/upazila" form for log lines, with "-"
/// standing in for null.
fn describe(resolution: &Resolution) -> String {
    fn part(id: Option<RegionId>) -> String {
        id.map_or_else(|| "-".to_string(), |v| v.to_string())
    }
    format!(
        "{}/{}/{}",
        part(resolution.division_id),
        part(resolution.district_id),
        part(resolution.upazila_id)
    )
}

// ─── Region hierarchy ────────────────────────────────────────────

pub async fn division_list(State(state): State<Arc<AppState>>) -> Json<Vec<Division>> {
    Json(state.resolver.store().divisions().to_vec())
}

pub async fn district_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RegionId>,
) -> Result<Json<Vec<District>>, ApiError> {
    let store = state.resolver.store();
    store
        .division(id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Unknown division {}", id)))?;
    Ok(Json(store.districts_of(id)))
}

pub async fn upazila_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RegionId>,
) -> Result<Json<Vec<Upazila>>, ApiError> {
    let store = state.resolver.store();
    store
        .district(id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Unknown district {}", id)))?;
    Ok(Json(store.upazilas_of(id)))
}

#[derive(Serialize)]
pub struct UpazilaDetail {
    pub upazila: Upazila,
    pub district: Option<District>,
    pub division: Option<Division>,
}

pub async fn upazila_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RegionId>,
) -> Result<Json<UpazilaDetail>, ApiError> {
    let store = state.resolver.store();
    let upazila = store
        .upazila(id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Unknown upazila {}", id)))?
        .clone();
    let district = store.district(upazila.district_id).cloned();
    let division = district.as_ref().and_then(|d| store.division(d.division_id)).cloned();
    Ok(Json(UpazilaDetail { upazila, district, division }))
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StoreStats> {
    Json(state.resolver.store().stats())
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ─── Realtime ────────────────────────────────────────────────────

pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    Path(user): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let user = user.trim().to_string();
    if user.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing user id"));
    }

    let subscription = state.registry.register(&user);
    eprintln!(
        "[{}] GET /api/subscribe/{} -> conn #{} ({} users online)",
        Utc::now().format("%H:%M:%S"),
        user,
        subscription.id(),
        state.registry.online_users().len(),
    );

    // The subscription rides inside the stream; when the client goes
    // away the stream is dropped and the registry row with it.
    let stream = subscription.map(sse_event);

    Ok(Sse::new(stream)
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)).text("ping")))
}

/// One envelope becomes one named SSE event with the JSON envelope as
/// its data line.
fn sse_event(envelope: Envelope) -> Result<Event, axum::Error> {
    Event::default().event(&envelope.event).json_data(&envelope)
}

#[derive(Deserialize)]
pub struct NotifyRequest {
    pub user: Option<String>,
    pub event: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Serialize)]
pub struct NotifyResponse {
    pub delivered: usize,
}

pub async fn notify(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NotifyRequest>, JsonRejection>,
) -> Result<Json<NotifyResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|_| api_error(StatusCode::BAD_REQUEST, "invalid payload"))?;

    let user = request.user.as_deref().map(str::trim).unwrap_or("");
    if user.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'user'"));
    }
    let event = request.event.as_deref().map(str::trim).unwrap_or("");
    if event.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'event'"));
    }

    let envelope = Envelope::new(event, request.data.unwrap_or(Value::Null));
    let delivered = state.registry.publish(user, &envelope);

    eprintln!(
        "[{}] POST /api/notify user={} event={} -> {} delivered",
        Utc::now().format("%H:%M:%S"),
        user,
        event,
        delivered,
    );

    Ok(Json(NotifyResponse { delivered }))
}

#[derive(Serialize)]
pub struct PresenceResponse {
    pub user: String,
    pub online: bool,
    pub connections: usize,
}

pub async fn presence(
    State(state): State<Arc<AppState>>,
    Path(user): Path<String>,
) -> Json<PresenceResponse> {
    let user = user.trim().to_string();
    let connections = state.registry.connections(&user);
    Json(PresenceResponse { user, online: connections > 0, connections })
}
