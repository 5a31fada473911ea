//! Route handlers and the application router.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, warn};

use delivery_lib::{estimate_delivery_from_store, DeliveryMap, EconomicalPath, Error as LibError};

use crate::metrics::failure_reason;
use crate::{
    extract_or_generate_request_id, from_lib_error, health_live, health_ready, metrics_handler,
    record_delivery_estimated, record_delivery_failed, record_map_created, record_path_legs,
    AppState, CreateMapRequest, EstimateDeliveryRequest, MetricsConfig, MetricsLayer,
    ProblemDetails, ServiceResponse, Validate,
};

/// Service label attached to business metrics.
const SERVICE: &str = "delivery";

type HandlerResult<T> = Result<ServiceResponse<T>, ProblemDetails>;

/// Build the full application: map endpoints, probes, and (when enabled) metrics.
pub fn router(state: AppState, metrics: &MetricsConfig) -> Router {
    let mut app = Router::new()
        .route("/maps", get(list_maps).post(create_map))
        .route("/maps/estimate_delivery", post(estimate_delivery))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready));

    if metrics.enabled {
        app = app.route(&metrics.path, get(metrics_handler));
    }

    app.layer(MetricsLayer).with_state(state)
}

/// Run a repository call off the async runtime.
///
/// The outer error covers a panicked or cancelled task; the inner result is the
/// library's own outcome.
async fn run_blocking<T, F>(
    request_id: &str,
    work: F,
) -> Result<delivery_lib::Result<T>, ProblemDetails>
where
    F: FnOnce() -> delivery_lib::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|err| {
        error!(request_id = %request_id, error = %err, "blocking task failed");
        ProblemDetails::internal_error("The request could not be completed", request_id)
    })
}

fn rejected_body(rejection: JsonRejection, request_id: &str) -> ProblemDetails {
    warn!(request_id = %request_id, error = %rejection, "rejected request body");
    ProblemDetails::bad_request(rejection.body_text(), request_id)
}

/// `POST /maps`: store a new map and its routes.
pub async fn create_map(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateMapRequest>, JsonRejection>,
) -> HandlerResult<DeliveryMap> {
    let request_id = extract_or_generate_request_id(&headers).0;
    let Json(request) = payload.map_err(|r| rejected_body(r, &request_id))?;
    request.validate(&request_id).map_err(|problem| *problem)?;

    info!(
        request_id = %request_id,
        map = %request.name,
        routes = request.routes.len(),
        "creating map"
    );

    let map = request.into_map();
    let repository = state.repository();
    let saved = run_blocking(&request_id, move || repository.save_map_with_routes(&map))
        .await?
        .map_err(|err| {
            warn!(request_id = %request_id, error = %err, "map rejected");
            from_lib_error(&err, &request_id)
        })?;

    record_map_created(SERVICE);

    let location = match saved.id {
        Some(id) => format!("/maps/{}", id),
        None => "/maps".to_string(),
    };
    Ok(ServiceResponse::created(saved, location))
}

/// `GET /maps`: every stored map with its routes, in creation order.
pub async fn list_maps(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<Vec<DeliveryMap>> {
    let request_id = extract_or_generate_request_id(&headers).0;
    let repository = state.repository();

    let maps = run_blocking(&request_id, move || repository.list_maps())
        .await?
        .map_err(|err| {
            error!(request_id = %request_id, error = %err, "listing maps failed");
            from_lib_error(&err, &request_id)
        })?;

    Ok(ServiceResponse::new(maps))
}

/// `POST /maps/estimate_delivery`: cheapest path and its fuel cost.
pub async fn estimate_delivery(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<EstimateDeliveryRequest>, JsonRejection>,
) -> HandlerResult<EconomicalPath> {
    let request_id = extract_or_generate_request_id(&headers).0;
    let Json(request) = payload.map_err(|r| {
        record_delivery_failed("validation_error", SERVICE);
        rejected_body(r, &request_id)
    })?;

    if let Err(problem) = request.validate(&request_id) {
        record_delivery_failed("validation_error", SERVICE);
        return Err(*problem);
    }

    info!(
        request_id = %request_id,
        map = %request.name,
        origin = %request.origin,
        destination = %request.destination,
        "estimating delivery"
    );

    let query = request.to_query();
    let repository = state.repository();
    let outcome = run_blocking(&request_id, move || {
        estimate_delivery_from_store(&*repository, &query)
    })
    .await?;

    match outcome {
        Ok(path) => {
            record_delivery_estimated(SERVICE);
            record_path_legs(path.leg_count());
            info!(
                request_id = %request_id,
                legs = path.leg_count(),
                total_distance = path.total_distance,
                total_cost = path.total_cost,
                "delivery estimated"
            );
            Ok(ServiceResponse::new(path))
        }
        Err(err) => Err(estimate_failure(&err, &request_id)),
    }
}

fn estimate_failure(err: &LibError, request_id: &str) -> ProblemDetails {
    if err.is_not_found() {
        warn!(request_id = %request_id, error = %err, "delivery estimate not found");
    } else {
        error!(request_id = %request_id, error = %err, "delivery estimate failed");
    }
    record_delivery_failed(failure_reason(err), SERVICE);
    from_lib_error(err, request_id)
}
