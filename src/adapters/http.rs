use crate::core::voucher_service::VoucherService;
use crate::domain::model::{
    CheckExistsResponse, GenerateOutcome, GenerateVouchersRequest, GenerateVouchersResponse,
};
use crate::domain::ports::{ConfigProvider, VoucherRepository};
use crate::utils::error::{ErrorCategory, Result, VoucherError};
use crate::utils::validation::FieldErrors;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Raw generate body. Every field is optional here so missing ones can be
/// reported per field instead of as a parse failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePayload {
    #[serde(alias = "name")]
    pub crew_name: Option<String>,
    #[serde(rename = "crewID", alias = "id")]
    pub crew_id: Option<String>,
    pub flight_number: Option<String>,
    #[serde(alias = "date")]
    pub flight_date: Option<String>,
    #[serde(alias = "aircraft")]
    pub aircraft_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPayload {
    pub flight_number: Option<String>,
    #[serde(alias = "date")]
    pub flight_date: Option<String>,
}

impl GeneratePayload {
    pub fn into_request(self) -> Result<GenerateVouchersRequest> {
        let mut errors = FieldErrors::new();
        let crew_name = errors.required("crewName", self.crew_name.as_deref());
        let crew_id = errors.required("crewID", self.crew_id.as_deref());
        let flight_number = errors.required("flightNumber", self.flight_number.as_deref());
        let flight_date = errors.date("flightDate", self.flight_date.as_deref());
        let aircraft_type = errors.required("aircraftType", self.aircraft_type.as_deref());

        let (Some(crew_name), Some(crew_id), Some(flight_number), Some(flight_date), Some(aircraft_type)) =
            (crew_name, crew_id, flight_number, flight_date, aircraft_type)
        else {
            return Err(errors.into_error());
        };

        Ok(GenerateVouchersRequest {
            crew_name,
            crew_id,
            flight_number,
            flight_date,
            aircraft_type,
        })
    }
}

impl IntoResponse for VoucherError {
    fn into_response(self) -> Response {
        match self {
            VoucherError::Validation { errors } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "message": "Input validation failed",
                    "errors": errors,
                })),
            )
                .into_response(),
            other => {
                let status = match other.category() {
                    ErrorCategory::Client => StatusCode::BAD_REQUEST,
                    ErrorCategory::Server => StatusCode::INTERNAL_SERVER_ERROR,
                };
                json_error(status, other.user_friendly_message())
            }
        }
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn invalid_payload(rejection: JsonRejection) -> Response {
    tracing::debug!("rejected request body: {}", rejection);
    json_error(StatusCode::BAD_REQUEST, "Invalid request payload")
}

pub async fn generate_vouchers<R: VoucherRepository + 'static>(
    State(service): State<Arc<VoucherService<R>>>,
    payload: std::result::Result<Json<GeneratePayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => return invalid_payload(rejection),
    };
    let request = match payload.into_request() {
        Ok(r) => r,
        Err(e) => return e.into_response(),
    };

    match service.generate(request).await {
        Ok(outcome) => {
            let status = match outcome {
                GenerateOutcome::Created { .. } => StatusCode::CREATED,
                GenerateOutcome::AlreadyExists => StatusCode::OK,
            };
            (status, Json(GenerateVouchersResponse::from(outcome))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn check_vouchers<R: VoucherRepository + 'static>(
    State(service): State<Arc<VoucherService<R>>>,
    payload: std::result::Result<Json<CheckPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => return invalid_payload(rejection),
    };

    let mut errors = FieldErrors::new();
    let flight_number = errors.required("flightNumber", payload.flight_number.as_deref());
    let flight_date = errors.date("flightDate", payload.flight_date.as_deref());
    let (Some(flight_number), Some(flight_date)) = (flight_number, flight_date) else {
        return errors.into_error().into_response();
    };

    match service.check_exists(&flight_number, flight_date).await {
        Ok(exists) => Json(CheckExistsResponse { exists }).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Routes without transport layers; handy for tests.
pub fn routes<R: VoucherRepository + 'static>(service: Arc<VoucherService<R>>) -> Router {
    Router::new()
        .route("/api/generate", post(generate_vouchers::<R>))
        .route("/api/check", post(check_vouchers::<R>))
        .with_state(service)
}

pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter(|o| o.as_str() != "*")
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    let allow_origin = if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Full application router with CORS, timeout and request tracing.
pub fn router<R, C>(service: Arc<VoucherService<R>>, config: &C) -> Router
where
    R: VoucherRepository + 'static,
    C: ConfigProvider,
{
    routes(service)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs()),
        ))
        .layer(cors_layer(config.allowed_origins()))
        .layer(TraceLayer::new_for_http())
}
