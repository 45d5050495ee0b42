use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;

use crate::catalog::{AccountCatalogProvider, CatalogError};
use crate::core::{
    InputError, Investment, OptimizationOutcome, OptimizationRequest, Optimizer, SolverStatus,
};

#[derive(Clone)]
pub struct AppState {
    optimizer: Arc<Optimizer>,
    catalog: Arc<dyn AccountCatalogProvider>,
}

impl AppState {
    pub fn new(optimizer: Optimizer, catalog: Arc<dyn AccountCatalogProvider>) -> Self {
        Self {
            optimizer: Arc::new(optimizer),
            catalog,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("could not retrieve account data: {0}")]
    Catalog(#[from] CatalogError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OptimizePayload {
    total_investment: Option<f64>,
    savings_goals: Option<Vec<SavingsGoalPayload>>,
    isa_allowance_used: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SavingsGoalPayload {
    amount: f64,
}

#[derive(Debug, Serialize)]
struct OptimizeResponse<'a> {
    status: SolverStatus,
    investments: &'a [Investment],
    total_return: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl<'a> From<&'a OptimizationOutcome> for OptimizeResponse<'a> {
    fn from(outcome: &'a OptimizationOutcome) -> Self {
        Self {
            status: outcome.status,
            investments: &outcome.investments,
            total_return: outcome.total_return,
            message: outcome.message.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/optimize", post(optimize_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(port: u16, state: AppState) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("savings optimizer API listening on http://{addr}");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "healthy" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn optimize_handler(
    State(state): State<AppState>,
    payload: Result<Json<OptimizePayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    };
    let request = match request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => return app_error_response(AppError::from(err)),
    };

    let joined = tokio::task::spawn_blocking(move || run_optimization(&state, &request)).await;
    match joined {
        Ok(Ok(outcome)) => json_response(StatusCode::OK, OptimizeResponse::from(&outcome)),
        Ok(Err(err)) => app_error_response(err),
        Err(join_err) => {
            error!("optimization task failed: {join_err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "optimization task failed")
        }
    }
}

fn run_optimization(
    state: &AppState,
    request: &OptimizationRequest,
) -> Result<OptimizationOutcome, AppError> {
    let accounts = state.catalog.accounts()?;
    Ok(state.optimizer.optimize(&accounts, request)?)
}

fn request_from_payload(payload: OptimizePayload) -> Result<OptimizationRequest, InputError> {
    let total_investment = match (payload.total_investment, payload.savings_goals) {
        (Some(total), _) => total,
        (None, Some(goals)) if !goals.is_empty() => goals.iter().map(|goal| goal.amount).sum(),
        _ => return Err(InputError::MissingInvestment),
    };

    Ok(OptimizationRequest {
        total_investment,
        isa_allowance_used: payload.isa_allowance_used.unwrap_or(0.0),
    })
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn app_error_response(err: AppError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        error!("{err}");
    }
    error_response(status, &err.to_string())
}

#[cfg(test)]
fn request_from_json(json: &str) -> Result<OptimizationRequest, String> {
    let payload = serde_json::from_str::<OptimizePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    request_from_payload(payload).map_err(|e| e.to_string())
}
