//! HTTP request handlers for the pay-run engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::compute_pay_period;
use crate::engine::{LineEdit, NewRateEntry};

use super::request::{
    AddRateEntryRequest, ComputePayPeriodRequest, CreatePayRunRequest, DeletePayRunParams,
    DeleteRateEntryParams, EditPayRunLineRequest, TransitionPayRunRequest,
};
use super::response::{ApiError, ApiErrorResponse, CreatePayRunResponse, PayRunDetailResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/pay-periods/compute", post(compute_pay_period_handler))
        .route("/pay-runs", post(create_pay_run_handler))
        .route("/pay-runs/:run_id/status", post(transition_pay_run_handler))
        .route(
            "/pay-runs/:run_id",
            get(get_pay_run_handler).delete(delete_pay_run_handler),
        )
        .route("/pay-run-lines/:line_id", patch(edit_pay_run_line_handler))
        .route("/pay-run-lines/:line_id/changes", get(line_changes_handler))
        .route("/rate-history", post(add_rate_entry_handler))
        .route(
            "/rate-history/:employee_id/:effective_date",
            delete(delete_rate_entry_handler),
        )
        .with_state(state)
}

/// Handler for `POST /pay-periods/compute`.
///
/// Pure computation; no storage is touched.
async fn compute_pay_period_handler(
    payload: Result<Json<ComputePayPeriodRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    info!(
        correlation_id = %correlation_id,
        timezone = %request.timezone,
        "Computing pay period"
    );
    match compute_pay_period(request.reference_date, &request.scheme, &request.timezone) {
        Ok(period) => (StatusCode::OK, Json(period)).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Pay period computation failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for `POST /pay-runs`.
async fn create_pay_run_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreatePayRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    info!(
        correlation_id = %correlation_id,
        tenant_id = %request.tenant_id,
        period_start = %request.period_start,
        period_end = %request.period_end,
        "Generating pay run"
    );
    match state.builder().build(
        &request.tenant_id,
        request.period_start,
        request.period_end,
        &request.actor_id,
    ) {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %outcome.run.id,
                staff_count = outcome.run.totals.staff_count,
                skipped = outcome.skipped_employee_ids.len(),
                "Pay run created"
            );
            (
                StatusCode::CREATED,
                Json(CreatePayRunResponse {
                    run: outcome.run,
                    lines: outcome.lines,
                    skipped_employee_ids: outcome.skipped_employee_ids,
                }),
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Pay run creation failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for `PATCH /pay-run-lines/:line_id`.
async fn edit_pay_run_line_handler(
    State(state): State<AppState>,
    Path(line_id): Path<Uuid>,
    Json(request): Json<EditPayRunLineRequest>,
) -> Response {
    let edit = LineEdit {
        adjustments: request.adjustments,
        adjustment_reason: request.adjustment_reason,
        status: request.status,
    };
    match state.ledger().edit_line(line_id, edit, &request.actor_id) {
        Ok(line) => (StatusCode::OK, Json(line)).into_response(),
        Err(err) => {
            warn!(line_id = %line_id, error = %err, "Line edit rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for `GET /pay-run-lines/:line_id/changes`.
async fn line_changes_handler(
    State(state): State<AppState>,
    Path(line_id): Path<Uuid>,
) -> Response {
    match state.ledger().line_changes(line_id) {
        Ok(changes) => (StatusCode::OK, Json(changes)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for `GET /pay-runs/:run_id`.
async fn get_pay_run_handler(State(state): State<AppState>, Path(run_id): Path<Uuid>) -> Response {
    match state.ledger().run_detail(run_id) {
        Ok((run, lines)) => (StatusCode::OK, Json(PayRunDetailResponse { run, lines })).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for `POST /pay-runs/:run_id/status`.
async fn transition_pay_run_handler(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    Json(request): Json<TransitionPayRunRequest>,
) -> Response {
    match state
        .ledger()
        .transition_run(run_id, request.new_status, &request.actor_id)
    {
        Ok(run) => (StatusCode::OK, Json(run)).into_response(),
        Err(err) => {
            warn!(run_id = %run_id, error = %err, "Status transition rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for `DELETE /pay-runs/:run_id`.
async fn delete_pay_run_handler(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    Query(params): Query<DeletePayRunParams>,
) -> Response {
    let actor = params.actor_id.unwrap_or_else(|| "system".to_string());
    match state.ledger().delete_run(run_id, &actor) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            warn!(run_id = %run_id, error = %err, "Pay run deletion rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for `POST /rate-history`.
async fn add_rate_entry_handler(
    State(state): State<AppState>,
    Json(request): Json<AddRateEntryRequest>,
) -> Response {
    let entry = NewRateEntry {
        tenant_id: request.tenant_id,
        employee_id: request.employee_id,
        hourly_rate: request.hourly_rate,
        effective_date: request.effective_date,
        notes: request.notes,
    };
    match state.rates().add_entry(entry, &request.actor_id) {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(err) => {
            warn!(error = %err, "Rate entry rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for `DELETE /rate-history/:employee_id/:effective_date`.
async fn delete_rate_entry_handler(
    State(state): State<AppState>,
    Path((employee_id, effective_date)): Path<(String, NaiveDate)>,
    Query(params): Query<DeleteRateEntryParams>,
) -> Response {
    match state.rates().delete_entry(
        &params.tenant_id,
        &employee_id,
        effective_date,
        &params.actor_id,
    ) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            warn!(employee_id = %employee_id, error = %err, "Rate entry deletion rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

fn json_rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            "MISSING_CONTENT_TYPE",
            "Content-Type must be application/json",
        ),
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    (StatusCode::BAD_REQUEST, Json(error)).into_response()
}
