use crate::config::Config;
use crate::db::{ApplySummary, Database, LogRow, NewRoutine, VariableKind, VariableRow};
use crate::planner::{self, PlannedRoutineLog, Routine};
use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<Config>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/status", get(status))
        .route(
            "/api/v1/variables",
            get(variables_list).post(variables_create),
        )
        .route("/api/v1/routines", get(routines_list).post(routines_create))
        .route(
            "/api/v1/routines/:id",
            get(routine_get).delete(routine_delete),
        )
        .route("/api/v1/routine-logs/plan", post(routine_logs_plan))
        .route("/api/v1/routine-logs/batch", post(routine_logs_batch))
        .route("/api/v1/logs", get(logs))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct LogsQuery {
    user_id: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateVariablePayload {
    name: String,
    kind: VariableKind,
    #[serde(default)]
    unit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlanRequest {
    start_date: String,
    end_date: String,
    #[serde(default)]
    routine_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct BatchRequest {
    #[serde(rename = "userId", alias = "user_id")]
    user_id: String,
    logs: Vec<PlannedRoutineLog>,
}

#[derive(Debug, Serialize)]
struct StatusPayload {
    api_port: u16,
    variables: i64,
    routines: i64,
    default_user_id: String,
    latest_log_date: Option<String>,
    auto_log_enabled: bool,
}

#[derive(Debug, Serialize)]
struct VariablesPayload {
    variables: Vec<VariableRow>,
}

#[derive(Debug, Serialize)]
struct RoutinesPayload {
    routines: Vec<Routine>,
}

#[derive(Debug, Serialize)]
struct PlanPayload {
    start_date: String,
    end_date: String,
    count: usize,
    logs: Vec<PlannedRoutineLog>,
}

#[derive(Debug, Serialize)]
struct LogsPayload {
    user_id: String,
    from: String,
    to: String,
    count: usize,
    logs: Vec<LogRow>,
}

async fn status(State(state): State<ApiState>) -> ApiResult<Json<StatusPayload>> {
    let database = Database::open(&state.config.db_path)?;

    Ok(Json(StatusPayload {
        api_port: state.config.api_port,
        variables: database.count_variables()?,
        routines: database.count_routines()?,
        default_user_id: state.config.default_user_id.clone(),
        latest_log_date: database.latest_log_date(&state.config.default_user_id)?,
        auto_log_enabled: state.config.auto_log_enabled,
    }))
}

async fn variables_list(State(state): State<ApiState>) -> ApiResult<Json<VariablesPayload>> {
    let database = Database::open(&state.config.db_path)?;
    let variables = database.list_variables()?;

    Ok(Json(VariablesPayload { variables }))
}

async fn variables_create(
    State(state): State<ApiState>,
    Json(payload): Json<CreateVariablePayload>,
) -> ApiResult<(StatusCode, Json<VariableRow>)> {
    let database = Database::open(&state.config.db_path)?;

    if database.variable_by_name(&payload.name)?.is_some() {
        return Err(ApiError::BadRequest(format!(
            "Variable already exists: {}",
            payload.name.trim()
        )));
    }

    let variable = database
        .create_variable(&payload.name, payload.kind, payload.unit.as_deref())
        .map_err(|error| ApiError::BadRequest(error.to_string()))?;

    Ok((StatusCode::CREATED, Json(variable)))
}

async fn routines_list(State(state): State<ApiState>) -> ApiResult<Json<RoutinesPayload>> {
    let database = Database::open(&state.config.db_path)?;
    let routines = database.list_routines()?;

    Ok(Json(RoutinesPayload { routines }))
}

async fn routines_create(
    State(state): State<ApiState>,
    Json(payload): Json<NewRoutine>,
) -> ApiResult<(StatusCode, Json<Routine>)> {
    let mut database = Database::open(&state.config.db_path)?;
    let routine = database
        .create_routine(&payload)
        .map_err(|error| ApiError::BadRequest(error.to_string()))?;

    Ok((StatusCode::CREATED, Json(routine)))
}

async fn routine_get(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Routine>> {
    let database = Database::open(&state.config.db_path)?;

    database
        .routine(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No routine found with id: {id}")))
}

async fn routine_delete(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let mut database = Database::open(&state.config.db_path)?;

    if !database.delete_routine(id)? {
        return Err(ApiError::NotFound(format!("No routine found with id: {id}")));
    }

    Ok(Json(json!({ "deleted": true, "id": id })))
}

async fn routine_logs_plan(
    State(state): State<ApiState>,
    Json(request): Json<PlanRequest>,
) -> ApiResult<Json<PlanPayload>> {
    let start = parse_date(&request.start_date).map_err(bad_request)?;
    let end = parse_date(&request.end_date).map_err(bad_request)?;
    planner::validate_range(start, end, state.config.plan_max_days).map_err(bad_request)?;

    let database = Database::open(&state.config.db_path)?;
    let routines = planner::select_routines(database.list_routines()?, &request.routine_ids);
    let logs = planner::generate_planned_routine_logs(&routines, start, end);

    Ok(Json(PlanPayload {
        start_date: start.format("%Y-%m-%d").to_string(),
        end_date: end.format("%Y-%m-%d").to_string(),
        count: logs.len(),
        logs,
    }))
}

async fn routine_logs_batch(
    State(state): State<ApiState>,
    Json(request): Json<BatchRequest>,
) -> ApiResult<Json<ApplySummary>> {
    let user_id = request.user_id.trim();
    if user_id.is_empty() {
        return Err(ApiError::BadRequest("userId must not be empty".to_string()));
    }

    let mut database = Database::open(&state.config.db_path)?;
    let variable_ids = request
        .logs
        .iter()
        .map(|log| log.variable_id)
        .collect::<Vec<_>>();
    let missing = database.missing_variable_ids(&variable_ids)?;
    if !missing.is_empty() {
        let listed = missing
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ApiError::BadRequest(format!("Unknown variable id(s): {listed}")));
    }

    let summary = database.apply_planned_logs(user_id, &request.logs)?;
    info!(
        user_id,
        received = request.logs.len(),
        created = summary.created,
        skipped = summary.skipped,
        failed = summary.failed,
        "batch routine logs handled"
    );

    Ok(Json(summary))
}

async fn logs(
    State(state): State<ApiState>,
    Query(query): Query<LogsQuery>,
) -> ApiResult<Json<LogsPayload>> {
    let from_date = query
        .from
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(bad_request)?
        .unwrap_or_else(|| Local::now().date_naive());

    let to_date = query
        .to
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(bad_request)?
        .unwrap_or(from_date);

    let user_id = query
        .user_id
        .unwrap_or_else(|| state.config.default_user_id.clone());

    let database = Database::open(&state.config.db_path)?;
    let records = database.logs_between(&user_id, from_date, to_date)?;

    Ok(Json(LogsPayload {
        user_id,
        from: from_date.format("%Y-%m-%d").to_string(),
        to: to_date.format("%Y-%m-%d").to_string(),
        count: records.len(),
        logs: records,
    }))
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format: {input}. Example: 2024-01-01"))
}

fn bad_request(error: anyhow::Error) -> ApiError {
    ApiError::BadRequest(format!("{error:#}"))
}

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": error.to_string() })),
            )
                .into_response(),
        }
    }
}
