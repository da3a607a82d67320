mod error;
mod form;
mod share;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::core::{
    EngineConfig, GrowthPoint, Insight, PlanningInputs, ProjectionResultSet, SavingsBar,
    compute_growth_series, compute_scenarios, derive_insights, savings_chart,
};

pub use error::{ApiError, ApiResult};
pub use form::{PlanForm, build_inputs, validate_inputs};
pub use share::{ShareQuery, from_query, to_query};
pub use store::{InMemoryScenarioStore, NewScenario, SavedScenario, ScenarioStore};

pub const ACCOUNT_HEADER: &str = "x-account-id";
const MAX_SCENARIO_NAME_LEN: usize = 100;

pub struct AppState {
    pub config: EngineConfig,
    pub store: Arc<dyn ScenarioStore>,
}

impl AppState {
    pub fn new(config: EngineConfig, store: Arc<dyn ScenarioStore>) -> Self {
        Self { config, store }
    }
}

/// Everything a client needs to render one calculation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationReport {
    pub inputs: PlanningInputs,
    pub results: ProjectionResultSet,
    pub growth_series: Vec<GrowthPoint>,
    pub insights: Vec<Insight>,
    pub savings_chart: Vec<SavingsBar>,
    pub share_query: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SaveScenarioPayload {
    name: Option<String>,
    #[serde(flatten)]
    form: PlanForm,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

pub fn build_report(inputs: PlanningInputs, config: &EngineConfig) -> ApiResult<CalculationReport> {
    let results = compute_scenarios(&inputs, config)?;
    let growth_series = compute_growth_series(&inputs, &results).to_vec();
    let insights = derive_insights(&inputs, &results);
    let savings_chart = savings_chart(&results);
    let share_query = to_query(&inputs)
        .map_err(|e| ApiError::Internal(format!("Failed to encode share link: {e}")))?;

    Ok(CalculationReport {
        inputs,
        results,
        growth_series,
        insights,
        savings_chart,
        share_query,
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/calculate",
            get(calculate_get_handler).post(calculate_post_handler),
        )
        .route(
            "/api/scenarios",
            get(list_scenarios_handler).post(save_scenario_handler),
        )
        .route("/api/scenarios/:id", delete(delete_scenario_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(addr: SocketAddr, config: EngineConfig) -> std::io::Result<()> {
    let state = Arc::new(AppState::new(
        config,
        Arc::new(InMemoryScenarioStore::new()),
    ));
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "retirement calculator API listening");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    ApiError::NotFound("Not found".to_string()).into_response()
}

async fn calculate_get_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ShareQuery>,
) -> ApiResult<Response> {
    calculate_handler_impl(&state, query.into())
}

async fn calculate_post_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<PlanForm>,
) -> ApiResult<Response> {
    calculate_handler_impl(&state, form)
}

fn calculate_handler_impl(state: &AppState, form: PlanForm) -> ApiResult<Response> {
    let inputs = build_inputs(form).map_err(ApiError::BadRequest)?;
    let report = build_report(inputs, &state.config)?;
    tracing::debug!(
        years_to_retirement = report.results.years_to_retirement,
        scenarios = report.savings_chart.len(),
        "calculation served"
    );
    Ok(json_response(StatusCode::OK, report))
}

async fn list_scenarios_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let account_id = account_id(&headers)?;
    Ok(json_response(StatusCode::OK, state.store.list(&account_id)))
}

async fn save_scenario_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<SaveScenarioPayload>,
) -> ApiResult<Response> {
    let account_id = account_id(&headers)?;
    let name = scenario_name(payload.name)?;
    let inputs = build_inputs(payload.form).map_err(ApiError::BadRequest)?;
    let results = compute_scenarios(&inputs, &state.config)?;
    let snapshot = serde_json::to_value(&results)
        .map_err(|e| ApiError::Internal(format!("Failed to snapshot results: {e}")))?;

    let saved = state.store.save(NewScenario {
        account_id,
        name,
        inputs,
        required_monthly_savings: results.moderate.required_monthly_savings,
        results: snapshot,
    });
    tracing::info!(account_id = %saved.account_id, scenario_id = %saved.id, "scenario saved");

    Ok(json_response(StatusCode::OK, saved))
}

async fn delete_scenario_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let account_id = account_id(&headers)?;
    if !state.store.delete(&account_id, id) {
        return Err(ApiError::NotFound(format!("Scenario '{id}' not found")));
    }
    tracing::info!(%account_id, scenario_id = %id, "scenario deleted");

    Ok(json_response(
        StatusCode::OK,
        MessageResponse {
            message: "Scenario deleted successfully".to_string(),
        },
    ))
}

fn account_id(headers: &HeaderMap) -> ApiResult<String> {
    headers
        .get(ACCOUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(ApiError::Unauthorized)
}

fn scenario_name(name: Option<String>) -> ApiResult<String> {
    let name = name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }
    if name.chars().count() > MAX_SCENARIO_NAME_LEN {
        return Err(ApiError::BadRequest(format!(
            "name must be at most {MAX_SCENARIO_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

pub(crate) fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}
