use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::core::{
    CalculationResult, ClaimMode, ComparisonRow, EstimateStatus, InputError, LABOR_INSURANCE,
    RawNumber, ScenarioInputs, ScenarioKind, ScenarioReport, build_scenarios, calculate_for_mode,
    check_projected_grade, format_grouped, render_report, resolve_grade, resolve_statutory_age,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliClaimMode {
    Fixed,
    PlannedAge,
}

impl From<CliClaimMode> for ClaimMode {
    fn from(value: CliClaimMode) -> Self {
        match value {
            CliClaimMode::Fixed => ClaimMode::Fixed,
            CliClaimMode::PlannedAge => ClaimMode::PlannedAge,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiClaimMode {
    #[serde(alias = "fixed-comparison", alias = "fixedComparison")]
    Fixed,
    #[serde(alias = "plannedAge", alias = "planned_age")]
    PlannedAge,
}

impl From<ApiClaimMode> for CliClaimMode {
    fn from(value: ApiClaimMode) -> Self {
        match value {
            ApiClaimMode::Fixed => CliClaimMode::Fixed,
            ApiClaimMode::PlannedAge => CliClaimMode::PlannedAge,
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("failed to serialize estimate: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A form field sent either as a JSON number or as text. Query strings always
/// arrive as text, and the form sends unset fields as blanks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum FormNumber {
    Number(f64),
    Text(String),
}

impl RawNumber for FormNumber {
    fn to_number(&self) -> Option<f64> {
        match self {
            FormNumber::Number(value) => value.to_number(),
            FormNumber::Text(text) => text.to_number(),
        }
    }
}

/// Whole, non-negative value of an optional form field; anything else counts as unset.
fn form_whole(field: Option<FormNumber>) -> Option<u32> {
    field
        .to_number()
        .map(f64::trunc)
        .filter(|value| *value >= 0.0 && *value <= f64::from(u32::MAX))
        .map(|value| value as u32)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EstimatePayload {
    birth_year: Option<FormNumber>,
    work_start_age: Option<FormNumber>,
    retirement_age: Option<FormNumber>,
    insured_years: Option<FormNumber>,
    current_salary: Option<FormNumber>,
    projected_salary: Option<FormNumber>,
    claim_mode: Option<ApiClaimMode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PensionQuery {
    salary: Option<String>,
    years: Option<String>,
    planned_age: Option<String>,
    claim_mode: Option<ApiClaimMode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GradeQuery {
    salary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StatutoryAgeQuery {
    birth_year: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "pension-estimate",
    about = "Labor insurance old-age pension estimator (claim at 60 vs claim at 65)"
)]
struct Cli {
    #[arg(long, help = "Birth year in the ROC calendar (Gregorian year - 1911)")]
    birth_year: Option<u32>,
    #[arg(long)]
    work_start_age: Option<u32>,
    #[arg(long, help = "Planned retirement age")]
    retirement_age: Option<u32>,
    #[arg(long)]
    insured_years: Option<u32>,
    #[arg(
        long,
        help = "Current monthly salary; resolved to its labor insurance grade"
    )]
    current_salary: Option<u32>,
    #[arg(
        long,
        default_value_t = 45_800,
        help = "Average insured salary of the last 60 months before retiring; must be a grade"
    )]
    projected_salary: u32,
    #[arg(
        long,
        value_enum,
        default_value_t = CliClaimMode::Fixed,
        help = "fixed compares 60 with 65; planned-age compares the retirement age with five years later"
    )]
    claim_mode: CliClaimMode,
    #[arg(long, help = "Print the estimate as JSON instead of the text report")]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioResponse {
    scenario: &'static str,
    title: &'static str,
    subtitle: String,
    status: EstimateStatus,
    insured_salary: u32,
    insured_years: Option<u32>,
    result: CalculationResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EstimateResponse {
    statutory_age: u32,
    current_grade: Option<u32>,
    projected_salary: u32,
    validation_error: Option<String>,
    show_chart: bool,
    scenarios: Vec<ScenarioResponse>,
    comparison: Vec<ComparisonRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PensionResponse {
    status: EstimateStatus,
    result: CalculationResult,
}

#[derive(Debug, Serialize)]
struct GradesResponse {
    grades: &'static [u32],
    max: u32,
}

#[derive(Debug, Serialize)]
struct GradeResponse {
    salary: Option<f64>,
    grade: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatutoryAgeResponse {
    birth_year: Option<f64>,
    statutory_age: u32,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: &Cli) -> Result<ScenarioInputs, InputError> {
    check_projected_grade(cli.projected_salary)?;

    Ok(ScenarioInputs {
        birth_year: cli.birth_year,
        work_start_age: cli.work_start_age,
        retirement_age: cli.retirement_age,
        insured_years: cli.insured_years,
        current_salary: cli.current_salary,
        projected_salary: cli.projected_salary,
        claim_mode: cli.claim_mode.into(),
    })
}

/// Parses command-line arguments and renders the estimate, as a text report or JSON.
pub fn run_cli<I, T>(args: I) -> Result<String, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let inputs = build_inputs(&cli)?;
    let report = build_scenarios(&inputs);
    if let Some(err) = &report.working_span_error {
        tracing::warn!(%err, "insured years do not fit the working span");
    }

    if cli.json {
        let response = build_estimate_response(&report);
        Ok(serde_json::to_string_pretty(&response)?)
    } else {
        Ok(render_report(&inputs, &report))
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "pension estimate API listening");
    tracing::info!("Local access: http://127.0.0.1:{port}/api/grades");

    axum::serve(listener, app).await
}

fn router() -> Router {
    Router::new()
        .route("/api/grades", get(grades_handler))
        .route("/api/grade", get(grade_handler))
        .route("/api/statutory-age", get(statutory_age_handler))
        .route("/api/pension", get(pension_handler))
        .route(
            "/api/estimate",
            get(estimate_get_handler).post(estimate_post_handler),
        )
        .route("/api/report", get(report_handler))
        .fallback(not_found_handler)
}

async fn grades_handler() -> Response {
    json_response(
        StatusCode::OK,
        GradesResponse {
            grades: LABOR_INSURANCE.grades(),
            max: LABOR_INSURANCE.max(),
        },
    )
}

async fn grade_handler(Query(query): Query<GradeQuery>) -> Response {
    let salary = query.salary.as_deref().to_number();
    let grade = resolve_grade(salary.unwrap_or(f64::NAN));
    json_response(StatusCode::OK, GradeResponse { salary, grade })
}

async fn statutory_age_handler(Query(query): Query<StatutoryAgeQuery>) -> Response {
    let birth_year = query.birth_year.as_deref().to_number();
    let statutory_age = resolve_statutory_age(birth_year.unwrap_or(f64::NAN));
    json_response(
        StatusCode::OK,
        StatutoryAgeResponse {
            birth_year,
            statutory_age,
        },
    )
}

async fn pension_handler(query: Result<Query<PensionQuery>, QueryRejection>) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return malformed(&rejection),
    };
    let mode: ClaimMode = query
        .claim_mode
        .map(CliClaimMode::from)
        .unwrap_or(CliClaimMode::Fixed)
        .into();
    let estimate = calculate_for_mode(
        mode,
        query.salary.as_deref(),
        query.years.as_deref(),
        query.planned_age.as_deref(),
    );
    json_response(
        StatusCode::OK,
        PensionResponse {
            status: estimate.status(),
            result: estimate.into_result_or_empty(),
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn estimate_get_handler(
    payload: Result<Query<EstimatePayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => estimate_handler_impl(payload).await,
        Err(rejection) => malformed(&rejection),
    }
}

async fn estimate_post_handler(
    payload: Result<Json<EstimatePayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => estimate_handler_impl(payload).await,
        Err(rejection) => malformed(&rejection),
    }
}

async fn estimate_handler_impl(payload: EstimatePayload) -> Response {
    let inputs = match api_request_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(err) => return rejected(err),
    };
    let report = build_scenarios(&inputs);
    json_response(StatusCode::OK, build_estimate_response(&report))
}

async fn report_handler(
    payload: Result<Query<EstimatePayload>, QueryRejection>,
) -> Response {
    let Query(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed(&rejection),
    };
    let inputs = match api_request_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(err) => return rejected(err),
    };
    let report = build_scenarios(&inputs);
    with_cache_control((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_report(&inputs, &report),
    ))
}

fn rejected(err: InputError) -> Response {
    tracing::warn!(%err, "rejected estimate request");
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

fn malformed(rejection: &dyn std::fmt::Display) -> Response {
    tracing::warn!(%rejection, "malformed request");
    error_response(StatusCode::BAD_REQUEST, &rejection.to_string())
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ScenarioInputs, String> {
    let payload = serde_json::from_str::<EstimatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload).map_err(|e| e.to_string())
}

fn api_request_from_payload(payload: EstimatePayload) -> Result<ScenarioInputs, InputError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = form_whole(payload.birth_year) {
        cli.birth_year = Some(v);
    }
    if let Some(v) = form_whole(payload.work_start_age) {
        cli.work_start_age = Some(v);
    }
    if let Some(v) = form_whole(payload.retirement_age) {
        cli.retirement_age = Some(v);
    }
    if let Some(v) = form_whole(payload.insured_years) {
        cli.insured_years = Some(v);
    }
    if let Some(v) = form_whole(payload.current_salary) {
        cli.current_salary = Some(v);
    }
    if let Some(v) = form_whole(payload.projected_salary) {
        cli.projected_salary = v;
    }
    if let Some(v) = payload.claim_mode {
        cli.claim_mode = v.into();
    }

    build_inputs(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        birth_year: None,
        work_start_age: None,
        retirement_age: None,
        insured_years: None,
        current_salary: None,
        projected_salary: LABOR_INSURANCE.max(),
        claim_mode: CliClaimMode::Fixed,
        json: true,
    }
}

fn scenario_subtitle(kind: ScenarioKind, report: &ScenarioReport) -> String {
    match kind {
        ScenarioKind::Current => format!(
            "投保級距 {} 元",
            format_grouped(u64::from(report.current_grade.unwrap_or(0)))
        ),
        ScenarioKind::Projected => format!(
            "預計級距 {} 元",
            format_grouped(u64::from(report.projected_salary))
        ),
        ScenarioKind::ExtendedCurrent | ScenarioKind::ExtendedProjected => {
            "投保年資 + 5 年".to_string()
        }
    }
}

fn build_estimate_response(report: &ScenarioReport) -> EstimateResponse {
    EstimateResponse {
        statutory_age: report.statutory_age,
        current_grade: report.current_grade,
        projected_salary: report.projected_salary,
        validation_error: report.working_span_error.as_ref().map(ToString::to_string),
        show_chart: report.has_chart_data(),
        scenarios: report
            .scenarios
            .iter()
            .map(|scenario| ScenarioResponse {
                scenario: scenario.kind.chart_label(),
                title: scenario.kind.card_title(),
                subtitle: scenario_subtitle(scenario.kind, report),
                status: scenario.estimate.status(),
                insured_salary: scenario.salary,
                insured_years: scenario.years,
                result: scenario.result_or_empty(),
            })
            .collect(),
        comparison: report.comparison_rows(),
    }
}
