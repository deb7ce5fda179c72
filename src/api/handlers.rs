use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        AggregateResult, CategorySelections, ChartSpec, NewPreference, PreferenceRecord,
        Recommendation, SubmissionStats,
    },
    services::{analysis, charts},
};

use super::AppState;

const NO_PREFERENCES: &str = "No preferences have been submitted yet";

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List every submitted preference
pub async fn list_preferences(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PreferenceRecord>>> {
    Ok(Json(state.store.fetch_all().await?))
}

/// Submit one person's preferences
pub async fn submit_preference(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<NewPreference>,
) -> AppResult<(StatusCode, Json<PreferenceRecord>)> {
    let preference = request.validate()?;
    let record = state.store.insert(preference).await?;

    tracing::info!(
        request_id = %request_id,
        id = %record.id,
        genres = record.selections.genres.len(),
        moods = record.selections.moods.len(),
        "Preference submitted"
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// Total submissions and submissions during the last seven days
pub async fn submission_stats(State(state): State<AppState>) -> AppResult<Json<SubmissionStats>> {
    let week_ago = Utc::now() - Duration::days(7);

    Ok(Json(SubmissionStats {
        total_entries: state.store.count().await?,
        new_this_week: state.store.count_since(week_ago).await?,
    }))
}

/// Aggregated view over every submission
pub async fn get_analysis(State(state): State<AppState>) -> AppResult<Json<AggregateResult>> {
    let records = fetch_non_empty(&state).await?;
    Ok(Json(analysis::aggregate(&records)?))
}

/// Chart specifications for the analysis dashboard
pub async fn get_charts(State(state): State<AppState>) -> AppResult<Json<Vec<ChartSpec>>> {
    let records = fetch_non_empty(&state).await?;
    let aggregate = analysis::aggregate(&records)?;
    Ok(Json(charts::dashboard(&aggregate)))
}

/// Recommendations for the whole group, cached per preference set
pub async fn group_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Response> {
    let records = fetch_non_empty(&state).await?;

    tracing::info!(
        request_id = %request_id,
        records = records.len(),
        "Processing group recommendation request"
    );

    let recommendation = state
        .recommendations
        .cached_group_recommendations(&records)
        .await?;

    Ok(recommendation_response(recommendation))
}

/// Recommendations for a single person's selections
pub async fn personal_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(selections): Json<CategorySelections>,
) -> AppResult<Response> {
    let selections = selections.validate()?;

    tracing::info!(
        request_id = %request_id,
        "Processing personal recommendation request"
    );

    let recommendation = state
        .recommendations
        .personal_recommendations(&selections)
        .await;

    Ok(recommendation_response(recommendation))
}

async fn fetch_non_empty(state: &AppState) -> AppResult<Vec<PreferenceRecord>> {
    let records = state.store.fetch_all().await?;
    if records.is_empty() {
        return Err(AppError::NotFound(NO_PREFERENCES.to_string()));
    }
    Ok(records)
}

/// Failed generations keep their payload but are reported as a bad gateway
fn recommendation_response(recommendation: Recommendation) -> Response {
    let status = if recommendation.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };

    (status, Json(recommendation)).into_response()
}
