use crate::api::api_error::APIError;
use crate::api::model::{ChallengeAction, ChallengePayload};
use crate::api::server::AppState;
use crate::error::Error;
use crate::solver::Challenge;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

const VERSION: &str = "v1alpha1";

pub(super) fn new(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/apis/:group/v1alpha1", get(discovery))
        .route("/apis/:group/v1alpha1/:solver", post(solve))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.api_timeout))
        .with_state(state)
}

#[allow(clippy::unused_async)]
async fn health_check() -> impl IntoResponse {
    Json(json!({"ok":"healthy"}))
}

#[allow(clippy::unused_async)]
async fn discovery(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<impl IntoResponse, APIError> {
    check_group(&state, &group)?;
    let name = state.solver.name();
    Ok(Json(json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": format!("{group}/{VERSION}"),
        "resources": [{
            "name": name,
            "singularName": name,
            "namespaced": false,
            "kind": "ChallengePayload",
            "verbs": ["create"],
        }],
    })))
}

async fn solve(
    State(state): State<AppState>,
    Path((group, solver)): Path<(String, String)>,
    WithRejection(Json(payload), _): WithRejection<Json<ChallengePayload>, APIError>,
) -> Result<Json<ChallengePayload>, APIError> {
    check_group(&state, &group)?;
    if solver != state.solver.name() {
        return Err(Error::UnknownSolver(solver).into());
    }
    let request = payload.request.ok_or(Error::MissingRequest)?;
    let challenge = Challenge::from(&request);

    let result = match request.action {
        ChallengeAction::Present => state.solver.present(&challenge).await,
        ChallengeAction::CleanUp => state.solver.clean_up(&challenge).await,
    };
    if let Err(err) = &result {
        tracing::warn!(
            uid = %request.uid,
            action = ?request.action,
            fqdn = %request.resolved_fqdn,
            "challenge request failed: {err}"
        );
    }

    Ok(Json(ChallengePayload::reply(request.uid, result)))
}

fn check_group(state: &AppState, group: &str) -> Result<(), Error> {
    if group == state.config.group_name {
        Ok(())
    } else {
        Err(Error::UnknownGroup(group.to_string()))
    }
}
