//! Agent definition endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    agents::AgentSpec,
    error::{AppError, AppResult},
    AppState,
};

/// The whole agent tree
pub async fn get_agents(State(state): State<Arc<AppState>>) -> Json<AgentSpec> {
    Json(state.agents.clone())
}

/// One agent and its sub-agents
pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> AppResult<Json<AgentSpec>> {
    state
        .agents
        .find(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Unknown agent: {}", name)))
}
