//! Tool invocation endpoints
//!
//! `POST /v1/tools/:name` takes the tool's arguments as a JSON object and
//! returns its result. Backend failures come back as `{"error": ...}` with
//! status 200 so the calling agent can read them; configuration defects
//! and bad arguments use error statuses.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::{error::AppResult, tools::ToolDescriptor, AppState};

#[derive(Debug, Serialize)]
pub struct ToolListResponse {
    pub tools: Vec<ToolDescriptor>,
}

/// List registered tools
pub async fn list_tools(State(state): State<Arc<AppState>>) -> Json<ToolListResponse> {
    Json(ToolListResponse {
        tools: state.tools.descriptors(),
    })
}

/// Invoke one tool
pub async fn invoke_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(args): Json<Value>,
) -> AppResult<Json<Value>> {
    let result = state.tools.invoke(&name, args).await?;
    Ok(Json(result))
}
