//! Drug question answering based on package inserts
//!
//! Covers indications, contraindications, dosage, special populations and
//! drug combinations.

use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    gateway::{Envelope, GatewayClient, ToolResponse},
    tools::from_dispatch,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrugQaModel {
    #[default]
    #[serde(rename = "third-common-v1-DrugQA")]
    V1,
    #[serde(rename = "third-common-v2-DrugQA")]
    V2,
}

impl DrugQaModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrugQaModel::V1 => "third-common-v1-DrugQA",
            DrugQaModel::V2 => "third-common-v2-DrugQA",
        }
    }
}

/// Ask a drug question, e.g. whether a cold remedy contains paracetamol.
///
/// Returns the gateway's raw response text.
pub async fn consult_drug(
    gateway: &GatewayClient,
    query: &str,
    model: DrugQaModel,
    session_id: Option<&str>,
) -> AppResult<ToolResponse<String>> {
    let envelope = Envelope::text(model.as_str(), session_id, query);
    from_dispatch(gateway.send(&envelope).await)
}
