//! Image-based skin disease diagnosis

use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    gateway::{ContentPart, Envelope, GatewayClient, ToolResponse},
    tools::from_dispatch,
};

/// Diagnosis model generations offered by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SkinModel {
    #[default]
    #[serde(rename = "third-skin-v1-diagnose")]
    V1,
    #[serde(rename = "third-skin-v2-diagnose")]
    V2,
}

impl SkinModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkinModel::V1 => "third-skin-v1-diagnose",
            SkinModel::V2 => "third-skin-v2-diagnose",
        }
    }
}

/// Ask about a skin condition shown in the image at `url`.
///
/// The image part precedes the text part. Returns the gateway's raw
/// response text.
pub async fn skin_disease_query(
    gateway: &GatewayClient,
    url: &str,
    query: &str,
    session_id: Option<&str>,
    model: SkinModel,
) -> AppResult<ToolResponse<String>> {
    let envelope = Envelope::new(
        model.as_str(),
        session_id,
        vec![ContentPart::image(url), ContentPart::text(query)],
    );
    from_dispatch(gateway.send(&envelope).await)
}
