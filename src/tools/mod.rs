//! Agent tools
//!
//! Plain async functions wrapping the backend services, plus a registry
//! that invokes them by name with JSON arguments so any agent host can
//! expose them to a language model.

pub mod doctor;
pub mod drug;
pub mod ocr;
pub mod report;
pub mod skin;

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    error::{AppError, AppResult},
    gateway::{DispatchError, GatewayClient, ToolResponse},
    routes::metrics::record_tool_invocation,
};

pub use doctor::{ask_doctor, ConsultationSession, CONSULTATION_MODEL};
pub use drug::{consult_drug, DrugQaModel};
pub use ocr::{OcrClient, OcrOptions, OcrResult};
pub use report::render_html;
pub use skin::{skin_disease_query, SkinModel};

/// Split a dispatch result into the tool error policy.
///
/// Configuration errors abort the call; every other failure becomes an
/// error envelope the caller can read.
pub fn from_dispatch<T>(result: Result<T, DispatchError>) -> AppResult<ToolResponse<T>> {
    match result {
        Ok(value) => Ok(ToolResponse::Ok(value)),
        Err(DispatchError::Configuration(e)) => Err(e.into()),
        Err(e) => {
            warn!(error = %e, "Gateway call returned an error envelope");
            Ok(ToolResponse::Error(e.into()))
        }
    }
}

/// Names of the invocable tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    AskDoctor,
    SkinDiseaseQuery,
    ConsultDrug,
    RecognizeText,
    RenderReport,
}

impl ToolName {
    pub const ALL: [ToolName; 5] = [
        ToolName::AskDoctor,
        ToolName::SkinDiseaseQuery,
        ToolName::ConsultDrug,
        ToolName::RecognizeText,
        ToolName::RenderReport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::AskDoctor => "ask_doctor",
            ToolName::SkinDiseaseQuery => "skin_disease_query",
            ToolName::ConsultDrug => "consult_drug",
            ToolName::RecognizeText => "recognize_text",
            ToolName::RenderReport => "render_report",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::AskDoctor => {
                "Multi-turn AI doctor consultation. scene 0 means the doctor expects another \
                 answer: call again with the returned session_id. scene 202 means the \
                 consultation is finished and the final report can be shown."
            }
            ToolName::SkinDiseaseQuery => {
                "Skin disease diagnosis from an image URL plus a question. Pass the returned \
                 session_id to keep context."
            }
            ToolName::ConsultDrug => {
                "Answer questions about a drug from its package insert: indications, \
                 contraindications, precautions, dosage, special populations, combinations."
            }
            ToolName::RecognizeText => {
                "Recognize text in an image URL, e.g. a medicine package."
            }
            ToolName::RenderReport => {
                "Render an HTML report template using $name or ${name} placeholders."
            }
        }
    }

    /// JSON schema of the tool's arguments
    pub fn parameters(&self) -> Value {
        match self {
            ToolName::AskDoctor => json!({
                "type": "object",
                "properties": {
                    "user_input": {"type": "string"},
                    "session_id": {"type": "string"}
                },
                "required": ["user_input"]
            }),
            ToolName::SkinDiseaseQuery => json!({
                "type": "object",
                "properties": {
                    "url": {"type": "string"},
                    "query": {"type": "string"},
                    "session_id": {"type": "string"},
                    "model": {"type": "string", "enum": ["third-skin-v1-diagnose", "third-skin-v2-diagnose"]}
                },
                "required": ["url", "query"]
            }),
            ToolName::ConsultDrug => json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string"},
                    "model": {"type": "string", "enum": ["third-common-v1-DrugQA", "third-common-v2-DrugQA"]},
                    "session_id": {"type": "string"}
                },
                "required": ["query"]
            }),
            ToolName::RecognizeText => json!({
                "type": "object",
                "properties": {
                    "url": {"type": "string"},
                    "detect_direction": {"type": "boolean"},
                    "paragraph": {"type": "boolean"},
                    "probability": {"type": "boolean"}
                },
                "required": ["url"]
            }),
            ToolName::RenderReport => json!({
                "type": "object",
                "properties": {
                    "template": {"type": "string"},
                    "variables": {"type": "object"}
                },
                "required": ["template"]
            }),
        }
    }
}

impl FromStr for ToolName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::NotFound(format!("Unknown tool: {}", s)))
    }
}

/// Listing entry for a tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

impl From<ToolName> for ToolDescriptor {
    fn from(tool: ToolName) -> Self {
        Self {
            name: tool.as_str(),
            description: tool.description(),
            parameters: tool.parameters(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AskDoctorArgs {
    user_input: String,
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SkinDiseaseArgs {
    url: String,
    query: String,
    session_id: Option<String>,
    #[serde(default)]
    model: SkinModel,
}

#[derive(Debug, Deserialize)]
struct ConsultDrugArgs {
    query: String,
    #[serde(default)]
    model: DrugQaModel,
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecognizeTextArgs {
    url: String,
    #[serde(flatten)]
    options: OcrOptions,
}

#[derive(Debug, Deserialize)]
struct RenderReportArgs {
    template: String,
    #[serde(default)]
    variables: HashMap<String, Value>,
}

/// Invokes tools by name
pub struct ToolRegistry {
    gateway: Arc<GatewayClient>,
    ocr: Arc<OcrClient>,
}

impl ToolRegistry {
    pub fn new(gateway: Arc<GatewayClient>, ocr: Arc<OcrClient>) -> Self {
        Self { gateway, ocr }
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        ToolName::ALL.into_iter().map(ToolDescriptor::from).collect()
    }

    /// Invoke `name` with a JSON object of arguments
    #[instrument(skip(self, args))]
    pub async fn invoke(&self, name: &str, args: Value) -> AppResult<Value> {
        let tool: ToolName = name.parse()?;

        let result = self.dispatch(tool, args).await;
        let outcome = match &result {
            Ok(value) if value.get("error").is_some_and(is_error_value) => "error_envelope",
            Ok(_) => "success",
            Err(_) => "failure",
        };
        info!(tool = tool.as_str(), outcome, "Tool invoked");
        record_tool_invocation(tool.as_str(), outcome);

        result
    }

    async fn dispatch(&self, tool: ToolName, args: Value) -> AppResult<Value> {
        match tool {
            ToolName::AskDoctor => {
                let args: AskDoctorArgs = parse_args(args)?;
                let response =
                    ask_doctor(&self.gateway, &args.user_input, args.session_id.as_deref()).await?;
                Ok(serde_json::to_value(response)?)
            }
            ToolName::SkinDiseaseQuery => {
                let args: SkinDiseaseArgs = parse_args(args)?;
                let response = skin_disease_query(
                    &self.gateway,
                    &args.url,
                    &args.query,
                    args.session_id.as_deref(),
                    args.model,
                )
                .await?;
                raw_to_value(response)
            }
            ToolName::ConsultDrug => {
                let args: ConsultDrugArgs = parse_args(args)?;
                let response = consult_drug(
                    &self.gateway,
                    &args.query,
                    args.model,
                    args.session_id.as_deref(),
                )
                .await?;
                raw_to_value(response)
            }
            ToolName::RecognizeText => {
                let args: RecognizeTextArgs = parse_args(args)?;
                let result = self.ocr.recognize_text(&args.url, args.options).await?;
                Ok(serde_json::to_value(result)?)
            }
            ToolName::RenderReport => {
                let args: RenderReportArgs = parse_args(args)?;
                let variables = args
                    .variables
                    .into_iter()
                    .map(|(k, v)| (k, display_value(v)))
                    .collect();
                Ok(json!({ "html": render_html(&args.template, &variables) }))
            }
        }
    }
}

fn parse_args<T: DeserializeOwned>(args: Value) -> AppResult<T> {
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args).map_err(|e| AppError::BadRequest(format!("Invalid tool arguments: {}", e)))
}

/// Raw gateway text is passed through as JSON when it parses, else as a string
fn raw_to_value(response: ToolResponse<String>) -> AppResult<Value> {
    let value = match response {
        ToolResponse::Ok(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        ToolResponse::Error(envelope) => serde_json::to_value(envelope)?,
    };
    Ok(value)
}

fn display_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn is_error_value(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        _ => true,
    }
}
