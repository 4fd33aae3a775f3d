//! Gateway data models
//!
//! Request envelopes sent to the dialogue/diagnosis gateway and the
//! response shapes handed back to tool callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::DispatchError;

/// Role used for every message the tools send
pub const USER_ROLE: &str = "user";

/// Scene code meaning the remote dialogue expects another turn
pub const SCENE_CONTINUE: i64 = 0;

/// Scene code the consultation service uses when it issues its report
pub const SCENE_REPORT: i64 = 202;

/// Request body for the gateway
///
/// Field order is part of the wire format: the body is digested exactly
/// as serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub model: String,
    pub stream: bool,
    /// Empty on the first turn, then the value the gateway returned
    pub session_id: String,
    pub messages: Vec<Message>,
}

impl Envelope {
    /// Build a non-streamed envelope with a single user message
    pub fn new(model: impl Into<String>, session_id: Option<&str>, content: Vec<ContentPart>) -> Self {
        Self {
            model: model.into(),
            stream: false,
            session_id: session_id.unwrap_or_default().to_string(),
            messages: vec![Message {
                role: USER_ROLE.to_string(),
                content,
            }],
        }
    }

    /// Build an envelope carrying one text part
    pub fn text(model: impl Into<String>, session_id: Option<&str>, body: impl Into<String>) -> Self {
        Self::new(model, session_id, vec![ContentPart::text(body)])
    }

    /// Request a streamed response
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

/// One message in the envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: Vec<ContentPart>,
}

/// A piece of message content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    Text { body: String },
    Image { url: String },
}

impl ContentPart {
    pub fn text(body: impl Into<String>) -> Self {
        ContentPart::Text { body: body.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        ContentPart::Image { url: url.into() }
    }
}

/// Raw dialogue response as returned by the gateway
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayResponse {
    #[serde(default)]
    pub result: Vec<GatewayResult>,
}

/// One entry of `result`
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayResult {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub messages: Vec<ResultMessage>,
}

/// One message inside a result entry
#[derive(Debug, Clone, Deserialize)]
pub struct ResultMessage {
    pub scene: i64,
    #[serde(default)]
    pub content: Vec<Value>,
}

/// Whether a dialogue continues after a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneStatus {
    Continue,
    Terminal,
}

impl SceneStatus {
    pub fn from_scene(scene: i64) -> Self {
        if scene == SCENE_CONTINUE {
            SceneStatus::Continue
        } else {
            SceneStatus::Terminal
        }
    }
}

/// One turn of a multi-turn dialogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub scene: i64,
    pub model_response: Vec<Value>,
    pub session_id: String,
}

impl DialogueTurn {
    /// Extract the first result's first message from a gateway response body
    pub fn from_response_body(body: &str) -> Result<Self, DispatchError> {
        let response: GatewayResponse =
            serde_json::from_str(body).map_err(DispatchError::Decode)?;

        let result = response
            .result
            .into_iter()
            .next()
            .ok_or(DispatchError::MissingField("result[0]"))?;
        let message = result
            .messages
            .into_iter()
            .next()
            .ok_or(DispatchError::MissingField("result[0].messages[0]"))?;

        Ok(Self {
            scene: message.scene,
            model_response: message.content,
            session_id: result.session_id,
        })
    }

    pub fn status(&self) -> SceneStatus {
        SceneStatus::from_scene(self.scene)
    }

    pub fn is_terminal(&self) -> bool {
        self.status() == SceneStatus::Terminal
    }
}

/// `{"error": "..."}` returned in place of a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl From<DispatchError> for ErrorEnvelope {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Transport(e) => Self::new(format!("API request failed: {}", e)),
            DispatchError::EmptyStream => Self::new("No response generated."),
            other => Self::new(format!("An unexpected error occurred: {}", other)),
        }
    }
}

/// Result of a tool call: the success shape or an error envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolResponse<T> {
    Ok(T),
    Error(ErrorEnvelope),
}

impl<T> ToolResponse<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolResponse::Error(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            ToolResponse::Ok(value) => Some(value),
            ToolResponse::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ToolResponse::Ok(_) => None,
            ToolResponse::Error(envelope) => Some(&envelope.error),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ToolResponse<U> {
        match self {
            ToolResponse::Ok(value) => ToolResponse::Ok(f(value)),
            ToolResponse::Error(envelope) => ToolResponse::Error(envelope),
        }
    }
}
