//! Multi-turn AI doctor consultation
//!
//! The consultation service keeps the conversation on its side; callers
//! thread the returned `session_id` into the next turn until the scene
//! code turns terminal (202 = report issued).

use tracing::{debug, info};

use crate::{
    error::AppResult,
    gateway::{DialogueTurn, Envelope, GatewayClient, SceneStatus, ToolResponse},
    tools::from_dispatch,
};

/// Remote model backing the consultation
pub const CONSULTATION_MODEL: &str = "third-common-v3-consultationAssistant";

/// Send one patient utterance to the AI doctor.
///
/// Pass `None` as `session_id` on the first turn and the previously
/// returned id afterwards. A `scene` of 0 means the doctor expects another
/// answer; anything else means the consultation is over.
pub async fn ask_doctor(
    gateway: &GatewayClient,
    user_input: &str,
    session_id: Option<&str>,
) -> AppResult<ToolResponse<DialogueTurn>> {
    let envelope = Envelope::text(CONSULTATION_MODEL, session_id, user_input);
    from_dispatch(gateway.send_dialogue(&envelope).await)
}

/// Client-side view of one consultation
///
/// Holds the session id between turns. Asking after the consultation has
/// finished starts a new one.
#[derive(Debug, Default, Clone)]
pub struct ConsultationSession {
    session_id: Option<String>,
    last_status: Option<SceneStatus>,
    turns: usize,
}

impl ConsultationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a consultation from a known session id
    pub fn resume(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            last_status: Some(SceneStatus::Continue),
            turns: 0,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn is_finished(&self) -> bool {
        self.last_status == Some(SceneStatus::Terminal)
    }

    /// Ask the next question and record the returned session id
    ///
    /// Error envelopes leave the session untouched so the same turn can be
    /// retried.
    pub async fn ask(
        &mut self,
        gateway: &GatewayClient,
        user_input: &str,
    ) -> AppResult<ToolResponse<DialogueTurn>> {
        if self.is_finished() {
            debug!(session_id = ?self.session_id, "Previous consultation finished, starting new one");
            *self = Self::new();
        }

        let response = ask_doctor(gateway, user_input, self.session_id()).await?;
        if let ToolResponse::Ok(turn) = &response {
            self.record(turn);
        }
        Ok(response)
    }

    fn record(&mut self, turn: &DialogueTurn) {
        if !turn.session_id.is_empty() {
            self.session_id = Some(turn.session_id.clone());
        }
        self.last_status = Some(turn.status());
        self.turns += 1;

        if self.is_finished() {
            info!(session_id = ?self.session_id, turns = self.turns, scene = turn.scene, "Consultation finished");
        }
    }
}
