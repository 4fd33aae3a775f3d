//! OCR for medicine packaging
//!
//! Uses the OCR service's client-credentials flow: a token is fetched for
//! each recognition and passed as a query parameter.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    routes::metrics::record_gateway_call,
};

const TOKEN_PATH: &str = "/oauth/2.0/token";
const RECOGNIZE_PATH: &str = "/rest/2.0/ocr/v1/accurate_basic";

/// Text recognized in an image, or why it was not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrResult {
    pub text: String,
    /// Empty on success
    pub error: String,
}

impl OcrResult {
    fn failed(error: String) -> Self {
        Self {
            text: String::new(),
            error,
        }
    }
}

/// Optional recognition flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct OcrOptions {
    #[serde(default)]
    pub detect_direction: bool,
    #[serde(default)]
    pub paragraph: bool,
    #[serde(default)]
    pub probability: bool,
}

#[derive(Debug, Error)]
enum OcrError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid JSON in OCR response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("access token request failed: {0}")]
    Token(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    words_result_num: u64,
    #[serde(default)]
    words_result: Vec<WordsResult>,
    error_msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WordsResult {
    words: String,
}

/// OCR service client
pub struct OcrClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    secret_key: Option<String>,
}

impl OcrClient {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.ocr_api_url.trim_end_matches('/').to_string(),
            api_key: config.ocr_api_key.clone(),
            secret_key: config.ocr_secret_key.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.secret_key.is_some()
    }

    /// Recognize the text in the image at `url`.
    ///
    /// Missing client credentials are a configuration error; every other
    /// failure is reported in `OcrResult::error`.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn recognize_text(&self, url: &str, options: OcrOptions) -> AppResult<OcrResult> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration("Environment variable 'API_KEY' is not set".to_string())
        })?;
        let secret_key = self.secret_key.as_deref().ok_or_else(|| {
            AppError::Configuration("Environment variable 'SECRET_KEY' is not set".to_string())
        })?;

        let start = std::time::Instant::now();
        let result = match self.try_recognize(api_key, secret_key, url, options).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "OCR request failed");
                OcrResult::failed(format!("OCR exception: {}", e))
            }
        };

        let outcome = if result.error.is_empty() { "success" } else { "error" };
        record_gateway_call("ocr-accurate-basic", outcome, start.elapsed().as_secs_f64());
        Ok(result)
    }

    async fn try_recognize(
        &self,
        api_key: &str,
        secret_key: &str,
        url: &str,
        options: OcrOptions,
    ) -> Result<OcrResult, OcrError> {
        let token = self.access_token(api_key, secret_key).await?;

        let form = [
            ("url", url),
            ("detect_direction", flag(options.detect_direction)),
            ("paragraph", flag(options.paragraph)),
            ("probability", flag(options.probability)),
        ];

        let body = self
            .client
            .post(format!("{}{}", self.base_url, RECOGNIZE_PATH))
            .query(&[("access_token", token.as_str())])
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await?
            .text()
            .await?;
        debug!(body_len = body.len(), "OCR response received");

        let response: RecognizeResponse = serde_json::from_str(&body)?;
        if response.words_result_num == 0 {
            let reason = response
                .error_msg
                .unwrap_or_else(|| "no text detected".to_string());
            return Ok(OcrResult::failed(format!("OCR recognition failed: {}", reason)));
        }

        let text = response
            .words_result
            .into_iter()
            .map(|w| w.words)
            .collect::<Vec<_>>()
            .join("\n");

        Ok(OcrResult {
            text,
            error: String::new(),
        })
    }

    async fn access_token(&self, api_key: &str, secret_key: &str) -> Result<String, OcrError> {
        let body = self
            .client
            .post(format!("{}{}", self.base_url, TOKEN_PATH))
            .query(&[
                ("grant_type", "client_credentials"),
                ("client_id", api_key),
                ("client_secret", secret_key),
            ])
            .send()
            .await?
            .text()
            .await?;

        let response: TokenResponse = serde_json::from_str(&body)?;
        match response.access_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(OcrError::Token(
                response
                    .error_description
                    .or(response.error)
                    .unwrap_or_else(|| "no access_token in response".to_string()),
            )),
        }
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
