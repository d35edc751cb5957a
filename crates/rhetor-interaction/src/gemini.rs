//! GeminiOpponent - direct REST API opponent for Gemini.
//!
//! Calls the Gemini `generateContent` REST API and asks the model to answer
//! as a debate opponent in a small JSON envelope (`aiOpponentReply` plus a
//! 0-100 `pointsAwarded` rating). A reply that is not valid JSON degrades
//! to the raw text with no score hint.

use crate::agent::{AgentError, OpponentAgent, OpponentReply, ReplyRequest};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Opponent implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiOpponent {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiOpponent {
    /// Creates a new opponent with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Loads configuration from the `GEMINI_API_KEY` environment variable.
    ///
    /// Model name defaults to `gemini-2.5-flash`; override with
    /// `GEMINI_MODEL_NAME`.
    pub fn try_from_env() -> Result<Self, AgentError> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
            AgentError::ExecutionFailed("GEMINI_API_KEY not found in environment".into())
        })?;
        let model = env::var("GEMINI_MODEL_NAME").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.into());
        Ok(Self::new(api_key, model))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, AgentError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        );
        tracing::debug!(model = %self.model, "requesting Gemini counter-argument");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| AgentError::Process {
                status_code: None,
                message: format!("Gemini API request failed: {err}"),
                is_retryable: err.is_connect() || err.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| AgentError::Parse(format!("Failed to parse Gemini response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl OpponentAgent for GeminiOpponent {
    async fn counter_argument(&self, request: &ReplyRequest) -> Result<OpponentReply, AgentError> {
        let prompt = build_prompt(request);
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt }],
            }],
        };
        let text = self.send_request(&body).await?;
        Ok(parse_reply(&text))
    }
}

fn build_prompt(request: &ReplyRequest) -> String {
    format!(
        "You are an expert AI debate opponent. The debate topic is: \"{motion}\".\n\
         This is round {round} of {max_rounds}.\n\
         The exchange so far:\n{transcript}\n\
         The user's latest argument: \"{latest}\"\n\
         Counter-arguments you may draw on:\n{arguments}\n\
         Reply with a strong, reasoned counter-argument, and suggest a points value (0-100) \
         for the user's performance.\n\
         Respond in JSON: {{ \"aiOpponentReply\": \"...\", \"pointsAwarded\": ... }}",
        motion = request.motion,
        round = request.round,
        max_rounds = request.max_rounds,
        transcript = request.transcript,
        latest = request.latest_turn,
        arguments = request
            .opposing_arguments
            .iter()
            .map(|a| format!("- {a}"))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

/// Decodes the model's JSON envelope, degrading to the raw text when the
/// model ignored the format instruction.
fn parse_reply(text: &str) -> OpponentReply {
    let stripped = strip_code_fence(text);
    match serde_json::from_str::<ReplyEnvelope>(stripped) {
        Ok(envelope) => OpponentReply {
            reply_text: envelope.ai_opponent_reply,
            score_hint: envelope.points_awarded.map(|p| p.clamp(0.0, 100.0) as u32),
        },
        Err(_) => OpponentReply {
            reply_text: text.trim().to_string(),
            score_hint: None,
        },
    }
}

/// Models often wrap JSON in a markdown fence; unwrap it before parsing.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyEnvelope {
    ai_opponent_reply: String,
    points_awarded: Option<f64>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, AgentError> {
    response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| {
            AgentError::Parse("Gemini API returned no text in the response candidates".into())
        })
}

fn map_http_error(status: StatusCode, body: String) -> AgentError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    AgentError::Process {
        status_code: Some(status.as_u16()),
        message,
        is_retryable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply_json_envelope() {
        let reply = parse_reply(r#"{ "aiOpponentReply": "A counter.", "pointsAwarded": 72 }"#);
        assert_eq!(reply.reply_text, "A counter.");
        assert_eq!(reply.score_hint, Some(72));
    }

    #[test]
    fn test_parse_reply_clamps_score() {
        let reply = parse_reply(r#"{ "aiOpponentReply": "A counter.", "pointsAwarded": 250 }"#);
        assert_eq!(reply.score_hint, Some(100));
    }

    #[test]
    fn test_parse_reply_unwraps_code_fence() {
        let fenced = "```json\n{ \"aiOpponentReply\": \"Fenced.\", \"pointsAwarded\": 10 }\n```";
        let reply = parse_reply(fenced);
        assert_eq!(reply.reply_text, "Fenced.");
        assert_eq!(reply.score_hint, Some(10));
    }

    #[test]
    fn test_parse_reply_falls_back_to_raw_text() {
        let reply = parse_reply("Sorry, I couldn't format that as JSON.");
        assert_eq!(reply.reply_text, "Sorry, I couldn't format that as JSON.");
        assert_eq!(reply.score_hint, None);
    }

    #[test]
    fn test_map_http_error_classifies_retryable() {
        let err = map_http_error(StatusCode::SERVICE_UNAVAILABLE, "{}".to_string());
        match err {
            AgentError::Process { is_retryable, status_code, .. } => {
                assert!(is_retryable);
                assert_eq!(status_code, Some(503));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = map_http_error(StatusCode::BAD_REQUEST, "{}".to_string());
        match err {
            AgentError::Process { is_retryable, .. } => assert!(!is_retryable),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_build_prompt_includes_context() {
        let request = ReplyRequest {
            transcript: "User: hello".to_string(),
            latest_turn: "hello".to_string(),
            round: 2,
            max_rounds: 4,
            motion: "This house believes in prompts".to_string(),
            opposing_arguments: vec!["A point".to_string()],
        };
        let prompt = build_prompt(&request);
        assert!(prompt.contains("This house believes in prompts"));
        assert!(prompt.contains("round 2 of 4"));
        assert!(prompt.contains("- A point"));
        assert!(prompt.contains("aiOpponentReply"));
    }
}
