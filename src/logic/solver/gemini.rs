//! Gemini Solver Client
//!
//! HTTP client for the Gemini `generateContent` endpoint. One image in, one
//! [`SolveResult`] out. All failure modes (network, HTTP status, malformed
//! JSON, missing fields) collapse into `SolveResult::failure`; retry policy
//! belongs to the caller.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::{AnswerChoice, SolveResult, SolverError};
use crate::constants;
use crate::logic::capture::Frame;

/// Instruction prompt sent alongside every frame. Asks the model to detect a
/// multiple-choice question, normalize numeric options to letters, and emit
/// strict JSON.
const SOLVE_PROMPT: &str = r#"You are an expert exam solver.
Analyze the image provided. It contains a multiple choice question.
1. Identify the question and the choices.
2. Solve the problem accurately.
3. Return the correct option (A, B, C, D, or E). If the options are numbers (1, 2, 3, 4, 5), map them to A, B, C, D, E.
4. Provide a very short, one-sentence explanation.

Output strictly in JSON format:
{
  "found": boolean,
  "answer": "A" | "B" | "C" | "D" | "E",
  "explanation": "string"
}

If no question is visible, set "found" to false."#;

/// Gemini client configuration
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub api_base: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            api_base: constants::get_gemini_api_base(),
            model: constants::get_gemini_model(),
            timeout_seconds: constants::get_request_timeout(),
        }
    }
}

/// Solver seam: the scheduler only depends on this trait, so tests can
/// inject scripted solvers and the production client stays swappable.
#[async_trait]
pub trait Solver: Send + Sync {
    /// Solve the question visible in `frame`. Never fails outward; all
    /// errors are captured into [`SolveResult::error`].
    async fn solve(&self, frame: &Frame) -> SolveResult;
}

/// Builds a solver for a given credential. The scheduler reconstructs the
/// solver through this factory whenever the API key is replaced.
pub trait SolverFactory: Send + Sync {
    fn build(&self, api_key: &str) -> std::sync::Arc<dyn Solver>;
}

/// Factory producing real [`GeminiSolver`] instances.
#[derive(Debug, Clone, Default)]
pub struct GeminiSolverFactory {
    pub config: SolverConfig,
}

impl GeminiSolverFactory {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl SolverFactory for GeminiSolverFactory {
    fn build(&self, api_key: &str) -> std::sync::Arc<dyn Solver> {
        std::sync::Arc::new(GeminiSolver::new(api_key, self.config.clone()))
    }
}

/// Gemini API client. Stateless across invocations except for the held
/// credential.
pub struct GeminiSolver {
    api_key: String,
    config: SolverConfig,
    http_client: reqwest::Client,
}

// Request/Response types (Gemini generateContent wire format)

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// The JSON object the prompt asks the model to emit.
#[derive(Debug, Deserialize)]
struct RawSolveResponse {
    #[serde(default)]
    found: bool,
    answer: Option<String>,
    explanation: Option<String>,
}

impl GeminiSolver {
    /// Create a new solver holding `api_key` for the process lifetime.
    pub fn new(api_key: impl Into<String>, config: SolverConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key: api_key.into(),
            config,
            http_client,
        }
    }

    async fn request_solution(&self, frame: &Frame) -> Result<SolveResult, SolverError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        );

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart {
                        text: Some(SOLVE_PROMPT.to_string()),
                        inline_data: None,
                    },
                    RequestPart {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: frame.mime_type.clone(),
                            data: strip_data_uri(&frame.data).to_string(),
                        }),
                    },
                ],
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SolverError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SolverError::ServerError(response.status().as_u16()));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| SolverError::ParseError(e.to_string()))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or(SolverError::EmptyResponse)?;

        parse_solve_response(&text)
    }
}

#[async_trait]
impl Solver for GeminiSolver {
    async fn solve(&self, frame: &Frame) -> SolveResult {
        match self.request_solution(frame).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Solve request failed: {}", e);
                SolveResult::failure(e.to_string())
            }
        }
    }
}

/// Drop a `data:<mime>;base64,` prefix if present; webcam screenshots come
/// as data URIs, the API wants the bare payload.
fn strip_data_uri(data: &str) -> &str {
    match data.split_once(',') {
        Some((header, payload)) if header.starts_with("data:") => payload,
        _ => data,
    }
}

/// The model is not guaranteed to return bare JSON; tolerate Markdown
/// code-fence wrapping around the object.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse the model's textual reply into a [`SolveResult`], normalizing
/// numeric answer labels to the letter enum.
fn parse_solve_response(text: &str) -> Result<SolveResult, SolverError> {
    let cleaned = strip_code_fences(text);

    let raw: RawSolveResponse =
        serde_json::from_str(&cleaned).map_err(|e| SolverError::ParseError(e.to_string()))?;

    if !raw.found {
        return Ok(SolveResult::not_found());
    }

    let answer_token = raw
        .answer
        .ok_or_else(|| SolverError::InvalidAnswer(String::new()))?;
    let answer = AnswerChoice::parse(&answer_token)
        .ok_or_else(|| SolverError::InvalidAnswer(answer_token.clone()))?;

    Ok(SolveResult::solved(answer, raw.explanation.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json_response() {
        let result =
            parse_solve_response(r#"{"found": true, "answer": "B", "explanation": "x"}"#).unwrap();
        assert_eq!(result, SolveResult::solved(AnswerChoice::B, "x"));
    }

    #[test]
    fn parses_fenced_json_response() {
        let text = "```json\n{\"found\": true, \"answer\": \"D\", \"explanation\": \"because\"}\n```";
        let result = parse_solve_response(text).unwrap();
        assert_eq!(result, SolveResult::solved(AnswerChoice::D, "because"));
    }

    #[test]
    fn normalizes_numeric_answers() {
        let two = parse_solve_response(r#"{"found": true, "answer": "2", "explanation": "x"}"#)
            .unwrap();
        assert_eq!(two.answer, Some(AnswerChoice::B));

        let five = parse_solve_response(r#"{"found": true, "answer": "5", "explanation": "y"}"#)
            .unwrap();
        assert_eq!(five.answer, Some(AnswerChoice::E));
    }

    #[test]
    fn negative_detection_passes_through() {
        let result = parse_solve_response(r#"{"found": false}"#).unwrap();
        assert_eq!(result, SolveResult::not_found());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = parse_solve_response("I cannot see a question here.").unwrap_err();
        assert!(matches!(err, SolverError::ParseError(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn found_without_answer_is_rejected() {
        let err = parse_solve_response(r#"{"found": true, "explanation": "x"}"#).unwrap_err();
        assert!(matches!(err, SolverError::InvalidAnswer(_)));
    }

    #[test]
    fn found_with_unmappable_answer_is_rejected() {
        let err =
            parse_solve_response(r#"{"found": true, "answer": "G", "explanation": "x"}"#)
                .unwrap_err();
        assert!(matches!(err, SolverError::InvalidAnswer(_)));
    }

    #[test]
    fn data_uri_prefix_is_stripped() {
        assert_eq!(strip_data_uri("data:image/jpeg;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_uri("AAAA"), "AAAA");
        // A comma without a data: header is not a prefix
        assert_eq!(strip_data_uri("AAAA,BBBB"), "AAAA,BBBB");
    }
}
