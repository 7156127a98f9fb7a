//! Solver result types shared between the Gemini client and the scheduler.

use serde::{Deserialize, Serialize};

/// The closed set of multiple-choice options.
///
/// Numeric option labels (1-5) are normalized to letters by the inference
/// layer via [`AnswerChoice::parse`]; the scheduler only ever sees letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerChoice {
    A,
    B,
    C,
    D,
    E,
}

impl AnswerChoice {
    /// Parse a raw answer token from the model. Accepts letters A-E in any
    /// case and numeric labels 1-5 (1->A .. 5->E).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" | "1" => Some(Self::A),
            "B" | "2" => Some(Self::B),
            "C" | "3" => Some(Self::C),
            "D" | "4" => Some(Self::D),
            "E" | "5" => Some(Self::E),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        }
    }
}

impl std::fmt::Display for AnswerChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one solve attempt.
///
/// Invariant: `found == true` implies `answer` is present. A result with
/// `found == false` (negative detection or failure) never replaces a
/// previously published positive result; the scheduler enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolveResult {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<AnswerChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SolveResult {
    /// A question was detected and solved.
    pub fn solved(answer: AnswerChoice, explanation: impl Into<String>) -> Self {
        Self {
            found: true,
            answer: Some(answer),
            explanation: Some(explanation.into()),
            error: None,
        }
    }

    /// No question visible in the frame.
    pub fn not_found() -> Self {
        Self {
            found: false,
            answer: None,
            explanation: None,
            error: None,
        }
    }

    /// The attempt failed (network, parse, malformed structure).
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            found: false,
            answer: None,
            explanation: None,
            error: Some(message.into()),
        }
    }
}

/// Solver errors, internal to the inference layer. `GeminiSolver::solve`
/// collapses all of these into `SolveResult::failure`.
#[derive(Debug, Clone)]
pub enum SolverError {
    NetworkError(String),
    ServerError(u16),
    EmptyResponse,
    ParseError(String),
    InvalidAnswer(String),
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError(e) => write!(f, "Network error: {}", e),
            Self::ServerError(code) => write!(f, "Server error: {}", code),
            Self::EmptyResponse => write!(f, "Empty response from model"),
            Self::ParseError(e) => write!(f, "Parse error: {}", e),
            Self::InvalidAnswer(raw) => write!(f, "Unrecognized answer option: {:?}", raw),
        }
    }
}

impl std::error::Error for SolverError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_answers_parse_case_insensitively() {
        assert_eq!(AnswerChoice::parse("A"), Some(AnswerChoice::A));
        assert_eq!(AnswerChoice::parse("c"), Some(AnswerChoice::C));
        assert_eq!(AnswerChoice::parse(" e "), Some(AnswerChoice::E));
    }

    #[test]
    fn numeric_answers_map_to_letters() {
        assert_eq!(AnswerChoice::parse("1"), Some(AnswerChoice::A));
        assert_eq!(AnswerChoice::parse("2"), Some(AnswerChoice::B));
        assert_eq!(AnswerChoice::parse("5"), Some(AnswerChoice::E));
    }

    #[test]
    fn unknown_answers_rejected() {
        assert_eq!(AnswerChoice::parse("F"), None);
        assert_eq!(AnswerChoice::parse("6"), None);
        assert_eq!(AnswerChoice::parse(""), None);
    }

    #[test]
    fn failure_result_carries_message() {
        let result = SolveResult::failure("boom");
        assert!(!result.found);
        assert_eq!(result.answer, None);
        assert_eq!(result.error.as_deref(), Some("boom"));
    }

    #[test]
    fn solved_result_serializes_without_null_fields() {
        let result = SolveResult::solved(AnswerChoice::B, "x");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["found"], true);
        assert_eq!(json["answer"], "B");
        assert_eq!(json["explanation"], "x");
        assert!(json.get("error").is_none());
    }
}
