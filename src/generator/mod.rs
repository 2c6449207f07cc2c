//! External Summary Generation
//!
//! The analysis engine can delegate its narrative summary to an external
//! text generator. Generation is opaque: the engine supplies a structured
//! digest of the period and receives free text back.
//!
//! ## Components
//!
//! - **SummaryGenerator**: The collaborator trait the engine calls
//! - **ChatCompletionsClient**: An OpenAI-compatible HTTP implementation
//! - **prompt**: Prompt construction for summaries and daily insights

mod client;
pub mod prompt;

pub use client::ChatCompletionsClient;

use crate::analysis::StructuredSummary;
use async_trait::async_trait;
use thiserror::Error;

/// A single completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction framing the response
    pub system: String,
    /// User prompt
    pub prompt: String,
    /// Token limit; the generator's default applies when `None`
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Produces free text from a prompt
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Run one completion
    async fn complete(&self, request: CompletionRequest) -> Result<String, GeneratorError>;

    /// Narrative summary of an analysed period
    async fn generate(&self, summary: &StructuredSummary) -> Result<String, GeneratorError> {
        let request = prompt::summary_request(summary)?;
        self.complete(request).await
    }
}

/// Errors that can occur when calling an external generator
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Generator API key is not configured")]
    MissingCredentials,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Generator unavailable")]
    Unavailable,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Failed to serialize request: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{EntryStatistics, StructuredSummary};
    use std::sync::Mutex;

    struct RecordingGenerator {
        requests: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl SummaryGenerator for RecordingGenerator {
        fn name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<String, GeneratorError> {
            self.requests.lock().unwrap().push(request);
            Ok("a summary".to_string())
        }
    }

    #[tokio::test]
    async fn test_generate_goes_through_complete() {
        let generator = RecordingGenerator {
            requests: Mutex::new(Vec::new()),
        };
        let summary = StructuredSummary::build(&EntryStatistics::default(), &[]);

        let text = generator.generate(&summary).await.unwrap();
        assert_eq!(text, "a summary");

        let requests = generator.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system, prompt::ANALYSIS_SYSTEM_PROMPT);
        assert!(requests[0].prompt.contains("\"total_days\": 0"));
    }

    #[test]
    fn test_error_display() {
        let err = GeneratorError::Api {
            status: 401,
            message: "bad key".to_string(),
        };
        assert_eq!(err.to_string(), "API error 401: bad key");
        assert_eq!(
            GeneratorError::MissingCredentials.to_string(),
            "Generator API key is not configured"
        );
    }
}
