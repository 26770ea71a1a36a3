//! Application generation pipeline.
//!
//! Flow: normalize inputs → cover letter request → completion (with retry) →
//!       sanitize → email request built from the letter → completion → sanitize.
//!
//! Both passes always produce a string. Failures are rendered as readable
//! error text so the caller can show them next to whatever did succeed.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::generation::builder::{cover_letter_request, email_request};
use crate::generation::sanitizer::{sanitize_cover_letter, sanitize_email};
use crate::generation::tone::Tone;
use crate::ingest::normalize::NormalizedText;
use crate::llm_client::types::{ChatCompletion, ChatRequest};
use crate::llm_client::{ApiError, CompletionClient};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("completion response was empty")]
    EmptyResponse,

    #[error("completion response did not contain choices[0].message.content")]
    ResponseShape,
}

/// Either the raw completion text or why there is none.
pub type GenerationResult = Result<String, GenerationError>;

/// The two deliverables handed back to the web layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedApplication {
    pub cover_letter: String,
    pub email: String,
}

/// Sends `request` and pulls the completion text out of the response.
pub async fn complete(client: &dyn CompletionClient, request: &ChatRequest) -> GenerationResult {
    let body = client.send(request).await?;
    if is_empty_body(&body) {
        return Err(GenerationError::EmptyResponse);
    }
    ChatCompletion::first_content(body)
        .map(|content| content.trim().to_string())
        .ok_or(GenerationError::ResponseShape)
}

/// `null`, `false`, `0`, `""`, `[]` and `{}` carry nothing to parse.
fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Generates a sanitized cover letter, or a readable error message.
pub async fn generate_cover_letter(
    client: &dyn CompletionClient,
    model: &str,
    resume_text: &str,
    job_description: &str,
) -> String {
    let request = cover_letter_request(model, resume_text, job_description);

    match complete(client, &request).await {
        Ok(raw) => sanitize_cover_letter(&raw),
        Err(GenerationError::Api(e)) => {
            warn!("Error generating cover letter: {e}");
            format!("Error generating cover letter: {e}")
        }
        Err(GenerationError::EmptyResponse) => {
            warn!("Error generating cover letter: empty response");
            "Error generating cover letter. Please try again.".to_string()
        }
        Err(GenerationError::ResponseShape) => {
            warn!("Error processing cover letter response: unexpected shape");
            "Error processing cover letter. Please try again.".to_string()
        }
    }
}

/// Generates a sanitized companion email for `cover_letter`, or a readable error message.
pub async fn generate_email(
    client: &dyn CompletionClient,
    model: &str,
    cover_letter: &str,
    tone: Tone,
) -> String {
    let request = email_request(model, cover_letter, tone);

    match complete(client, &request).await {
        Ok(raw) => sanitize_email(&raw),
        Err(GenerationError::Api(e)) => {
            warn!("Error generating email: {e}");
            format!("Error generating email: {e}")
        }
        Err(GenerationError::EmptyResponse) => {
            warn!("Error generating email: empty response");
            "Error generating email. Please try again.".to_string()
        }
        Err(GenerationError::ResponseShape) => {
            warn!("Error processing email response: unexpected shape");
            "Error processing email. Please try again.".to_string()
        }
    }
}

/// Runs both passes in order. The email pass always runs, even when the
/// cover letter pass produced an error message.
pub async fn generate_application(
    client: &dyn CompletionClient,
    model: &str,
    resume_text: &str,
    job_description: &str,
    tone: Tone,
) -> GeneratedApplication {
    let resume = NormalizedText::new(resume_text);
    let job = NormalizedText::new(job_description);

    info!(
        "Generating cover letter (resume: {} chars, job description: {} chars)",
        resume.as_str().len(),
        job.as_str().len()
    );
    let cover_letter = generate_cover_letter(client, model, resume.as_str(), job.as_str()).await;

    info!("Generating email with tone={tone}");
    let email = generate_email(client, model, &cover_letter, tone).await;

    GeneratedApplication {
        cover_letter,
        email,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::llm_client::types::Role;

    /// Replays canned outcomes and records every request it receives.
    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<serde_json::Value, ApiError>>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Result<serde_json::Value, ApiError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn send(&self, request: &ChatRequest) -> Result<serde_json::Value, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected completion call")
        }
    }

    fn reply(content: &str) -> Result<serde_json::Value, ApiError> {
        Ok(json!({"choices": [{"message": {"role": "assistant", "content": content}}]}))
    }

    #[tokio::test]
    async fn test_cover_letter_is_sanitized() {
        let client = ScriptedClient::new(vec![reply(
            "  Here is your cover letter:\nDear Hiring Manager,\n\nI am excited to apply.\nassistantfinal  ",
        )]);

        let letter = generate_cover_letter(&client, "m", "resume", "job").await;
        assert_eq!(letter, "Dear Hiring Manager,\n\nI am excited to apply.");
    }

    #[tokio::test]
    async fn test_cover_letter_api_error_is_rendered() {
        let client = ScriptedClient::new(vec![Err(ApiError::RateLimited)]);

        let letter = generate_cover_letter(&client, "m", "resume", "job").await;
        assert_eq!(
            letter,
            "Error generating cover letter: Rate limit exceeded. Please try again in a few minutes."
        );
    }

    #[tokio::test]
    async fn test_response_shape_failure_uses_fixed_message() {
        let client = ScriptedClient::new(vec![
            Ok(json!({"error": "no choices"})),
            Ok(json!({"choices": []})),
        ]);

        let letter = generate_cover_letter(&client, "m", "resume", "job").await;
        assert_eq!(letter, "Error processing cover letter. Please try again.");

        let email = generate_email(&client, "m", "Dear Hiring Manager,", Tone::Formal).await;
        assert_eq!(email, "Error processing email. Please try again.");
    }

    #[tokio::test]
    async fn test_empty_body_asks_for_a_retry() {
        let client = ScriptedClient::new(vec![Ok(json!({})), Ok(json!(null)), Ok(json!([]))]);

        let letter = generate_cover_letter(&client, "m", "resume", "job").await;
        assert_eq!(letter, "Error generating cover letter. Please try again.");

        let letter = generate_cover_letter(&client, "m", "resume", "job").await;
        assert_eq!(letter, "Error generating cover letter. Please try again.");

        let email = generate_email(&client, "m", "Dear Hiring Manager,", Tone::Formal).await;
        assert_eq!(email, "Error generating email. Please try again.");
    }

    #[test]
    fn test_is_empty_body() {
        assert!(is_empty_body(&json!(null)));
        assert!(is_empty_body(&json!(false)));
        assert!(is_empty_body(&json!(0)));
        assert!(is_empty_body(&json!("")));
        assert!(!is_empty_body(&json!({"choices": []})));
        assert!(!is_empty_body(&json!("text")));
    }

    #[tokio::test]
    async fn test_email_error_includes_attempt_count() {
        let client = ScriptedClient::new(vec![Err(ApiError::RequestFailed {
            attempts: 3,
            message: "HTTP 500 Internal Server Error: boom".to_string(),
        })]);

        let email = generate_email(&client, "m", "Dear Hiring Manager,", Tone::Formal).await;
        assert_eq!(
            email,
            "Error generating email: API request failed after 3 attempts: HTTP 500 Internal Server Error: boom"
        );
    }

    #[tokio::test]
    async fn test_pipeline_normalizes_inputs_and_chains_passes() {
        let client = ScriptedClient::new(vec![
            reply("Dear Hiring Manager,\n\nI bring five years of Python.\n\nSincerely,\n[Your Name]"),
            reply("Subject: Application\n\nHello,\nMy cover letter is attached.\nBest regards"),
        ]);

        let application = generate_application(
            &client,
            "test-model",
            "  5 years\n\nPython   backend experience ",
            "Seeking backend\tengineer with Python",
            Tone::ShortDirect,
        )
        .await;

        assert!(application.cover_letter.starts_with("Dear Hiring Manager,"));
        assert_eq!(
            application.email,
            "Subject: Application\nHello,\nMy cover letter is attached.\nBest regards"
        );

        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.model == "test-model"));

        let letter_prompt = &requests[0].messages[1];
        assert_eq!(letter_prompt.role, Role::User);
        assert!(letter_prompt
            .content
            .contains("Resume:\n5 years Python backend experience\n"));
        assert!(letter_prompt
            .content
            .contains("Job Description:\nSeeking backend engineer with Python\n"));

        let email_prompt = &requests[1].messages[1].content;
        assert!(email_prompt.starts_with(Tone::ShortDirect.instruction()));
        assert!(email_prompt.contains("Dear Hiring Manager,\n\nI bring five years of Python."));
    }

    #[tokio::test]
    async fn test_email_pass_runs_after_cover_letter_failure() {
        let client = ScriptedClient::new(vec![
            Err(ApiError::RateLimited),
            reply("Hello,\nCover letter attached.\nThanks"),
        ]);

        let application =
            generate_application(&client, "m", "resume", "job", Tone::Formal).await;

        assert!(application.cover_letter.starts_with("Error generating cover letter"));
        assert_eq!(application.email, "Hello,\nCover letter attached.\nThanks");
        assert!(client.requests()[1].messages[1]
            .content
            .contains("Error generating cover letter"));
    }
}
