//! End-to-end run of the generation pipeline against a stubbed completion client.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use cover_letter_api::generation::generator::generate_application;
use cover_letter_api::generation::tone::Tone;
use cover_letter_api::llm_client::types::{ChatRequest, Role};
use cover_letter_api::llm_client::{ApiError, CompletionClient};

const RAW_COVER_LETTER: &str = "analysis: The candidate has Python backend experience. Let's draft a 280-word letter.
assistantfinal
Dear Hiring Manager,

I am excited to apply for the Backend Engineer position. With 5 years of Python backend experience, I build reliable services.


In my current role I designed APIs and data pipelines that match your requirements.

Thank you for your consideration. I look forward to discussing how I can contribute.

Sincerely,
[Your Name]
287";

const RAW_EMAIL: &str = "Here is your email:

Subject: Application for Backend Engineer

Dear Hiring Manager,

I am writing to apply for the Backend Engineer role. Please find my tailored cover letter attached.

Best regards,
[Your Name]";

/// Answers the cover letter request first, then the email request.
struct StubClient {
    requests: Mutex<Vec<ChatRequest>>,
}

#[async_trait]
impl CompletionClient for StubClient {
    async fn send(&self, request: &ChatRequest) -> Result<Value, ApiError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());
        let content = if requests.len() == 1 {
            RAW_COVER_LETTER
        } else {
            RAW_EMAIL
        };
        Ok(json!({"choices": [{"message": {"role": "assistant", "content": content}}]}))
    }
}

#[tokio::test]
async fn test_resume_and_job_description_produce_letter_and_email() {
    let client = StubClient {
        requests: Mutex::new(Vec::new()),
    };

    let application = generate_application(
        &client,
        "openai/gpt-oss-20b:free",
        "5 years Python backend experience",
        "Seeking backend engineer with Python",
        Tone::Formal,
    )
    .await;

    let letter = &application.cover_letter;
    assert!(
        letter.starts_with("Dear Hiring Manager,"),
        "cover letter was: {letter:?}"
    );
    assert!(!letter.contains("analysis"));
    assert!(!letter.contains("Let's"));
    assert!(!letter.contains("assistantfinal"));
    assert!(!letter.contains("\n\n\n"));
    assert!(letter.contains("\n\nThank you for your consideration."));
    assert!(letter.ends_with("Sincerely,\n[Your Name]"));

    let email = &application.email;
    assert!(email.starts_with("Subject: Application for Backend Engineer"));
    assert!(email.split_whitespace().count() < 150);
    assert!(email.contains("cover letter attached"));
    assert!(!email.contains("Here is your email"));
    assert!(!email.contains("\n\n"));

    let requests = client.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].messages[0].role, Role::System);
    assert!(requests[0].messages[1]
        .content
        .contains("5 years Python backend experience"));
    assert!(requests[1].messages[1]
        .content
        .contains(Tone::Formal.instruction()));
    assert!(requests[1].messages[1]
        .content
        .contains("Dear Hiring Manager,\n\nI am excited to apply"));
}
