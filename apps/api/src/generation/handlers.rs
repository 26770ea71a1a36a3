//! Axum route handlers for the Generation API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::config::Config;
use crate::errors::AppError;
use crate::generation::generator::{generate_application, GeneratedApplication};
use crate::generation::tone::Tone;
use crate::ingest::document::{extract, DocumentKind};
use crate::ingest::job_posting::JobPostingFetcher;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Upload form
// ────────────────────────────────────────────────────────────────────────────

/// Uploaded resume file, held in memory only.
#[derive(Debug)]
pub struct ResumeFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Multipart form fields of `POST /api/v1/applications`.
#[derive(Debug, Default)]
pub struct ApplicationForm {
    pub resume: Option<ResumeFile>,
    pub job_description: String,
    pub job_url: String,
    pub email_tone: String,
}

impl ApplicationForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ApplicationForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "resume" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?;
                    form.resume = Some(ResumeFile { filename, bytes });
                }
                "job_description" => form.job_description = field.text().await?,
                "job_url" => form.job_url = field.text().await?,
                "email_tone" => form.email_tone = field.text().await?,
                _ => {}
            }
        }

        Ok(form)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validation steps
// ────────────────────────────────────────────────────────────────────────────

/// Checks the uploaded file and returns its text.
pub fn extract_resume_text(config: &Config, resume: Option<&ResumeFile>) -> Result<String, AppError> {
    let resume = resume.ok_or_else(|| AppError::Validation("No file part".to_string()))?;

    if resume.filename.is_empty() {
        return Err(AppError::Validation("No selected file".to_string()));
    }

    // The supported document kinds are the allowed extensions.
    let kind = DocumentKind::from_filename(&resume.filename).ok_or_else(|| {
        AppError::Validation("Invalid file type. Please upload a PDF or DOCX file.".to_string())
    })?;

    if resume.bytes.len() > config.max_upload_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File too large. Please upload a file smaller than {}MB.",
            config.max_upload_bytes / (1024 * 1024)
        )));
    }

    let text = extract(&resume.bytes, Some(kind));
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "Could not extract text from resume. Please ensure it's a valid PDF or DOCX file."
                .to_string(),
        ));
    }

    Ok(text)
}

/// Pasted text wins over the URL; the URL is only fetched when no text was given.
pub async fn resolve_job_description(
    fetcher: &JobPostingFetcher,
    job_description: &str,
    job_url: &str,
) -> Result<String, AppError> {
    if !job_description.trim().is_empty() {
        return Ok(job_description.to_string());
    }

    if job_url.trim().is_empty() {
        return Err(AppError::Validation(
            "Please provide either a job description or a job URL.".to_string(),
        ));
    }

    let fetched = fetcher.fetch(job_url.trim()).await;
    if fetched.trim().is_empty() {
        return Err(AppError::Validation(
            "Could not extract job description from the provided URL. \
            Please paste the job description manually."
                .to_string(),
        ));
    }

    Ok(fetched)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/applications
///
/// Multipart upload: `resume` file, `job_description` or `job_url`, `email_tone`.
/// Returns the sanitized cover letter and companion email. Nothing is stored.
pub async fn handle_generate_application(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GeneratedApplication>, AppError> {
    let form = ApplicationForm::from_multipart(multipart).await?;

    let resume_text = extract_resume_text(&state.config, form.resume.as_ref())?;
    let job_description =
        resolve_job_description(&state.fetcher, &form.job_description, &form.job_url).await?;
    let tone = Tone::parse(&form.email_tone);

    let application = generate_application(
        state.llm.as_ref(),
        &state.config.model,
        &resume_text,
        &job_description,
        tone,
    )
    .await;

    info!(
        "Generated application: cover letter {} chars, email {} chars",
        application.cover_letter.len(),
        application.email.len()
    );

    Ok(Json(application))
}
