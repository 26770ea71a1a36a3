//! Job posting fetcher. Pulls the description text out of a job board page.
//!
//! Best-effort only: selectors target the common LinkedIn containers, with a
//! paragraph fallback for everything else. Any failure yields an empty string.

use std::time::Duration;

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Job description containers, most specific first.
const DESCRIPTION_SELECTORS: &[&str] = &[
    "div.show-more-less-html__markup",
    ".jobs-description-content__text",
    ".jobs-description__content",
    ".description__text",
];

#[derive(Clone)]
pub struct JobPostingFetcher {
    client: Client,
}

impl JobPostingFetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url` and returns the job description text, or "" on any failure.
    pub async fn fetch(&self, url: &str) -> String {
        match self.fetch_html(url).await {
            Ok(html) => extract_job_description(&html),
            Err(e) => {
                warn!("Error extracting job description from URL {url}: {e}");
                String::new()
            }
        }
    }

    async fn fetch_html(&self, url: &str) -> Result<String, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        response.text().await
    }
}

/// Picks the job description out of a page.
///
/// Returns the text of the first element matching [`DESCRIPTION_SELECTORS`];
/// otherwise every `<p>` joined by newlines; otherwise "".
pub fn extract_job_description(html: &str) -> String {
    let document = Html::parse_document(html);

    for selector_str in DESCRIPTION_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            debug!("Job description matched selector {selector_str}");
            return stripped_text(&element);
        }
    }

    let Ok(paragraph) = Selector::parse("p") else {
        return String::new();
    };
    document
        .select(&paragraph)
        .map(|p| stripped_text(&p))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trims each text node, drops the empty ones and glues the rest together.
fn stripped_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}
