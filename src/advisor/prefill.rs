//! Website prefill: reads a business website and guesses the
//! business-basics answers from it.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use reqwest::Url;
use tracing::{info, warn};

use crate::error::PrefillError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

use super::analysis::OfferAnalysis;
use super::model::AdviceCategory;
use super::prompts::{advisor_system_prompt, website_analysis_prompt};

/// Elements whose content is never shown. One pattern per tag, since each
/// block must end at its own closing tag. `head` goes first so scripts
/// inside it cannot end it early.
static HIDDEN_BLOCKS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["head", "script", "style", "noscript", "svg"]
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b.*?</{tag}\s*>")).expect("valid regex"))
        .collect()
});
static COMMENTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Reduce an HTML document to its readable text.
pub fn html_to_text(html: &str) -> String {
    let text = COMMENTS.replace_all(html, " ").into_owned();
    let text = HIDDEN_BLOCKS
        .iter()
        .fold(text, |text, block| block.replace_all(&text, " ").into_owned());
    let text = TAGS.replace_all(&text, " ");
    // `&amp;` last, so "&amp;lt;" decodes once to "&lt;".
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Accept absolute http(s) URLs only.
pub fn parse_url(raw: &str) -> Result<Url, PrefillError> {
    let url = Url::parse(raw.trim()).map_err(|e| PrefillError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(PrefillError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Fetches a page and asks the model to describe the offer on it.
pub struct WebsitePrefill {
    client: reqwest::Client,
    llm: Arc<dyn LlmProvider>,
}

impl WebsitePrefill {
    pub fn new(llm: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("offer-builder/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });
        Self { client, llm }
    }

    /// Best-effort business info for `url`. Fetch and model failures are
    /// errors; an unparseable model answer comes back as the fallback record.
    pub async fn extract_business_info(&self, url: &str) -> Result<OfferAnalysis, PrefillError> {
        let parsed = parse_url(url)?;
        info!(url = %parsed, "Fetching website for prefill");

        let response = self
            .client
            .get(parsed.clone())
            .send()
            .await
            .map_err(|e| PrefillError::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PrefillError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(|e| PrefillError::FetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let text = html_to_text(&html);
        if text.is_empty() {
            return Err(PrefillError::EmptyPage {
                url: url.to_string(),
            });
        }

        let request = CompletionRequest::new(vec![
            ChatMessage::system(advisor_system_prompt(AdviceCategory::OfferAnalysis)),
            ChatMessage::user(website_analysis_prompt(parsed.as_str(), &text)),
        ])
        .with_temperature(0.0)
        .with_max_tokens(1024);

        let response = self.llm.complete(request).await?;
        let analysis = OfferAnalysis::parse(&response.content);
        info!(
            url = %parsed,
            industry = %analysis.industry,
            score = analysis.offer_score,
            "Website analysed"
        );
        Ok(analysis)
    }
}
