//! Fetcher: out-of-scope collaborator interface (spec.md §1 "HTML fetching
//! and boilerplate stripping"). The spec fixes only the contract; this
//! default implementation is a best-effort plain-HTTP-plus-tag-stripping
//! heuristic, swappable via the trait for a real readability extractor.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct FetchedArticle {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("response had no extractable content")]
    Empty,
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedArticle, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .user_agent("echocast/1.0")
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedArticle, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| FetchError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }
        let html = response.text().await.map_err(|e| FetchError::Request(e.to_string()))?;
        let title = extract_title(&html).unwrap_or_else(|| url.to_string());
        let content = strip_tags(&html);
        if content.trim().is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(FetchedArticle { title, content })
    }
}

fn extract_title(html: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let start = lower.find("<title>")? + "<title>".len();
    let end = lower[start..].find("</title>")? + start;
    Some(html[start..end].trim().to_string())
}

/// Crude boilerplate stripper: drops `<script>`/`<style>` blocks wholesale,
/// then all remaining tags, collapsing whitespace. Good enough for the
/// narration pipeline, not a readability algorithm.
fn strip_tags(html: &str) -> String {
    let without_blocks = strip_block(&strip_block(html, "script"), "style");
    let mut out = String::with_capacity(without_blocks.len());
    let mut in_tag = false;
    for ch in without_blocks.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_block(html: &str, tag: &str) -> String {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    let mut rest_lower = lower.as_str();
    loop {
        match rest_lower.find(&open) {
            Some(start) => {
                out.push_str(&rest[..start]);
                match rest_lower[start..].find(&close) {
                    Some(end) => {
                        let skip_to = start + end + close.len();
                        rest = &rest[skip_to..];
                        rest_lower = &rest_lower[skip_to..];
                    }
                    None => return out,
                }
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
