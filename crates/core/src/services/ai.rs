//! Text-generation pass-through.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use quill_common::{AppError, AppResult, config::AiConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use validator::Validate;

/// Token budget for the tag suggestion call.
const TAGS_MAX_TOKENS: u32 = 100;

/// Token budget for the meta suggestion call.
const META_MAX_TOKENS: u32 = 300;

/// Black-box prose generator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt` using at most `max_tokens` tokens.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> AppResult<String>;
}

/// Chat-completions client for `OpenAI`-compatible APIs.
pub struct OpenAiGenerator {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiGenerator {
    /// Build a client from configuration.
    pub fn from_config(config: &AiConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> AppResult<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| AppError::Upstream("AI API key not configured".to_string()))?;

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "max_tokens": max_tokens,
        });

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("AI request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("AI API error: {status} - {body}")));
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessage,
        }

        #[derive(Deserialize)]
        struct ChatMessage {
            content: String,
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse AI response: {e}")))?;

        chat.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::Upstream("AI returned no choices".to_string()))
    }
}

/// Input for full-post generation.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateContentInput {
    #[validate(length(min = 1))]
    pub title: String,

    #[validate(length(min = 1))]
    pub description: String,

    /// professional, casual, technical, friendly
    pub tone: Option<String>,

    /// short, medium, long
    pub length: Option<String>,
}

/// Generated post body and suggested tags.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedContent {
    pub content: String,
    pub tags: Vec<String>,
}

/// Input for meta suggestion.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateMetaInput {
    #[validate(length(min = 1))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,
}

/// Suggested SEO fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMeta {
    pub meta_title: String,
    pub meta_description: String,
    pub tags: Vec<String>,
}

/// Word range for a requested length; unknown lengths read as medium.
#[must_use]
pub fn word_range(length: Option<&str>) -> &'static str {
    match length {
        Some("short") => "500-800 words",
        Some("long") => "1500-2500 words",
        _ => "800-1500 words",
    }
}

/// Split a comma-separated tag list, dropping blanks.
#[must_use]
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Parse a `Meta Title:` / `Meta Description:` / `Tags:` response.
#[must_use]
pub fn parse_meta(response: &str) -> GeneratedMeta {
    let mut meta = GeneratedMeta::default();

    for line in response.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix("Meta Title:") {
            meta.meta_title = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("Meta Description:") {
            meta.meta_description = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("Tags:") {
            let rest = rest.trim().trim_start_matches('[').trim_end_matches(']');
            meta.tags = split_tags(rest);
        }
    }

    meta
}

/// AI helper service.
#[derive(Clone)]
pub struct AiService {
    generator: Arc<dyn TextGenerator>,
    max_tokens: u32,
}

impl AiService {
    /// Create a new AI service.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, max_tokens: u32) -> Self {
        Self {
            generator,
            max_tokens,
        }
    }

    /// Write a post body, then suggest tags for it.
    pub async fn generate_content(&self, input: GenerateContentInput) -> AppResult<GeneratedContent> {
        input.validate()?;

        let tone = input
            .tone
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("professional");
        let words = word_range(input.length.as_deref());

        let prompt = format!(
            "Write a comprehensive blog post with the following details:\n\n\
             Title: {title}\n\
             Description: {description}\n\
             Tone: {tone}\n\
             Length: {words}\n\n\
             Please write a well-structured blog post that:\n\
             1. Has an engaging introduction\n\
             2. Is organized with clear headings and subheadings\n\
             3. Includes practical examples or insights\n\
             4. Has a strong conclusion\n\
             5. Uses a {tone} tone throughout\n\
             6. Is approximately {words} in length\n\n\
             Format the response as a complete blog post in markdown format.",
            title = input.title,
            description = input.description,
        );

        let content = self.generator.generate(&prompt, self.max_tokens).await?;
        debug!(title = %input.title, chars = content.len(), "Generated post content");

        let tags = match self.suggest_tags(&input.title, &content).await {
            Ok(tags) => tags,
            Err(e) => {
                warn!(error = %e, "Tag suggestion failed, continuing without tags");
                Vec::new()
            }
        };

        Ok(GeneratedContent { content, tags })
    }

    /// Suggest a meta title, description and tags.
    pub async fn generate_meta(&self, input: GenerateMetaInput) -> AppResult<GeneratedMeta> {
        input.validate()?;

        let prompt = format!(
            "Based on the following blog post title and content, generate SEO-optimized meta information:\n\n\
             Title: {}\n\
             Content: {}\n\n\
             Please provide:\n\
             1. A compelling meta title (50-60 characters)\n\
             2. A descriptive meta description (150-160 characters)\n\
             3. 5-7 relevant tags/keywords\n\n\
             Format your response as:\n\
             Meta Title: [title]\n\
             Meta Description: [description]\n\
             Tags: [tag1, tag2, tag3, ...]",
            input.title, input.content,
        );

        let response = self.generator.generate(&prompt, META_MAX_TOKENS).await?;
        Ok(parse_meta(&response))
    }

    async fn suggest_tags(&self, title: &str, content: &str) -> AppResult<Vec<String>> {
        let prompt = format!(
            "Based on the following blog post title and content, suggest 5-7 relevant tags/keywords:\n\n\
             Title: {title}\n\
             Content: {content}\n\n\
             Respond with only the tags separated by commas."
        );

        let raw = self.generator.generate(&prompt, TAGS_MAX_TOKENS).await?;
        Ok(split_tags(&raw))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;

    /// Replays canned replies and records each call's prompt and budget.
    struct ScriptedGenerator {
        replies: Mutex<Vec<AppResult<String>>>,
        calls: Mutex<Vec<(String, u32)>>,
    }

    impl ScriptedGenerator {
        fn new(replies: Vec<AppResult<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str, max_tokens: u32) -> AppResult<String> {
            self.calls.lock().await.push((prompt.to_string(), max_tokens));
            self.replies
                .lock()
                .await
                .pop()
                .unwrap_or_else(|| Err(AppError::Upstream("no reply scripted".to_string())))
        }
    }

    fn content_input(length: Option<&str>) -> GenerateContentInput {
        GenerateContentInput {
            title: "Rust".to_string(),
            description: "Ownership".to_string(),
            tone: None,
            length: length.map(ToString::to_string),
        }
    }

    #[test]
    fn test_word_range() {
        assert_eq!(word_range(Some("short")), "500-800 words");
        assert_eq!(word_range(Some("long")), "1500-2500 words");
        assert_eq!(word_range(Some("epic")), "800-1500 words");
        assert_eq!(word_range(None), "800-1500 words");
    }

    #[test]
    fn test_split_tags_drops_blanks() {
        assert_eq!(split_tags(" rust, ,async ,"), ["rust", "async"]);
    }

    #[test]
    fn test_parse_meta() {
        let meta = parse_meta(
            "Meta Title: Learn Rust\n\
             Meta Description: A gentle start.\n\
             Tags: [rust, beginners, systems]",
        );

        assert_eq!(meta.meta_title, "Learn Rust");
        assert_eq!(meta.meta_description, "A gentle start.");
        assert_eq!(meta.tags, ["rust", "beginners", "systems"]);
    }

    #[tokio::test]
    async fn test_generate_content_defaults_and_budget() {
        let generator = ScriptedGenerator::new(vec![
            Ok("# Rust".to_string()),
            Ok("rust, ownership".to_string()),
        ]);
        let service = AiService::new(generator.clone(), 3000);

        let generated = service.generate_content(content_input(None)).await.unwrap();

        assert_eq!(generated.content, "# Rust");
        assert_eq!(generated.tags, ["rust", "ownership"]);

        let calls = generator.calls.lock().await;
        assert_eq!(calls.len(), 2);
        assert!(calls[0].0.contains("Tone: professional"));
        assert!(calls[0].0.contains("800-1500 words"));
        assert_eq!(calls[0].1, 3000);
        assert_eq!(calls[1].1, TAGS_MAX_TOKENS);
    }

    #[tokio::test]
    async fn test_tag_failure_degrades_to_empty() {
        let generator = ScriptedGenerator::new(vec![
            Ok("body".to_string()),
            Err(AppError::Upstream("rate limited".to_string())),
        ]);
        let service = AiService::new(generator, 3000);

        let generated = service
            .generate_content(content_input(Some("short")))
            .await
            .unwrap();

        assert_eq!(generated.content, "body");
        assert!(generated.tags.is_empty());
    }

    #[tokio::test]
    async fn test_content_failure_is_upstream() {
        let generator = ScriptedGenerator::new(vec![Err(AppError::Upstream("down".to_string()))]);
        let service = AiService::new(generator, 3000);

        let result = service.generate_content(content_input(None)).await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_upstream() {
        let generator = OpenAiGenerator::from_config(&AiConfig::default()).unwrap();

        let result = generator.generate("hi", 10).await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
    }
}
