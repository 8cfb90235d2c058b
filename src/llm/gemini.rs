//! Google Gemini implementation of the AI collaborator
//!
//! Structured calls send a JSON response schema so the model replies with a
//! single JSON object; the reply is still validated on our side and every
//! missing field falls back to its default.

use crate::config::CollaboratorConfig;
use crate::error::{Result, ResumatchError};
use crate::llm::prompts::{PromptParams, PromptTemplates};
use crate::llm::types::{AtsReport, CollaboratorAnalysis, InterviewFeedback};
use crate::llm::AiCollaborator;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    complex_model: String,
    max_retries: u32,
    templates: PromptTemplates,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("complex_model", &self.complex_model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Build a client, reading the API key from the configured environment variable
    pub fn from_config(config: &CollaboratorConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            ResumatchError::Configuration(format!(
                "{} environment variable not set",
                config.api_key_env
            ))
        })?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: &CollaboratorConfig, api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(ResumatchError::Configuration("API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ResumatchError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            complex_model: config.complex_model.clone(),
            max_retries: config.max_retries.max(1),
            templates: PromptTemplates::default(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one `generateContent` request and return the concatenated text parts.
    /// Retries on 429 and 5xx with exponential backoff.
    async fn generate(&self, model: &str, prompt: &str, schema: Option<Value>) -> Result<String> {
        let url = format!("{}/{}:generateContent", self.api_base, model);
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: schema.map(|schema| GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema,
            }),
        };

        let mut last_error: Option<ResumatchError> = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                let delay = retry_delay(attempt);
                warn!(
                    "Gemini call attempt {} failed, retrying after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(e.into());
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Gemini API returned {}: {}", status, body);
                last_error = Some(ResumatchError::Collaborator(format!(
                    "Gemini API error ({}): {}",
                    status, body
                )));
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ResumatchError::Collaborator(format!(
                    "Gemini API error ({}): {}",
                    status, body
                )));
            }

            let parsed: GenerateResponse = response.json().await?;
            if let Some(usage) = &parsed.usage_metadata {
                debug!(
                    "Gemini call succeeded: model={}, prompt_tokens={}, output_tokens={}",
                    model, usage.prompt_token_count, usage.candidates_token_count
                );
            }
            return Ok(parsed.text());
        }

        Err(last_error.unwrap_or_else(|| {
            ResumatchError::Collaborator(format!("Gemini call failed after {} attempts", self.max_retries))
        }))
    }
}

impl AiCollaborator for GeminiClient {
    async fn analyze(&self, resume_text: &str, job_description: &str) -> Result<CollaboratorAnalysis> {
        let prompt = self
            .templates
            .render_analysis(&PromptParams::for_documents(resume_text, job_description));
        let text = self.generate(&self.model, &prompt, Some(analysis_schema())).await?;
        parse_json_or_default(&text)
    }

    async fn interview_question(&self, resume_text: &str, job_description: &str) -> Result<String> {
        let prompt = self
            .templates
            .render_interview_question(&PromptParams::for_documents(resume_text, job_description));
        let text = self.generate(&self.complex_model, &prompt, None).await?;
        Ok(text.trim().to_string())
    }

    async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
        job_description: &str,
    ) -> Result<InterviewFeedback> {
        let params = PromptParams {
            question: question.to_string(),
            answer: answer.to_string(),
            job_content: job_description.to_string(),
            ..Default::default()
        };
        let prompt = self.templates.render_answer_evaluation(&params);
        let text = self
            .generate(&self.complex_model, &prompt, Some(feedback_schema()))
            .await?;

        if text.trim().is_empty() {
            return Ok(InterviewFeedback::unavailable());
        }
        Ok(parse_json::<InterviewFeedback>(&text)?.clamped())
    }

    async fn ats_audit(&self, resume_text: &str) -> Result<AtsReport> {
        let prompt = self
            .templates
            .render_ats_audit(&PromptParams::for_documents(resume_text, ""));
        let text = self.generate(&self.model, &prompt, Some(ats_schema())).await?;
        Ok(parse_json_or_default::<AtsReport>(&text)?.clamped())
    }
}

/// Parse a JSON reply, treating an empty reply as `{}`
fn parse_json_or_default<T: DeserializeOwned + Default>(text: &str) -> Result<T> {
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    parse_json(text)
}

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(strip_json_fences(text)).map_err(|e| {
        ResumatchError::Collaborator(format!("Unparsable collaborator response: {}", e))
    })
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(str::trim)
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "groupedSkills": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "category": { "type": "STRING" },
                        "skills": string_array()
                    }
                }
            },
            "missingSkills": string_array(),
            "extraSkills": string_array(),
            "suggestions": string_array()
        },
        "required": ["summary", "groupedSkills", "missingSkills", "extraSkills", "suggestions"]
    })
}

fn feedback_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "NUMBER", "description": "A percentage score from 0 to 100" },
            "feedback": { "type": "STRING", "description": "Detailed constructive criticism" },
            "strengths": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Specific skills demonstrated"
            }
        },
        "required": ["score", "feedback", "strengths"]
    })
}

fn ats_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "total": { "type": "NUMBER" },
            "formatting": { "type": "NUMBER" },
            "keywords": { "type": "NUMBER" },
            "readability": { "type": "NUMBER" },
            "findings": string_array(),
            "improvements": string_array()
        },
        "required": ["total", "formatting", "keywords", "readability", "findings", "improvements"]
    })
}

// Gemini API types

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount")]
    candidates_token_count: u32,
}

impl GenerateResponse {
    /// Text of the first candidate, parts joined
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Exponential backoff starting at 1s, capped at 1024s
fn retry_delay(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(10);
    Duration::from_millis(1000u64.saturating_mul(1 << exponent))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CollaboratorConfig {
        CollaboratorConfig::default()
    }

    #[test]
    fn test_retry_delay_is_capped() {
        assert_eq!(retry_delay(1), Duration::from_secs(1));
        assert_eq!(retry_delay(2), Duration::from_secs(2));
        assert_eq!(retry_delay(3), Duration::from_secs(4));
        assert_eq!(retry_delay(11), Duration::from_secs(1024));
        assert_eq!(retry_delay(70), Duration::from_secs(1024));
        assert_eq!(retry_delay(u32::MAX), Duration::from_secs(1024));
    }

    #[test]
    fn test_strip_json_fences() {
        assert_eq!(strip_json_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_json_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_json_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_gemini_response() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "{\"summary\": "}, {"text": "\"Good fit\"}"}]
                }
            }],
            "usageMetadata": {
                "promptTokenCount": 10,
                "candidatesTokenCount": 5,
                "totalTokenCount": 15
            }
        }"#;

        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        let text = response.text();
        assert_eq!(text, r#"{"summary": "Good fit"}"#);

        let analysis: CollaboratorAnalysis = parse_json_or_default(&text).unwrap();
        assert_eq!(analysis.summary, "Good fit");
        assert!(analysis.missing_skills.is_empty());
    }

    #[test]
    fn test_response_without_candidates() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), "");
    }

    #[test]
    fn test_empty_reply_defaults() {
        let analysis: CollaboratorAnalysis = parse_json_or_default("  ").unwrap();
        assert_eq!(analysis, CollaboratorAnalysis::default());
    }

    #[test]
    fn test_unparsable_reply_is_collaborator_error() {
        let err = parse_json::<CollaboratorAnalysis>("Sorry, I cannot help with that.").unwrap_err();
        assert!(matches!(err, ResumatchError::Collaborator(_)));
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: Some("hi".to_string()),
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: feedback_schema(),
            }),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_schemas_list_required_fields() {
        assert_eq!(analysis_schema()["required"].as_array().unwrap().len(), 5);
        assert_eq!(ats_schema()["required"].as_array().unwrap().len(), 6);
        assert_eq!(feedback_schema()["required"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_client_rejects_empty_key() {
        assert!(GeminiClient::with_api_key(&config(), "  ".to_string()).is_err());

        let client = GeminiClient::with_api_key(&config(), "test-key".to_string()).unwrap();
        assert_eq!(client.model(), "gemini-3-flash-preview");
    }
}
