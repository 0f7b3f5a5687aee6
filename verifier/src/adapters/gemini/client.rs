//! Gemini API client implementation

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::domain::entities::{ClaimCategory, ClaimImportance, CodeExcerpt, EvidenceOutcome};
use crate::domain::ports::{Assessment, ClaimClassification, LanguageModelProvider};
use crate::error::ProviderError;

/// Implementation of the language model provider against the Gemini API
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build Gemini HTTP client")?;

        Ok(Self {
            http,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// One prompt in, the first candidate's text out
    async fn generate(&self, prompt: String) -> Result<String, ProviderError> {
        let resp = self
            .http
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateRequest::json_only(prompt))
            .send()
            .await?;

        let body: GenerateResponse = self.handle_response(resp).await?;
        body.first_text()
            .ok_or_else(|| ProviderError::Malformed("empty model response".to_string()))
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ProviderError::Malformed(e.to_string()))
        } else if status.as_u16() == 404 {
            Err(ProviderError::NotFound(self.model.clone()))
        } else if status.as_u16() == 429 {
            Err(ProviderError::RateLimited)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ProviderError::Transport(format!(
                "gemini returned {}: {}",
                status, message
            )))
        }
    }
}

/// Request types for the Gemini API
#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

impl GenerateRequest {
    /// Temperature zero and a JSON mime type keep responses reproducible
    /// and parseable
    fn json_only(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                response_mime_type: "application/json",
            },
        }
    }
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

/// Response types from the Gemini API
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()
            .map(|part| part.text)
    }
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct ClassifyPayload {
    #[serde(default)]
    category: String,
    #[serde(default)]
    importance: String,
}

#[derive(Deserialize)]
struct AssessPayload {
    #[serde(default)]
    outcome: String,
    #[serde(default)]
    justification: String,
}

/// Models wrap JSON in markdown fences often enough to strip them up front
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Unknown categories land on the middle ground instead of failing the claim
fn clamp_category(raw: &str) -> ClaimCategory {
    raw.trim().parse().unwrap_or(ClaimCategory::Feature)
}

fn clamp_importance(raw: &str) -> ClaimImportance {
    match raw.trim().to_lowercase().as_str() {
        "core" | "critical" | "high" => ClaimImportance::Core,
        "minor" | "low" | "trivial" => ClaimImportance::Minor,
        _ => ClaimImportance::Secondary,
    }
}

fn clamp_outcome(raw: &str) -> EvidenceOutcome {
    match raw.trim().to_lowercase().as_str() {
        "confirmed" | "supported" | "true" => EvidenceOutcome::Confirmed,
        "refuted" | "contradicted" | "false" => EvidenceOutcome::Refuted,
        _ => EvidenceOutcome::Inconclusive,
    }
}

fn classify_prompt(text: &str) -> String {
    format!(
        "You review hackathon submissions. Classify the claim below.\n\
         \n\
         Respond with JSON only:\n\
         {{\"category\": \"technology\" | \"feature\" | \"complexity\", \
         \"importance\": \"core\" | \"secondary\" | \"minor\"}}\n\
         \n\
         - category: \"technology\" if the claim names a concrete technology, \
         \"feature\" if it asserts a capability, \"complexity\" if it asserts \
         sophistication or scale.\n\
         - importance: \"core\" if the pitch stands or falls on this claim, \
         \"minor\" for incidental detail, \"secondary\" otherwise.\n\
         \n\
         Claim: {}",
        text
    )
}

fn assess_prompt(claim_text: &str, excerpts: &[CodeExcerpt]) -> String {
    let mut prompt = format!(
        "You verify hackathon submissions against their source code. Decide \
         whether the excerpts below support the claim.\n\
         \n\
         Respond with JSON only:\n\
         {{\"outcome\": \"confirmed\" | \"refuted\" | \"inconclusive\", \
         \"justification\": \"<one sentence>\"}}\n\
         \n\
         - \"confirmed\": the excerpts demonstrate the claim.\n\
         - \"refuted\": the excerpts contradict the claim.\n\
         - \"inconclusive\": the excerpts settle nothing either way.\n\
         \n\
         Claim: {}\n\
         \n\
         Excerpts:\n",
        claim_text
    );
    for excerpt in excerpts {
        prompt.push_str(&format!("--- {} ---\n{}\n", excerpt.path, excerpt.content));
    }
    prompt
}

#[async_trait]
impl LanguageModelProvider for GeminiClient {
    async fn classify(&self, text: &str) -> Result<ClaimClassification, ProviderError> {
        let raw = self.generate(classify_prompt(text)).await?;
        let payload: ClassifyPayload = serde_json::from_str(strip_code_fences(&raw))
            .map_err(|e| ProviderError::Malformed(format!("classification parse: {}", e)))?;

        Ok(ClaimClassification {
            category: clamp_category(&payload.category),
            importance: clamp_importance(&payload.importance),
        })
    }

    async fn assess(
        &self,
        claim_text: &str,
        excerpts: &[CodeExcerpt],
    ) -> Result<Assessment, ProviderError> {
        let raw = self.generate(assess_prompt(claim_text, excerpts)).await?;
        let payload: AssessPayload = serde_json::from_str(strip_code_fences(&raw))
            .map_err(|e| ProviderError::Malformed(format!("assessment parse: {}", e)))?;

        Ok(Assessment {
            outcome: clamp_outcome(&payload.outcome),
            justification: payload.justification,
        })
    }
}
