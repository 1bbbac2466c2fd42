//! Completion provider adapter.
//!
//! Drafts a welcome message through a remote completions endpoint. The public
//! entry point never fails: a missing key, a transport error, or a payload
//! without choices all degrade to a templated sentence.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

pub const DEFAULT_ENDPOINT: &str = "https://api.together.xyz/v1/completions";
pub const DEFAULT_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";
pub const MAX_TOKENS: u32 = 100;
pub const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion response carried no choices")]
    NoChoices,
}

#[derive(Clone, Debug)]
pub struct CompletionConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(20),
        }
    }
}

/// Inputs for a welcome draft.
#[derive(Clone, Copy, Debug)]
pub struct WelcomePrompt<'a> {
    pub name: &'a str,
    pub role: &'a str,
    pub field: &'a str,
    pub organization: &'a str,
}

impl WelcomePrompt<'_> {
    pub fn render(&self) -> String {
        let Self {
            name,
            role,
            field,
            organization,
        } = self;
        format!(
            "Write a warm and professional HR welcome email for a new employee named {name}. \
             They are joining the company '{organization}' as a '{role}'. \
             The company operates in the {field} sector. \
             The email should be welcoming, mention their role and the company name, \
             and have a positive tone suitable for the {field} industry."
        )
    }

    /// Used when no key is configured; the network is never touched.
    pub fn skipped_text(&self) -> String {
        format!(
            "Welcome {}! We are excited for you to join {} as our new {}. (AI email skipped: no completion key set)",
            self.name, self.organization, self.role
        )
    }

    /// Used when the provider fails or answers without choices.
    pub fn fallback_text(&self) -> String {
        format!(
            "Welcome {}! We're excited to have you at {} as our new {}.",
            self.name, self.organization, self.role
        )
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    text: String,
}

#[derive(Clone, Debug)]
pub struct CompletionClient {
    http: reqwest::Client,
    config: CompletionConfig,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn has_key(&self) -> bool {
        self.api_key().is_some()
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Returns the provider's draft, or a templated sentence when it cannot.
    #[instrument(name = "completion.welcome", skip_all, fields(model = %self.config.model))]
    pub async fn generate_welcome_text(&self, prompt: WelcomePrompt<'_>) -> String {
        let Some(key) = self.api_key() else {
            debug!("no completion key configured; using templated welcome");
            return prompt.skipped_text();
        };
        match self.complete(key, &prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "welcome draft unavailable; using fallback text");
                prompt.fallback_text()
            }
        }
    }

    async fn complete(&self, key: &str, prompt: &WelcomePrompt<'_>) -> Result<String, CompletionError> {
        let request = CompletionRequest {
            model: &self.config.model,
            prompt: prompt.render(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };
        let response: CompletionResponse = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(CompletionError::NoChoices)
    }
}
