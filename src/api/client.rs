use super::catalog::ModelCatalog;
use crate::config::Config;
use crate::error::{CforError, ResponseParseError};
use crate::logging::{debug_payload_enabled, emit_debug_payload};
use crate::types::{ChatCompletionResponse, CommandSet, CompletionResult, TokenUsage};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::time::Duration;
#[cfg(test)]
use std::sync::Arc;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const TEMPERATURE: f64 = 0.1;
const TOP_P: f64 = 1.0;
const PRESENCE_PENALTY: f64 = 0.0;
const FREQUENCY_PENALTY: f64 = 0.0;
const MAX_TOKENS: u32 = 2048;

const SYSTEM_PROMPT: &str = "You are a helpful system admin who provides users with commands to execute inside terminal, when asked.";
const JSON_RESPONSE_PROMPT: &str = "Return your response as a valid JSON object.";
const MAIN_PROMPT: &str = "what is the command for";
const GUIDELINE_PROMPT: &str = "Follow the below guidelines.\n\
\n\
## **General Rules**\n\
- **Do**:\n  \
  - Provide variations of the command in the order of increasing complexity\n  \
  - Append very short, minimal *inline comments* for each command\n\
- **Do not**:\n  \
  - Add newlines for comments.\n  \
  - Provide any remarks.\n\
\n";

const SCHEMA_NAME: &str = "cmds";
const SCHEMA_DESCRIPTION: &str = "A list of commands and associated comments to execute.";

#[cfg(test)]
pub trait MockCompletionProducer: Send + Sync {
    fn create_mock_completion(&self, payload: &Value) -> Result<String, CforError>;
}

/// Asks the chat-completion backend for command suggestions.
#[derive(Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_url: String,
    os_name: String,
    catalog: ModelCatalog,
    response_schema: Value,
    #[cfg(test)]
    mock_producer: Option<Arc<dyn MockCompletionProducer>>,
}

impl CompletionClient {
    pub fn new(config: &Config, catalog: ModelCatalog) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            api_url: config.api_url.clone(),
            os_name: config.os_name.clone(),
            catalog,
            response_schema: CommandSet::response_schema(),
            #[cfg(test)]
            mock_producer: None,
        })
    }

    #[cfg(test)]
    pub fn with_mock(mut self, producer: Arc<dyn MockCompletionProducer>) -> Self {
        self.mock_producer = Some(producer);
        self
    }

    pub async fn request_commands(&self, question: &str) -> Result<CompletionResult, CforError> {
        let spec = self
            .catalog
            .get(&self.model)
            .ok_or_else(|| CforError::UnsupportedModel {
                model: self.model.clone(),
            })?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CforError::MissingCredentials)?;

        let payload = self.build_payload(question);
        if debug_payload_enabled() {
            emit_debug_payload(&self.api_url, &payload);
        }
        tracing::info!(model = %self.model, url = %self.api_url, "requesting commands");

        let body = self.send(api_key, &payload).await?;
        let response: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(ResponseParseError::from)?;
        let Some(content) = response.first_content() else {
            if let Some(refusal) = response
                .choices
                .first()
                .and_then(|choice| choice.message.refusal.as_deref())
            {
                tracing::warn!(refusal, "model refused the request");
            }
            return Err(ResponseParseError::MissingContent.into());
        };
        let commands = CommandSet::from_json(content)?;

        let usage = TokenUsage::from(response.usage);
        let cost = spec.cost.estimate(usage);
        tracing::info!(
            entries = commands.len(),
            input_tokens = usage.input_tokens,
            cached_input_tokens = usage.cached_input_tokens,
            output_tokens = usage.output_tokens,
            cost,
            "received commands"
        );

        Ok(CompletionResult { commands, cost })
    }

    fn user_prompt(&self, question: &str) -> String {
        format!(
            "{GUIDELINE_PROMPT}For the **{}** operating system, {MAIN_PROMPT} {question}?",
            self.os_name
        )
    }

    fn build_payload(&self, question: &str) -> Value {
        json!({
            "model": self.model,
            "temperature": TEMPERATURE,
            "top_p": TOP_P,
            "presence_penalty": PRESENCE_PENALTY,
            "frequency_penalty": FREQUENCY_PENALTY,
            "max_tokens": MAX_TOKENS,
            "messages": [
                {
                    "role": "system",
                    "content": format!("{SYSTEM_PROMPT} {JSON_RESPONSE_PROMPT}"),
                },
                {
                    "role": "user",
                    "content": self.user_prompt(question),
                },
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "description": SCHEMA_DESCRIPTION,
                    "schema": self.response_schema,
                    "strict": true,
                },
            },
        })
    }

    async fn send(&self, api_key: &str, payload: &Value) -> Result<String, CforError> {
        #[cfg(test)]
        {
            if let Some(producer) = &self.mock_producer {
                return producer.create_mock_completion(payload);
            }
        }

        let response = self
            .http
            .post(&self.api_url)
            .header("authorization", format!("Bearer {api_key}"))
            .json(payload)
            .send()
            .await
            .map_err(|error| map_api_request_error(error, &self.api_url))?
            .error_for_status()
            .map_err(|error| map_api_request_error(error, &self.api_url))?;

        response
            .text()
            .await
            .map_err(|error| map_api_request_error(error, &self.api_url))
    }
}

fn map_api_request_error(error: reqwest::Error, request_url: &str) -> CforError {
    if error.is_timeout() {
        tracing::warn!(url = request_url, "completion request timed out");
    } else if error.is_connect() {
        tracing::warn!(url = request_url, "cannot reach completion endpoint");
    } else if let Some(status) = error.status() {
        tracing::warn!(url = request_url, %status, "completion endpoint returned an error status");
    } else {
        tracing::warn!(url = request_url, %error, "completion request failed");
    }

    CforError::BackendRequest {
        url: request_url.to_string(),
        source: error,
    }
}
