pub mod errors;
mod models;

use std::time::Duration;
use log::{info, warn};
use reqwest::{Client, Proxy, StatusCode};
use crate::manager_llm::errors::LLMError;
use crate::manager_llm::models::{ChatMessage, ChatRequest, ChatResponse};

/// Client for rewording plain summaries through an OpenAI compatible chat completions API
pub struct LLM {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LLM {
    /// Returns an LLM struct ready for requesting completions
    ///
    /// # Arguments
    ///
    /// * 'base_url' - api root, e.g. https://api.groq.com/openai/v1
    /// * 'api_key' - bearer token for the api
    /// * 'model' - model name to request
    /// * 'proxy_url' - optional http(s) or socks5 proxy to route requests through
    pub fn new(base_url: &str, api_key: &str, model: &str, proxy_url: Option<&str>) -> Result<LLM, LLMError> {
        let mut builder = Client::builder().timeout(Duration::from_secs(20));

        if let Some(proxy_url) = proxy_url {
            info!("routing LLM requests through proxy");
            builder = builder.proxy(Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Asks the model to rewrite a text according to the given prompts
    ///
    /// # Arguments
    ///
    /// * 'system_prompt' - role instruction for the model
    /// * 'user_prompt' - the instruction including the text to rewrite
    pub async fn rewrite(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LLMError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: system_prompt.to_string() },
                ChatMessage { role: "user".to_string(), content: user_prompt.to_string() },
            ],
        };

        let req = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send().await?;

        let status = req.status();
        if status != StatusCode::OK {
            warn!("LLM api returned status {}", status);
            return Err(LLMError::Response(format!("LLM api returned status {}", status)));
        }

        let json = req.text().await?;

        extract_reply(&json)
    }
}

/// Picks the reply text out of a chat completions response document
///
/// # Arguments
///
/// * 'json' - response body
fn extract_reply(json: &str) -> Result<String, LLMError> {
    let response: ChatResponse = serde_json::from_str(json)?;

    if let Some(error) = response.error {
        return Err(LLMError::Response(format!("LLM api returned error: {}", error.message)));
    }

    response.choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| LLMError::Response("LLM api returned no choices".to_string()))
}
