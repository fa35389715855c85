use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use super::markup::strip_control_markup;
use super::sse_parser::sse_to_text_stream;
use super::{EngineConfig, EngineError, GenerationConfig, GenerationEngine, SamplingMode};

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    n: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    stream: bool,
}

impl<'a> CompletionRequest<'a> {
    fn new(model: &'a str, prompt: &'a str, config: &GenerationConfig) -> Self {
        let (temperature, top_p) = match config.sampling {
            SamplingMode::Stochastic { temperature, top_p } => (temperature, Some(top_p)),
            SamplingMode::Greedy => (0.0, None),
        };

        Self {
            model,
            prompt,
            max_tokens: config.max_length,
            n: config.num_sequences,
            temperature,
            top_p,
            seed: config.seed,
            stream: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// A generation engine backed by an OpenAI-compatible completion server.
///
/// The server owns the model, tokenizer and device placement; this handle
/// only verifies at load time that the model is served and then streams
/// `/v1/completions` for each prompt.
pub struct CompletionEngine {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl CompletionEngine {
    /// Connects to the server and checks that `config.model` is served.
    pub async fn load(config: EngineConfig) -> Result<Self, EngineError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let engine = Self {
            client: builder.build()?,
            endpoint: config.endpoint,
            model: config.model,
            api_key: config.api_key,
        };

        let available = engine.served_models().await?;
        tracing::debug!(endpoint = %engine.endpoint, models = ?available, "listed served models");

        if !available.iter().any(|id| id == &engine.model) {
            return Err(EngineError::ModelNotServed {
                model: engine.model,
                available,
            });
        }

        tracing::info!(endpoint = %engine.endpoint, model = %engine.model, "engine loaded");
        Ok(engine)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn served_models(&self) -> Result<Vec<String>, EngineError> {
        let url = self.url("models");
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|source| EngineError::Unreachable { url, source })?;

        let models: ModelList = check_status(response).await?.json().await?;
        Ok(models.data.into_iter().map(|m| m.id).collect())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.endpoint.trim_end_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(api_key) => request.bearer_auth(api_key),
            None => request,
        }
    }
}

impl GenerationEngine for CompletionEngine {
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, EngineError> {
        let url = self.url("completions");
        let request = CompletionRequest::new(&self.model, prompt, config);
        tracing::debug!(
            url = %url,
            max_tokens = request.max_tokens,
            temperature = request.temperature,
            "sending completion request"
        );

        let response = self
            .authorize(self.client.post(&url).json(&request))
            .send()
            .await
            .map_err(|source| EngineError::Unreachable { url, source })?;

        let response = check_status(response).await?;
        let mut stream = std::pin::pin!(sse_to_text_stream(response.bytes_stream()));

        // Buffer the whole reply so a mid-stream failure never leaks partial text.
        let mut reply = String::new();
        while let Some(chunk) = stream.next().await {
            reply.push_str(&chunk?);
        }

        tracing::debug!(chars = reply.len(), "completion stream finished");
        Ok(strip_control_markup(&reply))
    }
}

async fn check_status(response: Response) -> Result<Response, EngineError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(EngineError::Http { status, body })
}
