//! Hosted inference backends speaking the Hugging Face Inference API protocol.
//!
//! Works against the public API or any self-hosted server exposing the same
//! `POST {endpoint}/{model}` JSON contract for the zero-shot-classification
//! and summarization tasks.

use crate::config::{ClassifierConfig, SummarizerConfig};
use crate::error::{NotetakerError, Result};
use crate::inference::classifier::{Classification, LabelScore, ZeroShotClassifier};
use crate::inference::summarizer::{AbstractiveSummarizer, SummaryParams};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Upper bound on TCP/TLS connect time, independent of the request timeout.
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Truncation strategy requested when input may exceed the model context.
const TRUNCATE_INPUT: &str = "only_first";

/// One model endpoint plus the HTTP client used to reach it.
struct ModelEndpoint {
    backend: &'static str,
    client: Client,
    url: Url,
    token: Option<String>,
    model: String,
}

impl ModelEndpoint {
    fn new(
        backend: &'static str,
        base_url: &str,
        model: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let url = model_url(base_url, model).map_err(|message| NotetakerError::BackendInit {
            backend: backend.to_string(),
            message,
        })?;

        let client = Client::builder()
            .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
            .timeout(timeout)
            .build()
            .map_err(|e| NotetakerError::BackendInit {
                backend: backend.to_string(),
                message: format!("HTTP client: {e}"),
            })?;

        Ok(Self {
            backend,
            client,
            url,
            token,
            model: model.to_string(),
        })
    }

    fn post<B: Serialize, R: DeserializeOwned>(&self, body: &B) -> Result<R> {
        debug!(backend = self.backend, url = %self.url, "Sending inference request");

        let mut request = self.client.post(self.url.clone()).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| self.inference_error(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .map_err(|e| self.inference_error(format!("reading response: {e}")))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            return Err(self.inference_error(format!("HTTP {status}: {detail}")));
        }

        if let Ok(api_error) = serde_json::from_str::<ApiError>(&text) {
            return Err(self.inference_error(api_error.error));
        }

        serde_json::from_str(&text).map_err(|e| NotetakerError::MalformedResponse {
            backend: self.backend.to_string(),
            message: e.to_string(),
        })
    }

    fn inference_error(&self, message: String) -> NotetakerError {
        NotetakerError::Inference {
            backend: self.backend.to_string(),
            message,
        }
    }
}

/// Join the endpoint base and model id into the request URL.
fn model_url(base_url: &str, model: &str) -> std::result::Result<Url, String> {
    let base = base_url.trim().trim_end_matches('/');
    let model = model.trim().trim_matches('/');
    if model.is_empty() {
        return Err("model id is empty".to_string());
    }

    let url = Url::parse(&format!("{base}/{model}"))
        .map_err(|e| format!("invalid endpoint '{base_url}': {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported URL scheme '{other}'")),
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
}

#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Debug, Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [&'a str],
    multi_label: bool,
}

/// Zero-shot responses come either as parallel arrays or as label/score pairs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Parallel { labels: Vec<String>, scores: Vec<f64> },
    Pairs(Vec<ScoredLabel>),
}

#[derive(Debug, Deserialize)]
struct ScoredLabel {
    label: String,
    score: f64,
}

impl ZeroShotResponse {
    fn into_classification(self) -> Result<Classification> {
        match self {
            ZeroShotResponse::Parallel { labels, scores } => {
                Classification::from_parallel(labels, scores)
            }
            ZeroShotResponse::Pairs(pairs) => Ok(Classification::from_scores(
                pairs
                    .into_iter()
                    .map(|p| LabelScore {
                        label: p.label,
                        score: p.score,
                    })
                    .collect(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
struct SummarizationRequest<'a> {
    inputs: &'a str,
    parameters: SummarizationParameters,
}

#[derive(Debug, Serialize)]
struct SummarizationParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    truncation: Option<&'static str>,
}

impl From<&SummaryParams> for SummarizationParameters {
    fn from(params: &SummaryParams) -> Self {
        Self {
            max_length: params.max_length,
            min_length: params.min_length,
            do_sample: params.do_sample,
            truncation: params.truncation.then_some(TRUNCATE_INPUT),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SummaryPayload {
    summary_text: String,
}

fn first_summary(payloads: Vec<SummaryPayload>) -> Result<String> {
    payloads
        .into_iter()
        .next()
        .map(|p| p.summary_text)
        .ok_or_else(|| NotetakerError::MalformedResponse {
            backend: "summarizer".to_string(),
            message: "empty summary list".to_string(),
        })
}

/// Zero-shot classifier backed by a hosted NLI model.
pub struct HfZeroShotClassifier {
    endpoint: ModelEndpoint,
}

impl HfZeroShotClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        Ok(Self {
            endpoint: ModelEndpoint::new(
                "classifier",
                &config.endpoint,
                &config.model,
                config.api_token.clone(),
                config.timeout(),
            )?,
        })
    }
}

impl ZeroShotClassifier for HfZeroShotClassifier {
    fn classify(&self, text: &str, labels: &[&str], multi_label: bool) -> Result<Classification> {
        let request = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels: labels,
                multi_label,
            },
        };
        let response: ZeroShotResponse = self.endpoint.post(&request)?;
        response.into_classification()
    }

    fn model_name(&self) -> &str {
        &self.endpoint.model
    }
}

/// Abstractive summarizer backed by a hosted seq2seq model.
pub struct HfSummarizer {
    endpoint: ModelEndpoint,
}

impl HfSummarizer {
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        Ok(Self {
            endpoint: ModelEndpoint::new(
                "summarizer",
                &config.endpoint,
                &config.model,
                config.api_token.clone(),
                config.timeout(),
            )?,
        })
    }
}

impl AbstractiveSummarizer for HfSummarizer {
    fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String> {
        let request = SummarizationRequest {
            inputs: text,
            parameters: params.into(),
        };
        let payloads: Vec<SummaryPayload> = self.endpoint.post(&request)?;
        first_summary(payloads)
    }

    fn model_name(&self) -> &str {
        &self.endpoint.model
    }
}
