//! Per-request orchestration of the clinical pipeline.

use crate::config::Config;
use crate::error::Result;
use crate::extraction::extractor::{EntityExtractor, EntityReport};
use crate::inference::registry::InferenceBackends;
use crate::inference::summarizer::SummaryParams;
use crate::pipeline::audit::{
    AuditDocument, AuditMetadata, AuditOutcome, FailureEnvelope, ProfessionalNotes, timestamp_now,
};
use crate::pipeline::stage::{self, STAGE_GRACE};
use crate::pipeline::store::AuditStore;
use crate::sentiment::{SentimentIntentAnalyzer, SentimentIntentReport};
use crate::soap::{SoapNote, SoapSynthesizer};
use crate::summary::{SummaryResult, Summarizer};
use crate::text;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const EXTRACTION_STAGE: &str = "entity extraction";
const SUMMARY_STAGE: &str = "summarization";
const SENTIMENT_STAGE: &str = "sentiment analysis";

/// Upper bounds on each blocking stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTimeouts {
    pub extraction: Duration,
    pub summarization: Duration,
    pub sentiment: Duration,
}

impl StageTimeouts {
    /// Derived from backend timeouts: one classifier call for keywords, two for
    /// sentiment/intent, one summarizer call. Saturates instead of overflowing.
    pub fn from_config(config: &Config) -> Self {
        let classifier = config.classifier.timeout();
        Self {
            extraction: classifier.saturating_add(STAGE_GRACE),
            summarization: config.summarizer.timeout().saturating_add(STAGE_GRACE),
            sentiment: classifier.saturating_mul(2).saturating_add(STAGE_GRACE),
        }
    }

    pub fn uniform(timeout: Duration) -> Self {
        Self {
            extraction: timeout,
            summarization: timeout,
            sentiment: timeout,
        }
    }
}

/// Runs every stage for one transcript and assembles the audit document.
///
/// Cheap to share: components sit behind `Arc` and hold no per-request state.
pub struct Pipeline {
    extractor: Arc<EntityExtractor>,
    summarizer: Arc<Summarizer>,
    analyzer: Arc<SentimentIntentAnalyzer>,
    soap: SoapSynthesizer,
    store: Arc<dyn AuditStore>,
    timeouts: StageTimeouts,
}

impl Pipeline {
    pub fn new(
        backends: &InferenceBackends,
        config: &Config,
        store: Arc<dyn AuditStore>,
    ) -> Result<Self> {
        let extractor =
            EntityExtractor::from_config(&config.extraction, backends.classifier.clone())?;
        let params = SummaryParams {
            max_length: config.summarizer.max_length,
            min_length: config.summarizer.min_length,
            ..SummaryParams::default()
        };

        Ok(Self {
            extractor: Arc::new(extractor),
            summarizer: Arc::new(Summarizer::with_params(backends.summarizer.clone(), params)),
            analyzer: Arc::new(SentimentIntentAnalyzer::new(backends.classifier.clone())),
            soap: SoapSynthesizer::new(),
            store,
            timeouts: StageTimeouts::from_config(config),
        })
    }

    pub fn with_timeouts(mut self, timeouts: StageTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn timeouts(&self) -> StageTimeouts {
        self.timeouts
    }

    /// Process one transcript and persist the resulting document as `filename`.
    ///
    /// Never fails: blank input and internal faults come back as
    /// [`AuditOutcome::Failed`]. Persistence errors are only logged.
    pub async fn run(&self, transcript: &str, filename: &str) -> AuditOutcome {
        if text::is_blank(transcript) {
            error!("Empty transcript provided.");
            return AuditOutcome::Failed(FailureEnvelope::empty_transcript());
        }

        let transcript_length = transcript.chars().count();
        info!(length = transcript_length, "Processing transcript");
        let started = Instant::now();

        match self.execute(transcript).await {
            Ok((summary, entities, sentiment, soap_note)) => {
                let document = AuditDocument {
                    metadata: AuditMetadata::new(timestamp_now(), started.elapsed(), transcript_length),
                    clinical_summary: summary,
                    medical_entities: entities,
                    sentiment_and_intent: sentiment,
                    soap_note,
                    professional_notes: ProfessionalNotes::default(),
                };

                match self.store.persist(&document, filename).await {
                    Ok(path) => info!(path = %path.display(), "Audit document saved"),
                    Err(e) => error!(error = %e, "Failed to save audit document"),
                }
                info!(
                    elapsed_sec = document.metadata.processing_time_sec,
                    "Processing complete"
                );
                AuditOutcome::Completed(Box::new(document))
            }
            Err(e) => {
                error!(error = %e, "Pipeline execution failed");
                AuditOutcome::Failed(FailureEnvelope::internal(e))
            }
        }
    }

    async fn execute(
        &self,
        transcript: &str,
    ) -> Result<(SummaryResult, EntityReport, SentimentIntentReport, SoapNote)> {
        let shared: Arc<str> = Arc::from(transcript);

        let sentiment = {
            let analyzer = self.analyzer.clone();
            let text = shared.clone();
            stage::run_blocking(SENTIMENT_STAGE, self.timeouts.sentiment, move || {
                analyzer.analyze(&text)
            })
        };
        let clinical = self.extract_and_summarize(shared);

        let (sentiment, clinical) = tokio::join!(sentiment, clinical);
        let sentiment = stage::degrade_on_timeout(sentiment, SentimentIntentReport::failed)?;
        let (entities, summary) = clinical?;

        let soap_note = self.soap.generate(transcript, &entities, &summary);
        Ok((summary, entities, sentiment, soap_note))
    }

    /// Extraction, then summarization, then enrichment of the summary lists.
    async fn extract_and_summarize(&self, transcript: Arc<str>) -> Result<(EntityReport, SummaryResult)> {
        let entities = {
            let extractor = self.extractor.clone();
            let text = transcript.clone();
            stage::run_blocking(EXTRACTION_STAGE, self.timeouts.extraction, move || {
                extractor.process(&text)
            })
            .await
        };
        let entities = stage::degrade_on_timeout(entities, EntityReport::failed)?;
        debug!(status = %entities.status, total = entities.entities.total(), "Extraction stage done");

        let summary = {
            let summarizer = self.summarizer.clone();
            stage::run_blocking(SUMMARY_STAGE, self.timeouts.summarization, move || {
                summarizer.summarize(&transcript)
            })
            .await
        };
        let mut summary = stage::degrade_on_timeout(summary, SummaryResult::failed)?;
        debug!(status = %summary.status, "Summarization stage done");

        if entities.status.is_success() {
            summary.enrich(&entities.entities);
        } else {
            warn!(status = %entities.status, "Skipping summary enrichment");
        }

        Ok((entities, summary))
    }
}
