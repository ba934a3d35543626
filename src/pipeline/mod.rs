//! Transcript-to-audit-document pipeline.
//!
//! Blocking inference stages run on tokio's blocking pool with per-stage
//! timeouts. Sentiment analysis runs alongside extraction and summarization;
//! the SOAP note is synthesized once both branches are done.

pub mod audit;
pub mod orchestrator;
pub mod stage;
pub mod store;
pub mod types;

pub use audit::{AuditDocument, AuditMetadata, AuditOutcome, FailureEnvelope, ProfessionalNotes};
pub use orchestrator::{Pipeline, StageTimeouts};
pub use store::{AuditStore, JsonFileStore, MemoryStore};
pub use types::StageStatus;
