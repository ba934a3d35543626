//! SOAP note synthesis from stage outputs.
//!
//! Pure: the same transcript, entities and summary always produce the same note.

use crate::extraction::entity::{EntityCategory, EntityCollection};
use crate::extraction::extractor::EntityReport;
use crate::summary::SummaryResult;
use crate::text;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static BP_READING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2,3}/\d{2,3}").expect("valid regex"));

/// Vital-sign mentions: any trigger (substring, case-insensitive) adds the finding.
const VITAL_TRIGGERS: &[(&[&str], &str)] = &[
    (&["blood pressure", "bp", "hypertension"], "Blood pressure discussed"),
    (&["fever", "temperature", "temp", "degrees"], "Body temperature noted"),
    (&["heart rate", "pulse", "bpm"], "Heart rate discussed"),
    (
        &["lungs", "breath", "respiratory", "breathing"],
        "Respiratory status mentioned",
    ),
];

const NO_SYMPTOMS: &str = "No acute symptoms specifically reported by the patient.";
const NO_SUMMARY: &str = "No clinical summary available.";
const NO_FINDINGS: &str = "Physical examination findings not explicitly detailed in the transcript. Vitals discussed were within normal limits unless otherwise specified.";
const ASSESSMENT_PENDING: &str =
    "Clinical impression: Assessment pending further evaluation and diagnostic results.";
const DEFAULT_PLAN: &str = "Management Plan: Continue current monitoring; follow-up as needed.";
const DEFAULT_PROGNOSIS: &str = "Prognosis: Stable.";

/// Four-section clinical note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoapNote {
    #[serde(rename = "Subjective")]
    pub subjective: String,
    #[serde(rename = "Objective")]
    pub objective: String,
    #[serde(rename = "Assessment")]
    pub assessment: String,
    #[serde(rename = "Plan")]
    pub plan: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SoapSynthesizer;

impl SoapSynthesizer {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, transcript: &str, report: &EntityReport, summary: &SummaryResult) -> SoapNote {
        let entities = &report.entities;
        SoapNote {
            subjective: subjective(entities, summary),
            objective: objective(transcript),
            assessment: assessment(entities),
            plan: plan(entities),
        }
    }
}

fn subjective(entities: &EntityCollection, summary: &SummaryResult) -> String {
    let symptoms = entities.values(EntityCategory::Symptom);
    let reported = if symptoms.is_empty() {
        NO_SYMPTOMS.to_string()
    } else {
        format!("Patient reports the following symptoms: {}.", symptoms.join(", "))
    };

    let summary_text = if text::is_blank(&summary.summary_text) {
        NO_SUMMARY
    } else {
        summary.summary_text.as_str()
    };

    format!("{reported} {summary_text}")
}

fn objective(transcript: &str) -> String {
    let lower = transcript.to_lowercase();
    let mut findings: Vec<String> = VITAL_TRIGGERS
        .iter()
        .filter(|(triggers, _)| triggers.iter().any(|t| lower.contains(t)))
        .map(|(_, finding)| finding.to_string())
        .collect();

    if let Some(reading) = BP_READING.find(transcript) {
        findings.push(format!("Recorded BP: {}", reading.as_str()));
    }

    if findings.is_empty() {
        return NO_FINDINGS.to_string();
    }
    format!("Objective observations and vitals: {}.", findings.join("; "))
}

fn assessment(entities: &EntityCollection) -> String {
    let diagnoses = entities.values(EntityCategory::Diagnosis);
    if diagnoses.is_empty() {
        return ASSESSMENT_PENDING.to_string();
    }
    format!("Primary assessment and clinical impression: {}.", diagnoses.join(", "))
}

fn plan(entities: &EntityCollection) -> String {
    let treatments = entities.values(EntityCategory::Treatment);
    let prognosis = entities.values(EntityCategory::Prognosis);

    let management = if treatments.is_empty() {
        DEFAULT_PLAN.to_string()
    } else {
        format!("Management Plan: {}.", treatments.join(", "))
    };
    let outlook = if prognosis.is_empty() {
        DEFAULT_PROGNOSIS.to_string()
    } else {
        format!("Prognosis is considered {}.", prognosis.join(", "))
    };

    format!("{management} {outlook}")
}
