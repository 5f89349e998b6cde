//! Patient risk analysis.
//!
//! [`RiskAnalyzer`] turns one patient record into a coarse risk classification plus the evidence
//! behind it: the conditions that matched, the medicines those conditions recommend, and the
//! specialists to refer to. Analysis is pure. It reads the patient and the injected
//! [`KnowledgeBase`], allocates a fresh result, and never fails.
//!
//! ## Scoring
//!
//! | Rule                                                      | Points |
//! |-----------------------------------------------------------|--------|
//! | age over 45                                               | 2      |
//! | condition name found in history or symptoms (direct pass) | 2      |
//! | condition suggested by a symptom phrase (symptom pass)    | 1      |
//!
//! A score of 5 or more is [`RiskLevel::High`], 3 or more [`RiskLevel::Medium`], otherwise
//! [`RiskLevel::Low`].
//!
//! The direct pass runs first. A condition it claims is skipped entirely by the symptom pass,
//! so a patient whose history names "diabetes" and who reports "frequent urination" scores the
//! two direct points only.
//!
//! Medicines are appended per matched condition and are **not** deduplicated; two conditions
//! sharing a medicine list it twice. Specialists are deduplicated, first occurrence wins.

use crate::constants::{
    AGE_POINTS, AGE_THRESHOLD, DIRECT_MATCH_POINTS, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD,
    SYMPTOM_MATCH_POINTS,
};
use crate::knowledge::{Condition, KnowledgeBase, Medicine};
use crate::matcher::{Matcher, SubstringMatcher};
use crate::records::Patient;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;

/// Three-level risk classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classifies a raw risk score.
    pub fn from_score(score: u32) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of analysing one patient.
///
/// Borrows the source patient; serializes as
/// `{ patient, level, conditions, meds, docs }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnalysisResult<'a> {
    pub patient: &'a Patient,
    pub level: RiskLevel,
    pub conditions: Vec<String>,
    pub meds: Vec<Medicine>,
    #[serde(rename = "docs")]
    pub specialists: Vec<String>,
    #[serde(skip)]
    pub score: u32,
}

/// Evidence accumulated during one analysis call.
#[derive(Default)]
struct Findings {
    score: u32,
    conditions: Vec<String>,
    meds: Vec<Medicine>,
    specialists: Vec<String>,
}

impl Findings {
    fn has_condition(&self, name: &str) -> bool {
        self.conditions.iter().any(|c| c == name)
    }

    fn add_condition(&mut self, name: &str) {
        if !self.has_condition(name) {
            self.conditions.push(name.to_string());
        }
    }

    fn add_treatment(&mut self, condition: &Condition) {
        self.meds.extend(condition.medicines.iter().cloned());
        self.specialists
            .extend(condition.specialists.iter().cloned());
    }
}

/// Drops repeated entries, keeping the first occurrence of each.
fn first_seen(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Scores patients against a knowledge base.
///
/// The knowledge base is injected at construction and shared read-only, so one analyzer can be
/// used from many threads at once.
#[derive(Clone, Debug)]
pub struct RiskAnalyzer<M = SubstringMatcher> {
    knowledge: Arc<KnowledgeBase>,
    matcher: M,
}

impl RiskAnalyzer<SubstringMatcher> {
    /// Creates an analyzer with the default case-sensitive substring matcher.
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self::with_matcher(knowledge, SubstringMatcher)
    }
}

impl<M: Matcher> RiskAnalyzer<M> {
    /// Creates an analyzer with an explicit matching strategy.
    pub fn with_matcher(knowledge: Arc<KnowledgeBase>, matcher: M) -> Self {
        Self { knowledge, matcher }
    }

    /// Analyses a single patient.
    pub fn analyze<'a>(&self, patient: &'a Patient) -> AnalysisResult<'a> {
        let mut findings = Findings::default();

        if patient.age.is_some_and(|age| age > AGE_THRESHOLD) {
            findings.score += AGE_POINTS;
        }

        // direct pass
        for condition in self.knowledge.conditions() {
            let named = self.matcher.matches(&patient.history, &condition.name)
                || self.matcher.matches(&patient.symptoms, &condition.name);
            if named {
                findings.add_condition(&condition.name);
                findings.add_treatment(condition);
                findings.score += DIRECT_MATCH_POINTS;
            }
        }

        // symptom pass
        for mapping in self.knowledge.symptom_mappings() {
            if !self.matcher.matches(&patient.symptoms, &mapping.phrase) {
                continue;
            }
            for related in &mapping.conditions {
                if findings.has_condition(related) {
                    continue;
                }
                findings.add_condition(related);
                if let Some(condition) = self.knowledge.condition(related) {
                    findings.add_treatment(condition);
                    findings.score += SYMPTOM_MATCH_POINTS;
                }
            }
        }

        let Findings {
            score,
            conditions,
            meds,
            specialists,
        } = findings;
        let level = RiskLevel::from_score(score);
        tracing::debug!(patient = %patient.id, score, %level, "patient analysed");

        AnalysisResult {
            patient,
            level,
            conditions,
            meds,
            specialists: first_seen(specialists),
            score,
        }
    }

    /// Analyses every patient independently, preserving input order.
    pub fn analyze_all<'a>(&self, patients: &'a [Patient]) -> Vec<AnalysisResult<'a>> {
        patients.par_iter().map(|p| self.analyze(p)).collect()
    }
}
