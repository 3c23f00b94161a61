use serde::{Deserialize, Serialize};

use super::domain::{Answer, EvidenceExcerpt};

/// Whether the evidence shows the control was exercised during the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestingStatus {
    #[serde(rename = "tested")]
    Tested,
    #[serde(rename = "un-tested")]
    Untested,
}

impl TestingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TestingStatus::Tested => "tested",
            TestingStatus::Untested => "un-tested",
        }
    }
}

/// Outcome of a tested control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlResult {
    Operational,
    Exception,
    NonOperational,
}

impl ControlResult {
    pub const fn label(self) -> &'static str {
        match self {
            ControlResult::Operational => "operational",
            ControlResult::Exception => "exception",
            ControlResult::NonOperational => "non-operational",
        }
    }
}

/// Derived testing status for one question. `result` is present only when
/// the control was tested; the reviewer can override both fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlTestStatus {
    pub status: TestingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ControlResult>,
}

impl ControlTestStatus {
    pub const fn untested() -> Self {
        Self {
            status: TestingStatus::Untested,
            result: None,
        }
    }

    pub const fn tested(result: ControlResult) -> Self {
        Self {
            status: TestingStatus::Tested,
            result: Some(result),
        }
    }
}

/// Phrase lists driving the keyword scan. Plain data so deployments can
/// tune the vocabulary without touching the classifier itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierVocabulary {
    pub untested_phrases: Vec<String>,
    pub tested_phrases: Vec<String>,
    pub non_operational_phrases: Vec<String>,
    pub exception_phrases: Vec<String>,
    pub operational_phrases: Vec<String>,
}

impl Default for ClassifierVocabulary {
    fn default() -> Self {
        fn phrases(list: &[&str]) -> Vec<String> {
            list.iter().map(|phrase| (*phrase).to_string()).collect()
        }

        Self {
            untested_phrases: phrases(&[
                "not tested",
                "untested",
                "no testing",
                "not verified",
                "not validated",
                "not audited",
                "not reviewed",
                "not assessed",
                "not evaluated",
                "not monitored",
                "not checked",
            ]),
            tested_phrases: phrases(&[
                "tested",
                "testing",
                "test",
                "verified",
                "validated",
                "audited",
                "reviewed",
                "assessed",
                "evaluated",
                "monitored",
                "checked",
            ]),
            non_operational_phrases: phrases(&[
                "non-operational",
                "not operational",
                "not operating",
                "inoperative",
                "ineffective",
                "failed",
                "failure",
            ]),
            exception_phrases: phrases(&[
                "exception",
                "deficiency",
                "weakness",
                "gap",
                "issue",
                "problem",
                "concern",
                "finding",
            ]),
            operational_phrases: phrases(&[
                "operational",
                "operating effectively",
                "effective",
                "no exceptions",
                "without exception",
                "satisfactory",
                "compliant",
                "passed",
            ]),
        }
    }
}

/// Fixed-vocabulary keyword scanner over answer text, reasoning, and
/// excerpt quotes. Deliberately crude: substring matching, no NLP. Every
/// classification remains editable downstream, so results are advisory.
#[derive(Debug, Clone, Default)]
pub struct SocStatusClassifier {
    vocabulary: ClassifierVocabulary,
}

impl SocStatusClassifier {
    pub fn new(vocabulary: ClassifierVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &ClassifierVocabulary {
        &self.vocabulary
    }

    /// Classify one question's evidence.
    ///
    /// Precedence is load-bearing: negated phrases are scanned before the
    /// tested list (so "not tested" never matches via its "tested"
    /// substring), operational phrases that embed an exception word
    /// ("no exceptions") are scanned before the exception list, and
    /// non-operational beats exception beats operational.
    pub fn classify(
        &self,
        answer: &Answer,
        reasoning: &str,
        excerpts: &[EvidenceExcerpt],
    ) -> ControlTestStatus {
        let haystack = build_haystack(answer, reasoning, excerpts);
        let contains_any =
            |phrases: &[String]| phrases.iter().any(|phrase| haystack.contains(phrase.as_str()));

        if contains_any(&self.vocabulary.untested_phrases) {
            return ControlTestStatus::untested();
        }

        if !contains_any(&self.vocabulary.tested_phrases) {
            return ControlTestStatus::untested();
        }

        let affirmative = matches!(answer.as_text().to_ascii_lowercase().as_str(), "yes" | "true");
        // Clean-opinion wording ("no exceptions noted") embeds an exception
        // word; scan it first so it never matches via that substring.
        let clean_opinion = self.vocabulary.operational_phrases.iter().any(|phrase| {
            haystack.contains(phrase.as_str())
                && self
                    .vocabulary
                    .exception_phrases
                    .iter()
                    .any(|exception| phrase.contains(exception.as_str()))
        });
        let signalled = if contains_any(&self.vocabulary.non_operational_phrases) {
            Some(ControlResult::NonOperational)
        } else if clean_opinion {
            Some(ControlResult::Operational)
        } else if contains_any(&self.vocabulary.exception_phrases) {
            Some(ControlResult::Exception)
        } else if contains_any(&self.vocabulary.operational_phrases) || affirmative {
            Some(ControlResult::Operational)
        } else {
            None
        };

        // Tested with no outcome signal resolves to operational: silence is
        // not treated as an exception.
        ControlTestStatus::tested(signalled.unwrap_or(ControlResult::Operational))
    }
}

fn build_haystack(answer: &Answer, reasoning: &str, excerpts: &[EvidenceExcerpt]) -> String {
    let mut parts = Vec::with_capacity(2 + excerpts.len());
    parts.push(answer.as_text().to_string());
    parts.push(reasoning.to_string());
    for excerpt in excerpts {
        parts.push(excerpt.quote.clone());
    }
    parts.join(" ").to_lowercase()
}
