use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for assessments handed out by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for a question, unique within its template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(pub String);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Assessment domains offered by the built-in catalog. The category also
/// selects the risk-level threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Cybersecurity,
    SocCompliance,
    DataPrivacy,
}

impl TemplateCategory {
    pub const fn label(self) -> &'static str {
        match self {
            TemplateCategory::Cybersecurity => "cybersecurity",
            TemplateCategory::SocCompliance => "soc_compliance",
            TemplateCategory::DataPrivacy => "data_privacy",
        }
    }
}

/// A weighted checklist question. Immutable once the template is defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub kind: QuestionKind,
    pub weight: u32,
}

/// Question kinds mirror the answer controls reviewers see: a yes/no toggle,
/// an ordered option list, or a tested/not-tested control check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Boolean,
    /// Options are authored best-first: index 0 earns full credit, the last
    /// index earns none. Scoring depends on this ordering.
    MultipleChoice { options: Vec<String> },
    Tested,
}

/// Answer to a `Tested` question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestingAnswer {
    Tested,
    NotTested,
}

/// An answer supplied by a reviewer or adopted from an AI finding. Untagged
/// so the wire forms stay plain: `true`, `"tested"`, `"Quarterly"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Boolean(bool),
    Testing(TestingAnswer),
    Choice(String),
}

impl Answer {
    /// Stable textual form used by the classifier haystack.
    pub fn as_text(&self) -> &str {
        match self {
            Answer::Boolean(true) => "true",
            Answer::Boolean(false) => "false",
            Answer::Testing(TestingAnswer::Tested) => "tested",
            Answer::Testing(TestingAnswer::NotTested) => "not_tested",
            Answer::Choice(choice) => choice,
        }
    }

    /// Truthiness as the scorer sees it: `false` and empty strings are the
    /// only falsy answers.
    pub fn is_truthy(&self) -> bool {
        match self {
            Answer::Boolean(value) => *value,
            Answer::Choice(choice) => !choice.is_empty(),
            Answer::Testing(_) => true,
        }
    }
}

/// Document excerpt attached to a question by the analysis service and
/// editable by the reviewer afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceExcerpt {
    pub file_name: String,
    pub quote: String,
    pub relevance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
}

/// One pre-filled result produced by the document-analysis collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiFinding {
    pub question_id: QuestionId,
    pub answer: Answer,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub excerpts: Vec<EvidenceExcerpt>,
}

/// Lifecycle of an assessment from first answer to locked report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Draft,
    InReview,
    Finalized,
}

impl AssessmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AssessmentStatus::Draft => "draft",
            AssessmentStatus::InReview => "in_review",
            AssessmentStatus::Finalized => "finalized",
        }
    }
}
