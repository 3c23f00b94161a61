use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{AiFinding, AssessmentId, AssessmentStatus, TemplateCategory};
use super::review::ReviewLedger;
use super::scoring::RiskScore;

/// Repository record for one assessment: review ledger, score, and status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub template_key: String,
    pub category: TemplateCategory,
    pub status: AssessmentStatus,
    pub started_on: NaiveDate,
    pub review: ReviewLedger,
    pub score: Option<RiskScore>,
}

impl AssessmentRecord {
    /// Sanitized snapshot for API responses.
    pub fn status_view(&self, total_questions: usize) -> AssessmentStatusView {
        AssessmentStatusView {
            assessment_id: self.id.clone(),
            template_key: self.template_key.clone(),
            status: self.status.label(),
            answered: self.review.answered_count(),
            approved: self.review.approved_count(),
            total_questions,
            score: self.score.map(|score| score.score),
            risk_level: self.score.map(|score| score.level.label()),
        }
    }
}

/// Storage abstraction so the service can be exercised in isolation.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError>;
    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError>;
    fn open(&self, limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Document sent to the analysis collaborator. Content lives with the
/// upload pipeline; the service only forwards identifying metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: String,
}

/// Request forwarded to the document-analysis collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub assessment_id: AssessmentId,
    pub template_key: String,
    pub documents: Vec<DocumentUpload>,
}

/// Seam standing in for the hosted document-analysis endpoint. The real
/// transport (HTTP upload, queueing, retries) lives behind this trait.
pub trait DocumentAnalyzer: Send + Sync {
    fn analyze(&self, request: AnalysisRequest) -> Result<Vec<AiFinding>, AnalysisError>;
}

/// Analysis dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("analysis service unavailable: {0}")]
    Unavailable(String),
    #[error("document rejected by analysis service: {0}")]
    Rejected(String),
}

/// Exposed status snapshot for one assessment.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentStatusView {
    pub assessment_id: AssessmentId,
    pub template_key: String,
    pub status: &'static str,
    pub answered: usize,
    pub approved: usize,
    pub total_questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<&'static str>,
}
