//! Risk/compliance self-assessment workflow: weighted answer scoring, the
//! SOC testing-status classifier, and the per-question review ledger that
//! tracks answers, evidence, and approvals through finalization.

pub mod classifier;
pub mod domain;
pub mod importer;
pub mod repository;
pub mod review;
pub mod router;
pub mod scoring;
pub mod service;
pub mod templates;

#[cfg(test)]
mod tests;

pub use classifier::{
    ClassifierVocabulary, ControlResult, ControlTestStatus, SocStatusClassifier, TestingStatus,
};
pub use domain::{
    AiFinding, Answer, AssessmentId, AssessmentStatus, EvidenceExcerpt, Question, QuestionId,
    QuestionKind, TemplateCategory, TestingAnswer,
};
pub use importer::{AnswerCsvImporter, AnswerImportError};
pub use repository::{
    AnalysisError, AnalysisRequest, AssessmentRecord, AssessmentRepository, AssessmentStatusView,
    DocumentAnalyzer, DocumentUpload, RepositoryError,
};
pub use review::{QuestionReviewState, ReviewEvent, ReviewLedger};
pub use router::assessment_router;
pub use scoring::{risk_level, score_answers, RiskLevel, RiskScore};
pub use service::{AnalysisSummary, AssessmentService, AssessmentServiceError};
pub use templates::{AssessmentTemplate, TemplateCatalog};
