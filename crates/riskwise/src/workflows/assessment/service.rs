use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::classifier::{ControlTestStatus, SocStatusClassifier, TestingStatus};
use super::domain::{AiFinding, Answer, AssessmentId, AssessmentStatus, QuestionId};
use super::repository::{
    AnalysisError, AnalysisRequest, AssessmentRecord, AssessmentRepository, AssessmentStatusView,
    DocumentAnalyzer, DocumentUpload, RepositoryError,
};
use super::review::{ReviewEvent, ReviewLedger};
use super::scoring::{score_answers, RiskScore};
use super::templates::{AssessmentTemplate, TemplateCatalog};

/// Service composing the template catalog, scorer, classifier, and review
/// ledger behind the repository and analyzer seams.
pub struct AssessmentService<R, A> {
    catalog: Arc<TemplateCatalog>,
    classifier: Arc<SocStatusClassifier>,
    repository: Arc<R>,
    analyzer: Arc<A>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asmt-{id:06}"))
}

impl<R, A> AssessmentService<R, A>
where
    R: AssessmentRepository + 'static,
    A: DocumentAnalyzer + 'static,
{
    pub fn new(repository: Arc<R>, analyzer: Arc<A>) -> Self {
        Self::with_parts(
            Arc::new(TemplateCatalog::standard()),
            Arc::new(SocStatusClassifier::default()),
            repository,
            analyzer,
        )
    }

    pub fn with_parts(
        catalog: Arc<TemplateCatalog>,
        classifier: Arc<SocStatusClassifier>,
        repository: Arc<R>,
        analyzer: Arc<A>,
    ) -> Self {
        Self {
            catalog,
            classifier,
            repository,
            analyzer,
        }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Start a fresh assessment from a catalog template.
    pub fn start(
        &self,
        template_key: &str,
        started_on: NaiveDate,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let template = self.template(template_key)?;

        let record = AssessmentRecord {
            id: next_assessment_id(),
            template_key: template.key.to_string(),
            category: template.category,
            status: AssessmentStatus::Draft,
            started_on,
            review: ReviewLedger::default(),
            score: None,
        };

        Ok(self.repository.insert(record)?)
    }

    /// Record a reviewer's answer and recompute the score.
    pub fn record_answer(
        &self,
        id: &AssessmentId,
        question_id: &QuestionId,
        answer: Answer,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let mut record = self.writable(id)?;
        let template = self.template(&record.template_key)?;
        self.require_question(template, question_id)?;

        record.review.apply(ReviewEvent::AnswerEdited {
            question_id: question_id.clone(),
            answer,
        });
        // The repository write below is the save.
        record.review.apply(ReviewEvent::Saved {
            question_id: question_id.clone(),
        });
        rescore(&mut record, template);

        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Replace a question's evidence excerpts, clearing its approval.
    pub fn edit_evidence(
        &self,
        id: &AssessmentId,
        question_id: &QuestionId,
        excerpts: Vec<super::domain::EvidenceExcerpt>,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let mut record = self.writable(id)?;
        let template = self.template(&record.template_key)?;
        self.require_question(template, question_id)?;

        record.review.apply(ReviewEvent::EvidenceEdited {
            question_id: question_id.clone(),
            excerpts,
        });
        record.review.apply(ReviewEvent::Saved {
            question_id: question_id.clone(),
        });

        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Apply a batch of AI findings: classify each one, adopt its answer
    /// and evidence, and move the assessment into review.
    pub fn apply_findings(
        &self,
        id: &AssessmentId,
        findings: Vec<AiFinding>,
    ) -> Result<AnalysisSummary, AssessmentServiceError> {
        let mut record = self.writable(id)?;
        let template = self.template(&record.template_key)?;

        let mut summary = AnalysisSummary::default();
        for finding in findings {
            if template.question(&finding.question_id).is_none() {
                summary.skipped += 1;
                continue;
            }

            let classification =
                self.classifier
                    .classify(&finding.answer, &finding.reasoning, &finding.excerpts);
            summary.tally(&classification);
            record.review.apply(ReviewEvent::FindingApplied {
                finding,
                classification,
            });
        }

        record.status = AssessmentStatus::InReview;
        rescore(&mut record, template);
        self.repository.update(record.clone())?;

        summary.score = record.score;
        Ok(summary)
    }

    /// Forward documents to the analysis collaborator and apply whatever
    /// findings come back.
    pub fn request_analysis(
        &self,
        id: &AssessmentId,
        documents: Vec<DocumentUpload>,
    ) -> Result<AnalysisSummary, AssessmentServiceError> {
        let record = self.writable(id)?;
        let findings = self.analyzer.analyze(AnalysisRequest {
            assessment_id: record.id.clone(),
            template_key: record.template_key.clone(),
            documents,
        })?;

        self.apply_findings(id, findings)
    }

    /// Approve one question's current answer and evidence.
    pub fn approve(
        &self,
        id: &AssessmentId,
        question_id: &QuestionId,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let mut record = self.writable(id)?;
        let template = self.template(&record.template_key)?;
        self.require_question(template, question_id)?;

        record.review.apply(ReviewEvent::Approved {
            question_id: question_id.clone(),
        });

        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Reviewer override of the derived testing status. Clears approval so
    /// the override itself gets re-reviewed.
    pub fn override_status(
        &self,
        id: &AssessmentId,
        question_id: &QuestionId,
        classification: ControlTestStatus,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let mut record = self.writable(id)?;
        let template = self.template(&record.template_key)?;
        self.require_question(template, question_id)?;

        record.review.apply(ReviewEvent::StatusOverridden {
            question_id: question_id.clone(),
            classification,
        });
        record.review.apply(ReviewEvent::Saved {
            question_id: question_id.clone(),
        });

        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Lock the assessment. Requires every template question answered and
    /// approved.
    pub fn finalize(&self, id: &AssessmentId) -> Result<AssessmentRecord, AssessmentServiceError> {
        let mut record = self.writable(id)?;
        let template = self.template(&record.template_key)?;

        let question_ids = template.question_ids();
        if !record.review.all_approved(&question_ids) {
            return Err(AssessmentServiceError::IncompleteReview {
                answered: record.review.answered_count(),
                approved: record.review.approved_count(),
                total: question_ids.len(),
            });
        }

        record.status = AssessmentStatus::Finalized;
        rescore(&mut record, template);
        self.repository.update(record.clone())?;
        Ok(record)
    }

    pub fn get(&self, id: &AssessmentId) -> Result<AssessmentRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Score the assessment's current answers. Always succeeds for a known
    /// assessment; unanswered questions simply earn no credit.
    pub fn score(&self, id: &AssessmentId) -> Result<RiskScore, AssessmentServiceError> {
        let record = self.get(id)?;
        let template = self.template(&record.template_key)?;
        let answers = record.review.answers();
        Ok(score_answers(&template.questions, &answers, record.category))
    }

    pub fn status_view(&self, record: &AssessmentRecord) -> AssessmentStatusView {
        let total = self
            .catalog
            .find(&record.template_key)
            .map(|template| template.questions.len())
            .unwrap_or(0);
        record.status_view(total)
    }

    fn template(&self, key: &str) -> Result<&AssessmentTemplate, AssessmentServiceError> {
        self.catalog
            .find(key)
            .ok_or_else(|| AssessmentServiceError::UnknownTemplate(key.to_string()))
    }

    fn require_question(
        &self,
        template: &AssessmentTemplate,
        question_id: &QuestionId,
    ) -> Result<(), AssessmentServiceError> {
        if template.question(question_id).is_none() {
            return Err(AssessmentServiceError::UnknownQuestion(question_id.clone()));
        }
        Ok(())
    }

    fn writable(&self, id: &AssessmentId) -> Result<AssessmentRecord, AssessmentServiceError> {
        let record = self.get(id)?;
        if record.status == AssessmentStatus::Finalized {
            return Err(AssessmentServiceError::AssessmentFinalized(record.id));
        }
        Ok(record)
    }
}

fn rescore(record: &mut AssessmentRecord, template: &AssessmentTemplate) {
    let answers = record.review.answers();
    record.score = Some(score_answers(&template.questions, &answers, record.category));
}

/// Outcome counts from one batch of applied findings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub classified: usize,
    pub tested: usize,
    pub untested: usize,
    pub exceptions: usize,
    pub non_operational: usize,
    pub skipped: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<RiskScore>,
}

impl AnalysisSummary {
    fn tally(&mut self, classification: &ControlTestStatus) {
        self.classified += 1;
        match classification.status {
            TestingStatus::Tested => self.tested += 1,
            TestingStatus::Untested => self.untested += 1,
        }
        match classification.result {
            Some(super::classifier::ControlResult::Exception) => self.exceptions += 1,
            Some(super::classifier::ControlResult::NonOperational) => self.non_operational += 1,
            _ => {}
        }
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("unknown assessment template '{0}'")]
    UnknownTemplate(String),
    #[error("question '{0}' is not part of this template")]
    UnknownQuestion(QuestionId),
    #[error("assessment '{0}' is finalized and read-only")]
    AssessmentFinalized(AssessmentId),
    #[error("cannot finalize: {answered} answered, {approved} approved of {total} questions")]
    IncompleteReview {
        answered: usize,
        approved: usize,
        total: usize,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}
