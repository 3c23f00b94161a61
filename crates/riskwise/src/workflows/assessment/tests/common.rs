use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::workflows::assessment::classifier::SocStatusClassifier;
use crate::workflows::assessment::domain::{
    AiFinding, Answer, AssessmentId, AssessmentStatus, EvidenceExcerpt, Question, QuestionId,
    QuestionKind, TestingAnswer,
};
use crate::workflows::assessment::repository::{
    AnalysisError, AnalysisRequest, AssessmentRecord, AssessmentRepository, DocumentAnalyzer,
    RepositoryError,
};
use crate::workflows::assessment::{assessment_router, AssessmentService};

pub(super) fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 1).expect("valid date")
}

pub(super) fn boolean_question(id: &str, weight: u32) -> Question {
    Question {
        id: QuestionId(id.to_string()),
        text: format!("boolean question {id}"),
        kind: QuestionKind::Boolean,
        weight,
    }
}

pub(super) fn tested_question(id: &str, weight: u32) -> Question {
    Question {
        id: QuestionId(id.to_string()),
        text: format!("tested question {id}"),
        kind: QuestionKind::Tested,
        weight,
    }
}

pub(super) fn choice_question(id: &str, weight: u32, options: &[&str]) -> Question {
    Question {
        id: QuestionId(id.to_string()),
        text: format!("choice question {id}"),
        kind: QuestionKind::MultipleChoice {
            options: options.iter().map(|option| (*option).to_string()).collect(),
        },
        weight,
    }
}

pub(super) fn answers(entries: &[(&str, Answer)]) -> BTreeMap<QuestionId, Answer> {
    entries
        .iter()
        .map(|(id, answer)| (QuestionId((*id).to_string()), answer.clone()))
        .collect()
}

pub(super) fn excerpt(quote: &str) -> EvidenceExcerpt {
    EvidenceExcerpt {
        file_name: "soc2-report.pdf".to_string(),
        quote: quote.to_string(),
        relevance: "control evidence".to_string(),
        page_number: Some(12),
    }
}

pub(super) fn finding(question_id: &str, answer: Answer, reasoning: &str) -> AiFinding {
    AiFinding {
        question_id: QuestionId(question_id.to_string()),
        answer,
        reasoning: reasoning.to_string(),
        excerpts: Vec::new(),
    }
}

/// Findings covering every question of the built-in cybersecurity template.
pub(super) fn cybersecurity_findings() -> Vec<AiFinding> {
    vec![
        finding(
            "cyber-governance",
            Answer::Boolean(true),
            "Policy was reviewed and approved by the board in March.",
        ),
        finding(
            "cyber-mfa",
            Answer::Boolean(true),
            "MFA enforcement verified across VPN and admin consoles.",
        ),
        finding(
            "cyber-patching",
            Answer::Choice("Within 30 days".to_string()),
            "Patch records audited for the trailing quarter.",
        ),
        finding(
            "cyber-incident",
            Answer::Boolean(true),
            "Tabletop exercise evaluated in June; one gap noted in paging.",
        ),
        finding(
            "cyber-pentest",
            Answer::Testing(TestingAnswer::Tested),
            "External penetration test performed and remediation confirmed.",
        ),
        finding(
            "cyber-backup",
            Answer::Choice("Daily with offsite copies".to_string()),
            "Backup restore was tested monthly per runbook.",
        ),
    ]
}

pub(super) fn classifier() -> SocStatusClassifier {
    SocStatusClassifier::default()
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn open(&self, limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.status != AssessmentStatus::Finalized)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct CannedAnalyzer {
    pub(super) findings: Arc<Mutex<Vec<AiFinding>>>,
    pub(super) requests: Arc<Mutex<Vec<AnalysisRequest>>>,
}

impl CannedAnalyzer {
    pub(super) fn with_findings(findings: Vec<AiFinding>) -> Self {
        Self {
            findings: Arc::new(Mutex::new(findings)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(super) fn requests(&self) -> Vec<AnalysisRequest> {
        self.requests.lock().expect("analyzer mutex poisoned").clone()
    }
}

impl DocumentAnalyzer for CannedAnalyzer {
    fn analyze(&self, request: AnalysisRequest) -> Result<Vec<AiFinding>, AnalysisError> {
        self.requests
            .lock()
            .expect("analyzer mutex poisoned")
            .push(request);
        Ok(self.findings.lock().expect("analyzer mutex poisoned").clone())
    }
}

pub(super) struct FailingAnalyzer;

impl DocumentAnalyzer for FailingAnalyzer {
    fn analyze(&self, _request: AnalysisRequest) -> Result<Vec<AiFinding>, AnalysisError> {
        Err(AnalysisError::Unavailable("analysis backend offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    AssessmentService<MemoryRepository, CannedAnalyzer>,
    Arc<MemoryRepository>,
    Arc<CannedAnalyzer>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let analyzer = Arc::new(CannedAnalyzer::with_findings(cybersecurity_findings()));
    let service = AssessmentService::new(repository.clone(), analyzer.clone());
    (service, repository, analyzer)
}

pub(super) fn assessment_router_with_service(
    service: AssessmentService<MemoryRepository, CannedAnalyzer>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json body")
}
