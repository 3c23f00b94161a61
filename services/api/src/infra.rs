use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use riskwise::workflows::assessment::{
    AiFinding, AnalysisError, AnalysisRequest, Answer, AssessmentId, AssessmentRecord,
    AssessmentRepository, AssessmentStatus, DocumentAnalyzer, EvidenceExcerpt, QuestionId,
    RepositoryError, TestingAnswer,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
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
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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

/// Placeholder analyzer for deployments without a document-analysis
/// backend. Findings can still be posted directly to the analysis route.
pub(crate) struct OfflineDocumentAnalyzer;

impl DocumentAnalyzer for OfflineDocumentAnalyzer {
    fn analyze(&self, _request: AnalysisRequest) -> Result<Vec<AiFinding>, AnalysisError> {
        Err(AnalysisError::Unavailable(
            "no document-analysis backend configured".to_string(),
        ))
    }
}

/// Analyzer returning a fixed batch of findings, used by the CLI demo.
pub(crate) struct CannedDocumentAnalyzer {
    findings: Vec<AiFinding>,
}

impl CannedDocumentAnalyzer {
    pub(crate) fn new(findings: Vec<AiFinding>) -> Self {
        Self { findings }
    }
}

impl DocumentAnalyzer for CannedDocumentAnalyzer {
    fn analyze(&self, _request: AnalysisRequest) -> Result<Vec<AiFinding>, AnalysisError> {
        Ok(self.findings.clone())
    }
}

/// Findings covering the built-in SOC compliance template, phrased the way
/// the hosted analysis service reports control evidence.
pub(crate) fn demo_soc_findings() -> Vec<AiFinding> {
    fn finding(
        question_id: &str,
        answer: Answer,
        reasoning: &str,
        quote: &str,
        page: u32,
    ) -> AiFinding {
        AiFinding {
            question_id: QuestionId(question_id.to_string()),
            answer,
            reasoning: reasoning.to_string(),
            excerpts: vec![EvidenceExcerpt {
                file_name: "soc2-type2-report.pdf".to_string(),
                quote: quote.to_string(),
                relevance: "control test evidence".to_string(),
                page_number: Some(page),
            }],
        }
    }

    vec![
        finding(
            "soc-access-reviews",
            Answer::Testing(TestingAnswer::Tested),
            "Quarterly access reviews tested across all in-scope systems with no exceptions noted.",
            "Inspected Q1-Q4 access review sign-offs; controls operating effectively.",
            34,
        ),
        finding(
            "soc-change-mgmt",
            Answer::Testing(TestingAnswer::Tested),
            "Change approvals tested for a sample of 25 production deployments; one exception noted.",
            "One of 25 sampled changes lacked documented approval prior to deployment.",
            41,
        ),
        finding(
            "soc-deprovisioning",
            Answer::Boolean(true),
            "Termination deprovisioning verified against HR roster; access removed same day.",
            "All 12 sampled terminations were deprovisioned within one business day.",
            47,
        ),
        finding(
            "soc-monitoring",
            Answer::Choice("Continuous automated monitoring".to_string()),
            "SIEM coverage reviewed; alerting validated against in-scope hosts.",
            "Security events are aggregated and alerted on continuously via the SIEM.",
            52,
        ),
        finding(
            "soc-backup-restore",
            Answer::Testing(TestingAnswer::NotTested),
            "Restore procedures were not tested during the review period.",
            "No restoration test evidence was provided for the period under review.",
            58,
        ),
        finding(
            "soc-vendor",
            Answer::Testing(TestingAnswer::Tested),
            "Subservice SOC reports reviewed; complementary controls mapped and satisfactory.",
            "Bridge letters and SOC reports were obtained for all subservice organizations.",
            63,
        ),
    ]
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
