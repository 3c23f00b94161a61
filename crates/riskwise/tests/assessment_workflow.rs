//! Integration specifications for the assessment intake, analysis, and review
//! workflow.
//!
//! Scenarios focus on end-to-end behavior delivered through the public service
//! facade and HTTP router so we can validate scoring, classification, and
//! routing without reaching into private modules.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;

    use riskwise::workflows::assessment::domain::{
        AiFinding, Answer, AssessmentId, AssessmentStatus, EvidenceExcerpt, QuestionId,
        TestingAnswer,
    };
    use riskwise::workflows::assessment::repository::{
        AnalysisError, AnalysisRequest, AssessmentRecord, AssessmentRepository, DocumentAnalyzer,
        RepositoryError,
    };
    use riskwise::workflows::assessment::AssessmentService;

    pub(super) fn start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).expect("valid date")
    }

    pub(super) fn finding(question_id: &str, answer: Answer, reasoning: &str) -> AiFinding {
        AiFinding {
            question_id: QuestionId(question_id.to_string()),
            answer,
            reasoning: reasoning.to_string(),
            excerpts: vec![EvidenceExcerpt {
                file_name: "soc2-type2-report.pdf".to_string(),
                quote: reasoning.to_string(),
                relevance: "control test evidence".to_string(),
                page_number: Some(7),
            }],
        }
    }

    /// Findings covering every question of the built-in SOC compliance
    /// template, including one exception and one untested control.
    pub(super) fn soc_findings() -> Vec<AiFinding> {
        vec![
            finding(
                "soc-access-reviews",
                Answer::Testing(TestingAnswer::Tested),
                "Quarterly access reviews tested; controls operating effectively.",
            ),
            finding(
                "soc-change-mgmt",
                Answer::Testing(TestingAnswer::Tested),
                "Change approvals tested for a deployment sample; one exception noted.",
            ),
            finding(
                "soc-deprovisioning",
                Answer::Boolean(true),
                "Termination deprovisioning verified against the HR roster.",
            ),
            finding(
                "soc-monitoring",
                Answer::Choice("Continuous automated monitoring".to_string()),
                "SIEM coverage reviewed and alerting validated.",
            ),
            finding(
                "soc-backup-restore",
                Answer::Testing(TestingAnswer::NotTested),
                "Restore procedures were not tested during the review period.",
            ),
            finding(
                "soc-vendor",
                Answer::Testing(TestingAnswer::Tested),
                "Subservice SOC reports reviewed; coverage satisfactory.",
            ),
        ]
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryRepository {
        records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
    }

    impl AssessmentRepository for MemoryRepository {
        fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            if guard.contains_key(&record.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(record.id.clone(), record.clone());
            Ok(record)
        }

        fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            guard.insert(record.id.clone(), record);
            Ok(())
        }

        fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
            Ok(guard.get(id).cloned())
        }

        fn open(&self, limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
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
        findings: Arc<Mutex<Vec<AiFinding>>>,
    }

    impl CannedAnalyzer {
        pub(super) fn with_findings(findings: Vec<AiFinding>) -> Self {
            Self {
                findings: Arc::new(Mutex::new(findings)),
            }
        }
    }

    impl DocumentAnalyzer for CannedAnalyzer {
        fn analyze(&self, _request: AnalysisRequest) -> Result<Vec<AiFinding>, AnalysisError> {
            Ok(self.findings.lock().expect("lock").clone())
        }
    }

    pub(super) fn build_service() -> (
        AssessmentService<MemoryRepository, CannedAnalyzer>,
        Arc<MemoryRepository>,
    ) {
        let repository = Arc::new(MemoryRepository::default());
        let analyzer = Arc::new(CannedAnalyzer::with_findings(soc_findings()));
        let service = AssessmentService::new(repository.clone(), analyzer);
        (service, repository)
    }
}

mod evaluation {
    use super::common::*;
    use riskwise::workflows::assessment::{
        Answer, AssessmentStatus, ControlResult, DocumentUpload, QuestionId, RiskLevel,
        TestingStatus,
    };

    #[test]
    fn analysis_classifies_and_scores_the_assessment() {
        let (service, _) = build_service();
        let record = service
            .start("soc_compliance", start_date())
            .expect("start succeeds");

        let documents = vec![DocumentUpload {
            file_name: "soc2-type2-report.pdf".to_string(),
            content_type: "application/pdf".to_string(),
        }];
        let summary = service
            .request_analysis(&record.id, documents)
            .expect("analysis succeeds");

        assert_eq!(summary.classified, 6);
        assert_eq!(summary.tested, 5);
        assert_eq!(summary.untested, 1);
        assert_eq!(summary.exceptions, 1);
        assert_eq!(summary.non_operational, 0);
        assert!(summary.score.is_some());

        let stored = service.get(&record.id).expect("fetch");
        assert_eq!(stored.status, AssessmentStatus::InReview);

        let exception_state = stored
            .review
            .state(&QuestionId("soc-change-mgmt".to_string()))
            .expect("state exists");
        let classification = exception_state.classification.expect("classified");
        assert_eq!(classification.status, TestingStatus::Tested);
        assert_eq!(classification.result, Some(ControlResult::Exception));

        let untested_state = stored
            .review
            .state(&QuestionId("soc-backup-restore".to_string()))
            .expect("state exists");
        let classification = untested_state.classification.expect("classified");
        assert_eq!(classification.status, TestingStatus::Untested);
        assert!(classification.result.is_none());
    }

    #[test]
    fn soc_category_uses_the_stricter_threshold_table() {
        let (service, _) = build_service();
        let record = service
            .start("soc_compliance", start_date())
            .expect("start succeeds");
        service
            .request_analysis(&record.id, Vec::new())
            .expect("analysis succeeds");

        // max = 10 + 9 + 8 + 7 * 4 + 7 + 6 = 68; the not-tested restore
        // control forfeits its 7 points, so total = 61 and score = 90.
        let score = service.score(&record.id).expect("score");
        assert_eq!(score.score, 90);
        assert_eq!(score.level, RiskLevel::Low);
    }

    #[test]
    fn reviewer_edits_change_the_score() {
        let (service, _) = build_service();
        let record = service
            .start("soc_compliance", start_date())
            .expect("start succeeds");
        service
            .request_analysis(&record.id, Vec::new())
            .expect("analysis succeeds");

        let before = service.score(&record.id).expect("score");
        let updated = service
            .record_answer(
                &record.id,
                &QuestionId("soc-monitoring".to_string()),
                Answer::Choice("No monitoring".to_string()),
            )
            .expect("answer recorded");
        let after = updated.score.expect("score recomputed");

        assert!(after.score < before.score);
    }
}

mod review {
    use super::common::*;
    use riskwise::workflows::assessment::{
        AssessmentServiceError, AssessmentStatus, ControlResult, ControlTestStatus, QuestionId,
    };

    #[test]
    fn finalize_is_blocked_until_every_question_is_approved() {
        let (service, repository) = build_service();
        let record = service
            .start("soc_compliance", start_date())
            .expect("start succeeds");
        service
            .request_analysis(&record.id, Vec::new())
            .expect("analysis succeeds");

        match service.finalize(&record.id) {
            Err(AssessmentServiceError::IncompleteReview {
                answered,
                approved,
                total,
            }) => {
                assert_eq!(answered, 6);
                assert_eq!(approved, 0);
                assert_eq!(total, 6);
            }
            other => panic!("expected incomplete review error, got {other:?}"),
        }

        let question_ids = service
            .catalog()
            .find("soc_compliance")
            .expect("template exists")
            .question_ids();
        for question_id in &question_ids {
            service
                .approve(&record.id, question_id)
                .expect("approval succeeds");
        }

        let finalized = service.finalize(&record.id).expect("finalize succeeds");
        assert_eq!(finalized.status, AssessmentStatus::Finalized);

        use riskwise::workflows::assessment::AssessmentRepository;
        assert!(repository.open(10).expect("open query").is_empty());
    }

    #[test]
    fn status_override_reopens_the_question_for_approval() {
        let (service, _) = build_service();
        let record = service
            .start("soc_compliance", start_date())
            .expect("start succeeds");
        service
            .request_analysis(&record.id, Vec::new())
            .expect("analysis succeeds");

        let question = QuestionId("soc-access-reviews".to_string());
        service
            .approve(&record.id, &question)
            .expect("approval succeeds");

        let updated = service
            .override_status(
                &record.id,
                &question,
                ControlTestStatus::tested(ControlResult::Exception),
            )
            .expect("override succeeds");

        let state = updated.review.state(&question).expect("state exists");
        assert!(!state.approved);
        assert_eq!(
            state.classification,
            Some(ControlTestStatus::tested(ControlResult::Exception))
        );
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use riskwise::workflows::assessment::{assessment_router, AssessmentService};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn build_router() -> axum::Router {
        let repository = Arc::new(MemoryRepository::default());
        let analyzer = Arc::new(CannedAnalyzer::with_findings(soc_findings()));
        let service = Arc::new(AssessmentService::new(repository, analyzer));
        assessment_router(service)
    }

    #[tokio::test]
    async fn full_review_cycle_over_http() {
        let router = build_router();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/assessments")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&json!({
                            "template_key": "soc_compliance",
                            "started_on": "2026-08-01",
                        }))
                        .expect("serialize request"),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        let assessment_id = payload
            .get("assessment_id")
            .and_then(Value::as_str)
            .expect("assessment id")
            .to_string();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/assessments/{assessment_id}/analysis"))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&json!({ "findings": soc_findings() }))
                            .expect("serialize findings"),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let summary: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(summary.get("classified"), Some(&json!(6)));
        assert_eq!(summary.get("untested"), Some(&json!(1)));

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/v1/assessments/{assessment_id}/score"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload.get("score"), Some(&json!(90)));
        assert_eq!(payload.get("risk_level"), Some(&json!("Low")));

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/v1/assessments/{assessment_id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload.get("status"), Some(&json!("in_review")));
        assert_eq!(payload.get("answered"), Some(&json!(6)));
    }

    #[tokio::test]
    async fn unknown_assessment_routes_return_not_found() {
        let router = build_router();

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/assessments/asmt-999999")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
