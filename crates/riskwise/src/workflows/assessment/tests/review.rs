use super::common::*;
use crate::workflows::assessment::classifier::{ControlResult, ControlTestStatus};
use crate::workflows::assessment::domain::{Answer, QuestionId};
use crate::workflows::assessment::review::{ReviewEvent, ReviewLedger};

fn question_id(id: &str) -> QuestionId {
    QuestionId(id.to_string())
}

#[test]
fn answer_edit_creates_state_and_marks_unsaved() {
    let mut ledger = ReviewLedger::default();
    ledger.apply(ReviewEvent::AnswerEdited {
        question_id: question_id("q1"),
        answer: Answer::Boolean(true),
    });

    let state = ledger.state(&question_id("q1")).expect("state exists");
    assert_eq!(state.answer, Some(Answer::Boolean(true)));
    assert!(state.unsaved);
    assert!(!state.approved);
}

#[test]
fn any_edit_clears_a_prior_approval() {
    let mut ledger = ReviewLedger::default();
    let id = question_id("q1");

    ledger.apply(ReviewEvent::AnswerEdited {
        question_id: id.clone(),
        answer: Answer::Boolean(true),
    });
    ledger.apply(ReviewEvent::Approved {
        question_id: id.clone(),
    });
    assert!(ledger.state(&id).expect("state").approved);

    ledger.apply(ReviewEvent::EvidenceEdited {
        question_id: id.clone(),
        excerpts: vec![excerpt("restore drill log")],
    });
    assert!(!ledger.state(&id).expect("state").approved);
    assert!(ledger.state(&id).expect("state").unsaved);
}

#[test]
fn status_override_clears_approval_too() {
    let mut ledger = ReviewLedger::default();
    let id = question_id("q1");

    ledger.apply(ReviewEvent::AnswerEdited {
        question_id: id.clone(),
        answer: Answer::Boolean(true),
    });
    ledger.apply(ReviewEvent::Approved {
        question_id: id.clone(),
    });

    ledger.apply(ReviewEvent::StatusOverridden {
        question_id: id.clone(),
        classification: ControlTestStatus::tested(ControlResult::Exception),
    });

    let state = ledger.state(&id).expect("state");
    assert!(!state.approved);
    assert_eq!(
        state.classification,
        Some(ControlTestStatus::tested(ControlResult::Exception))
    );
}

#[test]
fn applied_finding_lands_answer_reasoning_evidence_and_classification() {
    let mut ledger = ReviewLedger::default();
    let mut applied = finding(
        "q1",
        Answer::Boolean(true),
        "Access reviews tested with no exceptions noted.",
    );
    applied.excerpts = vec![excerpt("quarterly access review sign-off")];

    ledger.apply(ReviewEvent::FindingApplied {
        finding: applied,
        classification: ControlTestStatus::tested(ControlResult::Operational),
    });

    let state = ledger.state(&question_id("q1")).expect("state");
    assert_eq!(state.answer, Some(Answer::Boolean(true)));
    assert_eq!(
        state.reasoning.as_deref(),
        Some("Access reviews tested with no exceptions noted.")
    );
    assert_eq!(state.excerpts.len(), 1);
    assert_eq!(
        state.classification,
        Some(ControlTestStatus::tested(ControlResult::Operational))
    );
    assert!(state.unsaved);
    assert!(!state.approved);
}

#[test]
fn save_clears_unsaved_without_touching_approval() {
    let mut ledger = ReviewLedger::default();
    let id = question_id("q1");

    ledger.apply(ReviewEvent::AnswerEdited {
        question_id: id.clone(),
        answer: Answer::Boolean(false),
    });
    ledger.apply(ReviewEvent::Approved {
        question_id: id.clone(),
    });
    ledger.apply(ReviewEvent::Saved {
        question_id: id.clone(),
    });

    let state = ledger.state(&id).expect("state");
    assert!(!state.unsaved);
    assert!(state.approved);
}

#[test]
fn approval_and_save_ignore_unknown_questions() {
    let mut ledger = ReviewLedger::default();
    ledger.apply(ReviewEvent::Approved {
        question_id: question_id("ghost"),
    });
    ledger.apply(ReviewEvent::Saved {
        question_id: question_id("ghost"),
    });
    assert!(ledger.state(&question_id("ghost")).is_none());
}

#[test]
fn answers_snapshot_skips_unanswered_questions() {
    let mut ledger = ReviewLedger::default();
    ledger.apply(ReviewEvent::AnswerEdited {
        question_id: question_id("q1"),
        answer: Answer::Choice("Weekly".to_string()),
    });
    ledger.apply(ReviewEvent::EvidenceEdited {
        question_id: question_id("q2"),
        excerpts: vec![excerpt("evidence without an answer")],
    });

    let snapshot = ledger.answers();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(
        snapshot.get(&question_id("q1")),
        Some(&Answer::Choice("Weekly".to_string()))
    );
    assert_eq!(ledger.answered_count(), 1);
}

#[test]
fn all_approved_requires_answer_and_approval_per_question() {
    let mut ledger = ReviewLedger::default();
    let ids = vec![question_id("q1"), question_id("q2")];

    ledger.apply(ReviewEvent::AnswerEdited {
        question_id: question_id("q1"),
        answer: Answer::Boolean(true),
    });
    ledger.apply(ReviewEvent::Approved {
        question_id: question_id("q1"),
    });
    assert!(!ledger.all_approved(&ids));

    ledger.apply(ReviewEvent::AnswerEdited {
        question_id: question_id("q2"),
        answer: Answer::Boolean(false),
    });
    assert!(!ledger.all_approved(&ids));

    ledger.apply(ReviewEvent::Approved {
        question_id: question_id("q2"),
    });
    assert!(ledger.all_approved(&ids));
    assert_eq!(ledger.approved_count(), 2);
}
