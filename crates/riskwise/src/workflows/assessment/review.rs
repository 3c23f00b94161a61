use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::classifier::ControlTestStatus;
use super::domain::{AiFinding, Answer, EvidenceExcerpt, QuestionId};

/// Everything the review surface tracks for one question, in one place.
/// A single struct per question replaces the parallel answer/evidence/
/// approval maps that let related fields drift apart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionReviewState {
    pub answer: Option<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excerpts: Vec<EvidenceExcerpt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<ControlTestStatus>,
    pub approved: bool,
    pub unsaved: bool,
}

/// State transitions a reviewer (or the analysis pipeline) can trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum ReviewEvent {
    AnswerEdited {
        question_id: QuestionId,
        answer: Answer,
    },
    EvidenceEdited {
        question_id: QuestionId,
        excerpts: Vec<EvidenceExcerpt>,
    },
    FindingApplied {
        finding: AiFinding,
        classification: ControlTestStatus,
    },
    StatusOverridden {
        question_id: QuestionId,
        classification: ControlTestStatus,
    },
    Approved {
        question_id: QuestionId,
    },
    Saved {
        question_id: QuestionId,
    },
}

/// Reducer over per-question review state, keyed by question id.
///
/// Invariant: any edit to a question's answer, evidence, or derived status
/// clears its approval. Approval can only be re-granted explicitly, so an
/// approved question is approved for exactly the content on screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewLedger {
    states: BTreeMap<QuestionId, QuestionReviewState>,
}

impl ReviewLedger {
    /// Apply one event. Unknown question ids create fresh state; callers
    /// validate against the template before dispatching.
    pub fn apply(&mut self, event: ReviewEvent) {
        match event {
            ReviewEvent::AnswerEdited {
                question_id,
                answer,
            } => {
                let state = self.states.entry(question_id).or_default();
                state.answer = Some(answer);
                state.approved = false;
                state.unsaved = true;
            }
            ReviewEvent::EvidenceEdited {
                question_id,
                excerpts,
            } => {
                let state = self.states.entry(question_id).or_default();
                state.excerpts = excerpts;
                state.approved = false;
                state.unsaved = true;
            }
            ReviewEvent::FindingApplied {
                finding,
                classification,
            } => {
                let state = self.states.entry(finding.question_id).or_default();
                state.answer = Some(finding.answer);
                state.reasoning = Some(finding.reasoning);
                state.excerpts = finding.excerpts;
                state.classification = Some(classification);
                state.approved = false;
                state.unsaved = true;
            }
            ReviewEvent::StatusOverridden {
                question_id,
                classification,
            } => {
                let state = self.states.entry(question_id).or_default();
                state.classification = Some(classification);
                state.approved = false;
                state.unsaved = true;
            }
            ReviewEvent::Approved { question_id } => {
                if let Some(state) = self.states.get_mut(&question_id) {
                    state.approved = true;
                }
            }
            ReviewEvent::Saved { question_id } => {
                if let Some(state) = self.states.get_mut(&question_id) {
                    state.unsaved = false;
                }
            }
        }
    }

    pub fn state(&self, question_id: &QuestionId) -> Option<&QuestionReviewState> {
        self.states.get(question_id)
    }

    pub fn states(&self) -> &BTreeMap<QuestionId, QuestionReviewState> {
        &self.states
    }

    /// Snapshot of current answers, the scorer's input shape.
    pub fn answers(&self) -> BTreeMap<QuestionId, Answer> {
        self.states
            .iter()
            .filter_map(|(id, state)| {
                state
                    .answer
                    .as_ref()
                    .map(|answer| (id.clone(), answer.clone()))
            })
            .collect()
    }

    pub fn answered_count(&self) -> usize {
        self.states
            .values()
            .filter(|state| state.answer.is_some())
            .count()
    }

    pub fn approved_count(&self) -> usize {
        self.states.values().filter(|state| state.approved).count()
    }

    /// True when every listed question has an answer and has been approved.
    pub fn all_approved(&self, question_ids: &[QuestionId]) -> bool {
        question_ids.iter().all(|id| {
            self.states
                .get(id)
                .map(|state| state.answer.is_some() && state.approved)
                .unwrap_or(false)
        })
    }
}
