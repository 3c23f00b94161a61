use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Answer, Question, QuestionId, QuestionKind, TemplateCategory, TestingAnswer};

/// Discrete risk band displayed next to the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    MediumHigh,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::MediumHigh => "Medium-High",
            RiskLevel::High => "High",
        }
    }
}

/// Aggregate result of scoring one assessment's answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScore {
    pub score: u8,
    pub level: RiskLevel,
}

/// Weighted percentage score over the supplied questions.
///
/// Missing, mistyped, and unknown answers earn zero credit but still count
/// toward the achievable maximum; the function never fails. Multiple-choice
/// options are authored best-first, so index 0 earns full credit and the
/// last index earns none.
pub fn score_answers(
    questions: &[Question],
    answers: &BTreeMap<QuestionId, Answer>,
    category: TemplateCategory,
) -> RiskScore {
    let mut total = 0.0_f64;
    let mut max = 0.0_f64;

    for question in questions {
        let weight = f64::from(question.weight);
        let answer = answers.get(&question.id);

        match &question.kind {
            QuestionKind::Tested => {
                max += weight;
                if matches!(answer, Some(Answer::Testing(TestingAnswer::Tested))) {
                    total += weight;
                }
            }
            QuestionKind::Boolean => {
                max += weight;
                if answer.map(Answer::is_truthy).unwrap_or(false) {
                    total += weight;
                }
            }
            QuestionKind::MultipleChoice { options } => {
                max += weight * 4.0;
                if let Some(Answer::Choice(choice)) = answer {
                    if let Some(index) = options.iter().position(|option| option == choice) {
                        // A single-option list has no credit gradient; it
                        // contributes nothing either way.
                        if options.len() > 1 {
                            let span = (options.len() - 1) as f64;
                            total += weight * ((span - index as f64) / span) * 4.0;
                        }
                    }
                }
            }
        }
    }

    let score = if max > 0.0 {
        (total / max * 100.0).round() as u8
    } else {
        0
    };

    RiskScore {
        score,
        level: risk_level(score, category),
    }
}

/// Threshold tables are boundary-inclusive; SOC compliance grades harder.
pub fn risk_level(score: u8, category: TemplateCategory) -> RiskLevel {
    match category {
        TemplateCategory::SocCompliance => {
            if score >= 90 {
                RiskLevel::Low
            } else if score >= 75 {
                RiskLevel::Medium
            } else if score >= 50 {
                RiskLevel::MediumHigh
            } else {
                RiskLevel::High
            }
        }
        TemplateCategory::Cybersecurity | TemplateCategory::DataPrivacy => {
            if score >= 75 {
                RiskLevel::Low
            } else if score >= 50 {
                RiskLevel::Medium
            } else if score >= 25 {
                RiskLevel::MediumHigh
            } else {
                RiskLevel::High
            }
        }
    }
}
