use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{Answer, QuestionId, QuestionKind, TestingAnswer};
use super::templates::AssessmentTemplate;

#[derive(Debug, thiserror::Error)]
pub enum AnswerImportError {
    #[error("failed to read answer export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid answer CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Imports a reviewer's answer export (`Question ID,Answer` rows) against a
/// template. Unknown question ids are skipped; unparseable boolean/testing
/// answers are dropped rather than guessed.
pub struct AnswerCsvImporter;

impl AnswerCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        template: &AssessmentTemplate,
    ) -> Result<Vec<(QuestionId, Answer)>, AnswerImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, template)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        template: &AssessmentTemplate,
    ) -> Result<Vec<(QuestionId, Answer)>, AnswerImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut answers = Vec::new();
        for row in csv_reader.deserialize::<AnswerRow>() {
            let row = row?;
            let question_id = QuestionId(row.question_id.trim().to_string());
            let Some(question) = template.question(&question_id) else {
                continue;
            };

            if let Some(answer) = parse_answer(&row.answer, &question.kind) {
                answers.push((question_id, answer));
            }
        }

        Ok(answers)
    }
}

#[derive(Debug, Deserialize)]
struct AnswerRow {
    #[serde(rename = "Question ID")]
    question_id: String,
    #[serde(rename = "Answer", default)]
    answer: String,
}

fn parse_answer(raw: &str, kind: &QuestionKind) -> Option<Answer> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    match kind {
        QuestionKind::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(Answer::Boolean(true)),
            "false" | "no" | "0" => Some(Answer::Boolean(false)),
            _ => None,
        },
        QuestionKind::Tested => match trimmed.to_ascii_lowercase().as_str() {
            "tested" => Some(Answer::Testing(TestingAnswer::Tested)),
            "not_tested" | "not tested" | "untested" => {
                Some(Answer::Testing(TestingAnswer::NotTested))
            }
            _ => None,
        },
        QuestionKind::MultipleChoice { options } => options
            .iter()
            .find(|option| option.eq_ignore_ascii_case(trimmed))
            .map(|option| Answer::Choice(option.clone()))
            // Unmatched text is kept verbatim; it earns zero credit but
            // stays visible to the reviewer.
            .or_else(|| Some(Answer::Choice(trimmed.to_string()))),
    }
}
