use crate::infra::{demo_soc_findings, CannedDocumentAnalyzer, InMemoryAssessmentRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use riskwise::error::AppError;
use riskwise::workflows::assessment::{
    score_answers, AnswerCsvImporter, AssessmentService, DocumentUpload, QuestionKind,
    TemplateCatalog,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Assessment start date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) started_on: Option<NaiveDate>,
    /// Skip the finalization portion of the demo.
    #[arg(long)]
    pub(crate) skip_finalize: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Template to score (cybersecurity, soc_compliance, data_privacy)
    #[arg(long)]
    pub(crate) template: String,
    /// Answer export (`Question ID,Answer` CSV) to score against
    #[arg(long)]
    pub(crate) answers_csv: Option<PathBuf>,
    /// Print the template's questions and weights
    #[arg(long)]
    pub(crate) list_questions: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        template,
        answers_csv,
        list_questions,
    } = args;

    let catalog = TemplateCatalog::standard();
    let Some(template) = catalog.find(&template) else {
        println!("Unknown template '{template}'. Available templates:");
        for entry in catalog.templates() {
            println!("  - {} ({})", entry.key, entry.name);
        }
        return Ok(());
    };

    println!("{}", template.name);

    if list_questions {
        println!("Questions:");
        for question in &template.questions {
            let kind = match &question.kind {
                QuestionKind::Boolean => "yes/no".to_string(),
                QuestionKind::Tested => "tested/not tested".to_string(),
                QuestionKind::MultipleChoice { options } => {
                    format!("choice of [{}]", options.join(" | "))
                }
            };
            println!(
                "  - {} (weight {}): {} [{}]",
                question.id, question.weight, question.text, kind
            );
        }
    }

    let answers: BTreeMap<_, _> = match answers_csv {
        Some(path) => AnswerCsvImporter::from_path(path, template)?
            .into_iter()
            .collect(),
        None => BTreeMap::new(),
    };

    let result = score_answers(&template.questions, &answers, template.category);
    println!(
        "Answered {} of {} questions",
        answers.len(),
        template.questions.len()
    );
    println!(
        "Score: {} / 100 -> {} risk",
        result.score,
        result.level.label()
    );

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        started_on,
        skip_finalize,
    } = args;

    let started_on = started_on.unwrap_or_else(|| Local::now().date_naive());

    println!("Risk assessment demo");

    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let analyzer = Arc::new(CannedDocumentAnalyzer::new(demo_soc_findings()));
    let service = AssessmentService::new(repository, analyzer);

    let record = match service.start("soc_compliance", started_on) {
        Ok(record) => record,
        Err(err) => {
            println!("  Could not start assessment: {err}");
            return Ok(());
        }
    };
    println!(
        "- Started assessment {} from template {}",
        record.id, record.template_key
    );

    let documents = vec![DocumentUpload {
        file_name: "soc2-type2-report.pdf".to_string(),
        content_type: "application/pdf".to_string(),
    }];
    let summary = match service.request_analysis(&record.id, documents) {
        Ok(summary) => summary,
        Err(err) => {
            println!("  Analysis unavailable: {err}");
            return Ok(());
        }
    };
    println!(
        "- Analysis classified {} findings: {} tested, {} un-tested, {} exceptions, {} non-operational",
        summary.classified, summary.tested, summary.untested, summary.exceptions,
        summary.non_operational
    );
    if let Some(score) = summary.score {
        println!(
            "- Preliminary score: {} / 100 -> {} risk",
            score.score,
            score.level.label()
        );
    }

    println!("\nReviewer pass (classifications editable per question):");
    let stored = match service.get(&record.id) {
        Ok(record) => record,
        Err(err) => {
            println!("  Repository lookup failed: {err}");
            return Ok(());
        }
    };
    for (question_id, state) in stored.review.states() {
        let classification = state
            .classification
            .map(|status| match status.result {
                Some(result) => format!("{} / {}", status.status.label(), result.label()),
                None => status.status.label().to_string(),
            })
            .unwrap_or_else(|| "unclassified".to_string());
        println!("  - {question_id}: {classification}");
    }

    if skip_finalize {
        return Ok(());
    }

    let question_ids = service
        .catalog()
        .find(&stored.template_key)
        .map(|template| template.question_ids())
        .unwrap_or_default();
    for question_id in question_ids {
        if let Err(err) = service.approve(&record.id, &question_id) {
            println!("  Approval failed for {question_id}: {err}");
            return Ok(());
        }
    }
    let finalized = match service.finalize(&record.id) {
        Ok(record) => record,
        Err(err) => {
            println!("  Finalization blocked: {err}");
            return Ok(());
        }
    };
    println!(
        "\nFinalized {} with status '{}'",
        finalized.id,
        finalized.status.label()
    );
    if let Some(score) = finalized.score {
        println!(
            "Final score: {} / 100 -> {} risk",
            score.score,
            score.level.label()
        );
    }

    match serde_json::to_string_pretty(&service.status_view(&finalized)) {
        Ok(json) => println!("Status payload:\n{json}"),
        Err(err) => println!("Status payload unavailable: {err}"),
    }

    Ok(())
}
