use super::domain::{Question, QuestionId, QuestionKind, TemplateCategory};

/// One built-in assessment template: an ordered set of weighted questions.
#[derive(Debug, Clone)]
pub struct AssessmentTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub category: TemplateCategory,
    pub questions: Vec<Question>,
}

impl AssessmentTemplate {
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| &question.id == id)
    }

    pub fn question_ids(&self) -> Vec<QuestionId> {
        self.questions
            .iter()
            .map(|question| question.id.clone())
            .collect()
    }
}

/// Catalog of the templates this deployment offers.
#[derive(Debug)]
pub struct TemplateCatalog {
    templates: Vec<AssessmentTemplate>,
}

impl TemplateCatalog {
    pub fn standard() -> Self {
        Self {
            templates: vec![cybersecurity(), soc_compliance(), data_privacy()],
        }
    }

    pub fn with_templates(templates: Vec<AssessmentTemplate>) -> Self {
        Self { templates }
    }

    pub fn find(&self, key: &str) -> Option<&AssessmentTemplate> {
        self.templates.iter().find(|template| template.key == key)
    }

    pub fn templates(&self) -> &[AssessmentTemplate] {
        &self.templates
    }
}

fn question(id: &str, text: &str, kind: QuestionKind, weight: u32) -> Question {
    Question {
        id: QuestionId(id.to_string()),
        text: text.to_string(),
        kind,
        weight,
    }
}

fn choices(options: &[&str]) -> QuestionKind {
    QuestionKind::MultipleChoice {
        options: options.iter().map(|option| (*option).to_string()).collect(),
    }
}

// Option lists are authored best-first; the scorer gives index 0 full
// credit and the last index none.

fn cybersecurity() -> AssessmentTemplate {
    AssessmentTemplate {
        key: "cybersecurity",
        name: "Cybersecurity Self-Assessment",
        category: TemplateCategory::Cybersecurity,
        questions: vec![
            question(
                "cyber-governance",
                "Is there a board-approved information security policy reviewed at least annually?",
                QuestionKind::Boolean,
                10,
            ),
            question(
                "cyber-mfa",
                "Is multi-factor authentication enforced for all remote and privileged access?",
                QuestionKind::Boolean,
                9,
            ),
            question(
                "cyber-patching",
                "How quickly are critical security patches applied to internet-facing systems?",
                choices(&[
                    "Within 72 hours",
                    "Within 30 days",
                    "Quarterly",
                    "Ad hoc or never",
                ]),
                8,
            ),
            question(
                "cyber-incident",
                "Is there a documented incident response plan exercised within the last year?",
                QuestionKind::Boolean,
                8,
            ),
            question(
                "cyber-pentest",
                "Has an independent penetration test been performed in the last twelve months?",
                QuestionKind::Tested,
                7,
            ),
            question(
                "cyber-backup",
                "How are production data backups scheduled and stored?",
                choices(&[
                    "Daily with offsite copies",
                    "Daily onsite only",
                    "Weekly",
                    "No scheduled backups",
                ]),
                6,
            ),
        ],
    }
}

fn soc_compliance() -> AssessmentTemplate {
    AssessmentTemplate {
        key: "soc_compliance",
        name: "SOC Compliance Self-Assessment",
        category: TemplateCategory::SocCompliance,
        questions: vec![
            question(
                "soc-access-reviews",
                "Are user access reviews performed quarterly across in-scope systems?",
                QuestionKind::Tested,
                10,
            ),
            question(
                "soc-change-mgmt",
                "Do production changes require documented approval before deployment?",
                QuestionKind::Tested,
                9,
            ),
            question(
                "soc-deprovisioning",
                "Is access for terminated personnel removed within one business day?",
                QuestionKind::Boolean,
                8,
            ),
            question(
                "soc-monitoring",
                "How is security event monitoring performed for in-scope systems?",
                choices(&[
                    "Continuous automated monitoring",
                    "Daily manual review",
                    "Weekly review",
                    "No monitoring",
                ]),
                7,
            ),
            question(
                "soc-backup-restore",
                "Are backup restoration procedures tested on a defined schedule?",
                QuestionKind::Tested,
                7,
            ),
            question(
                "soc-vendor",
                "Are subservice-organization SOC reports obtained and reviewed annually?",
                QuestionKind::Tested,
                6,
            ),
        ],
    }
}

fn data_privacy() -> AssessmentTemplate {
    AssessmentTemplate {
        key: "data_privacy",
        name: "Data Privacy Self-Assessment",
        category: TemplateCategory::DataPrivacy,
        questions: vec![
            question(
                "privacy-inventory",
                "Is there a maintained inventory of personal data holdings and processing purposes?",
                QuestionKind::Boolean,
                9,
            ),
            question(
                "privacy-dsr",
                "How quickly are data subject requests fulfilled?",
                choices(&[
                    "Within 30 days",
                    "Within 60 days",
                    "Within 90 days",
                    "No defined process",
                ]),
                8,
            ),
            question(
                "privacy-retention",
                "How are data retention schedules enforced?",
                choices(&[
                    "Automated enforcement",
                    "Manual with periodic audits",
                    "Documented but unenforced",
                    "No retention schedule",
                ]),
                7,
            ),
            question(
                "privacy-dpia",
                "Are privacy impact assessments performed for new processing activities?",
                QuestionKind::Tested,
                7,
            ),
            question(
                "privacy-training",
                "Do all staff complete privacy training at least annually?",
                QuestionKind::Boolean,
                6,
            ),
        ],
    }
}
