use crate::infra::{build_screening_service, AnswerList};
use clap::Args;
use momly::companion::CompanionEngine;
use momly::config::ScreeningConfig;
use momly::error::AppError;
use momly::screening::{
    render_summary, DemographicsForm, FamilySupport, QuestionBank, ResultRecord, StepView,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Respondent name for the report header
    #[arg(long)]
    pub(crate) name: String,
    /// Respondent location
    #[arg(long)]
    pub(crate) location: String,
    /// Respondent age in years
    #[arg(long)]
    pub(crate) age: u8,
    /// Family support level: high, medium, or low
    #[arg(long, value_parser = crate::infra::parse_support)]
    pub(crate) support: FamilySupport,
    /// Ten comma-separated scores, one per question (0 to 3)
    #[arg(long, value_parser = crate::infra::parse_answers)]
    pub(crate) answers: AnswerList,
    /// Also write the PDF summary to this path
    #[arg(long)]
    pub(crate) pdf: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Write the PDF summary of the demo session to this path
    #[arg(long)]
    pub(crate) pdf: Option<PathBuf>,
    /// Skip the companion chat portion of the demo
    #[arg(long)]
    pub(crate) skip_chat: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        name,
        location,
        age,
        support,
        answers: AnswerList(scores),
        pdf,
    } = args;

    println!(
        "Scoring questionnaire for {name}, {location} (age {age}, {} support)",
        support.label()
    );

    let service = build_screening_service(&ScreeningConfig::default());
    let created = service.create()?;
    let session_id = created.session_id;
    let form = DemographicsForm {
        name,
        location,
        age,
        family_support: support,
    };
    service.submit_demographics(&session_id, &form)?;

    let mut outcome = None;
    for (index, score) in scores.iter().enumerate() {
        let question = index as u8 + 1;
        let answered = service.answer(&session_id, question, *score)?;
        println!(
            "- Q{question}: {score} ({})",
            choice_label(service.question_bank(), question, *score)
        );
        if answered.result.is_some() {
            outcome = answered.result;
        }
    }

    let record = match outcome {
        Some(record) => record,
        None => service.finalize(&session_id)?,
    };
    print_result(&record);

    if let Some(path) = pdf {
        let summary = service.summary(&session_id)?;
        let bytes = render_summary(&summary)?;
        std::fs::write(&path, bytes)?;
        println!("PDF summary written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { pdf, skip_chat } = args;

    println!("Momly screening demo");

    let service = build_screening_service(&ScreeningConfig::default());
    let created = service.create()?;
    let session_id = created.session_id;
    println!("- Opened session {session_id}");

    let form = DemographicsForm {
        name: "Amina".to_string(),
        location: "Nairobi".to_string(),
        age: 29,
        family_support: FamilySupport::Medium,
    };
    service.submit_demographics(&session_id, &form)?;
    println!(
        "- Intake accepted for {} ({} support) -> question 1",
        form.name,
        form.family_support.label()
    );

    // First pass at question 1, then a revisit to show the overwrite.
    service.answer(&session_id, 1, 3)?;
    println!("- Q1: 3 ({})", choice_label(service.question_bank(), 1, 3));
    service.go_back(&session_id, 2)?;
    println!("- Stepped back from question 2; question 1 reopened");

    let answers: [u8; 10] = [2, 1, 2, 1, 1, 1, 1, 0, 1, 1];
    let mut outcome = None;
    for (index, score) in answers.iter().enumerate() {
        let question = index as u8 + 1;
        let answered = service.answer(&session_id, question, *score)?;
        let label = choice_label(service.question_bank(), question, *score);
        match answered.step {
            StepView::Question { number, .. } => {
                println!("- Q{question}: {score} ({label}) -> question {number}");
            }
            _ => println!("- Q{question}: {score} ({label}) -> questionnaire complete"),
        }
        if answered.result.is_some() {
            outcome = answered.result;
        }
    }

    let record = match outcome {
        Some(record) => record,
        None => service.finalize(&session_id)?,
    };
    print_result(&record);

    if let Some(path) = pdf {
        let summary = service.summary(&session_id)?;
        let bytes = render_summary(&summary)?;
        std::fs::write(&path, bytes)?;
        println!("PDF summary written to {}", path.display());
    }

    if skip_chat {
        return Ok(());
    }

    let companion = CompanionEngine::standard();
    println!("\nCompanion check-in");
    println!("  momly: {}", companion.greeting());
    for message in ["I feel so tired and anxious today", "what can I do to relax?"] {
        println!("  you:   {message}");
        println!("  momly: {}", companion.reply(message));
    }

    Ok(())
}

fn choice_label(bank: &QuestionBank, question: u8, score: u8) -> &'static str {
    bank.question(question)
        .ok()
        .and_then(|item| item.choice_for(score))
        .map(|choice| choice.label)
        .unwrap_or("")
}

fn print_result(record: &ResultRecord) {
    println!(
        "\nResult: total score {} -> {}",
        record.total_score, record.risk_label
    );
    println!("Guidance:");
    for tip in &record.tips {
        println!("  - {tip}");
    }
}
