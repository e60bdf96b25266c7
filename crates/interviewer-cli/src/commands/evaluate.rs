//! The `interviewer evaluate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use interviewer_core::{EvaluationEngine, EvaluationRecord};
use interviewer_providers::config::load_config_from;

pub async fn execute(
    question: String,
    answer: Option<String>,
    answer_file: Option<PathBuf>,
    seconds: i64,
    json: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let answer = match (answer, answer_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read answer: {}", path.display()))?,
        (None, None) => anyhow::bail!("either --answer or --answer-file is required"),
    };

    let config = load_config_from(config_path.as_deref())?;
    let provider = config.build_provider()?;
    let engine = EvaluationEngine::new(provider, config.engine_config()?);

    let record = engine
        .evaluate_full_answer(&question, &answer, seconds)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_record(&record);
    }

    Ok(())
}

fn print_record(record: &EvaluationRecord) {
    println!("Question: {}", record.question);
    println!("Speaking time: {}s", record.elapsed_seconds);
    println!();
    println!("Timing: {}", record.evaluations.timing);
    println!();
    println!("STAR evaluation:\n{}", record.evaluations.structural.trim());
    println!();
    println!("Logic evaluation:\n{}", record.evaluations.coherence.trim());
    println!();
    println!("Final report:\n{}", record.final_report.trim());
}
