//! Offline evaluation of the retrieval-augmented pipeline.
//!
//! Runs a fixed set of (question, ground truth) cases through the serving
//! pipeline - retrieve, assemble, generate - and scores each case with a
//! lightweight token-recall metric: the fraction of ground-truth tokens
//! present in the retrieved context (best chunk) and in the generated
//! answer. The JSON report carries the raw answers and contexts so heavier
//! LLM-based scoring can run downstream.

use crate::chat::build_prompt;
use crate::llm::LLMClient;
use crate::rag::Retriever;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// One evaluation case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalCase {
    /// The question to ask.
    pub question: String,
    /// The expected factual content of the answer.
    pub ground_truth: String,
}

#[derive(Deserialize)]
struct EvalCaseFile {
    cases: Vec<EvalCase>,
}

/// Per-case evaluation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalRecord {
    /// The question asked.
    pub question: String,
    /// The expected factual content.
    pub ground_truth: String,
    /// The generated answer.
    pub answer: String,
    /// Retrieved context chunks, in similarity order.
    pub contexts: Vec<String>,
    /// Best token recall of the ground truth over any single context chunk.
    pub context_recall: f32,
    /// Token recall of the ground truth in the answer.
    pub answer_recall: f32,
}

/// Aggregated evaluation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    /// Per-case records.
    pub cases: Vec<EvalRecord>,
    /// Mean of `context_recall` across cases.
    pub mean_context_recall: f32,
    /// Mean of `answer_recall` across cases.
    pub mean_answer_recall: f32,
}

/// Built-in smoke cases for the school corpus.
pub fn builtin_cases() -> Vec<EvalCase> {
    vec![
        EvalCase {
            question: "When is the Hindi exam for SA1?".into(),
            ground_truth: "The Hindi exam for SA1 is scheduled for August 8, 2025.".into(),
        },
        EvalCase {
            question: "What is the syllabus for Mathematics Number Systems?".into(),
            ground_truth: "The syllabus for Mathematics Number Systems includes Real Numbers.".into(),
        },
        EvalCase {
            question: "When do the Dussehra holidays start?".into(),
            ground_truth: "The Dussehra holidays start on October 16, 2025, and end on October 23, 2025."
                .into(),
        },
    ]
}

/// Load evaluation cases from a TOML file with a `[[cases]]` table.
pub fn load_cases(path: impl AsRef<Path>) -> Result<Vec<EvalCase>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Io(format!("Cannot read {}: {}", path.display(), e)))?;
    let file: EvalCaseFile = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("Invalid {}: {}", path.display(), e)))?;
    if file.cases.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "{} contains no cases",
            path.display()
        )));
    }
    Ok(file.cases)
}

/// Run the cases through retrieve → assemble → generate and score them.
pub async fn run_eval(
    retriever: &Retriever,
    llm: &dyn LLMClient,
    cases: &[EvalCase],
    top_k: usize,
) -> Result<EvalReport> {
    let mut records = Vec::with_capacity(cases.len());

    for case in cases {
        let chunks = retriever.retrieve(&case.question, top_k).await?;
        let contexts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();

        let prompt = build_prompt(&case.question, &chunks);
        let answer = llm
            .generate_with_system(&prompt.system, &prompt.user)
            .await?;

        let context_recall = contexts
            .iter()
            .map(|c| token_recall(&case.ground_truth, c))
            .fold(0.0_f32, f32::max);
        let answer_recall = token_recall(&case.ground_truth, &answer);

        info!(
            question = %case.question,
            context_recall,
            answer_recall,
            "Evaluated case"
        );

        records.push(EvalRecord {
            question: case.question.clone(),
            ground_truth: case.ground_truth.clone(),
            answer,
            contexts,
            context_recall,
            answer_recall,
        });
    }

    let n = records.len().max(1) as f32;
    let mean_context_recall = records.iter().map(|r| r.context_recall).sum::<f32>() / n;
    let mean_answer_recall = records.iter().map(|r| r.answer_recall).sum::<f32>() / n;

    Ok(EvalReport {
        cases: records,
        mean_context_recall,
        mean_answer_recall,
    })
}

/// Write the report as pretty-printed JSON.
pub fn write_report(report: &EvalReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let raw = serde_json::to_string_pretty(report)
        .map_err(|e| AppError::Internal(format!("Failed to serialize report: {}", e)))?;
    fs::write(path, raw)
        .map_err(|e| AppError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    Ok(())
}

/// Fraction of `needle` tokens (length >= 3, case-insensitive) present in
/// `haystack`.
fn token_recall(needle: &str, haystack: &str) -> f32 {
    let haystack_tokens: std::collections::HashSet<String> = tokenize(haystack).collect();
    let needle_tokens: Vec<String> = tokenize(needle).collect();
    if needle_tokens.is_empty() {
        return 0.0;
    }

    let hits = needle_tokens
        .iter()
        .filter(|t| haystack_tokens.contains(*t))
        .count();
    hits as f32 / needle_tokens.len() as f32
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 3)
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recall_is_one_for_verbatim_content() {
        let gt = "The Hindi exam for SA1 is scheduled for August 8, 2025.";
        assert!((token_recall(gt, gt) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn recall_ignores_case_and_punctuation() {
        let recall = token_recall(
            "Hindi exam SA1: August 8, 2025",
            "the HINDI exam (sa1) is on august 8 2025",
        );
        assert!((recall - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn recall_is_zero_for_unrelated_text() {
        assert_eq!(token_recall("Dussehra holidays October", "lunch menu"), 0.0);
    }

    #[test]
    fn builtin_cases_are_nonempty() {
        assert_eq!(builtin_cases().len(), 3);
    }

    #[test]
    fn case_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.toml");
        fs::write(
            &path,
            r#"
            [[cases]]
            question = "When is the Hindi exam for SA1?"
            ground_truth = "August 8, 2025"
            "#,
        )
        .unwrap();

        let cases = load_cases(&path).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].ground_truth, "August 8, 2025");
    }
}
