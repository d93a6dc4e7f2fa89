//! JSONL persistence for the corpus and the three split files.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::PathsConfig;
use crate::error::{Error, Result};
use crate::normalize::normalize;
use crate::split::Partition;
use crate::types::CorpusRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnswerLine {
    answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuestionLine {
    question: String,
}

/// Read one JSON value per non-blank line.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let reader = BufReader::new(File::open(path)?);
    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value = serde_json::from_str(&line).map_err(|source| Error::Json { line: i + 1, source })?;
        out.push(value);
    }
    debug!(path = %path.display(), rows = out.len(), "read jsonl");
    Ok(out)
}

/// Write one JSON value per line, creating parent directories as needed.
pub fn write_jsonl<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    for row in rows {
        serde_json::to_writer(&mut writer, row).map_err(|e| Error::Io(e.into()))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Load a `{question, answer}` corpus and normalise both fields of every record.
pub fn load_corpus_jsonl(path: &Path) -> Result<Vec<CorpusRecord>> {
    let raw: Vec<CorpusRecord> = read_jsonl(path)?;
    let records: Vec<CorpusRecord> = raw
        .iter()
        .map(|r| CorpusRecord::new(normalize(&r.question), normalize(&r.answer)))
        .collect();
    info!(path = %path.display(), records = records.len(), "corpus loaded");
    Ok(records)
}

/// Locations of the persisted split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitFiles {
    pub train_answers: PathBuf,
    pub test_questions: PathBuf,
    pub test_answers: PathBuf,
}

impl From<&PathsConfig> for SplitFiles {
    fn from(paths: &PathsConfig) -> Self {
        Self {
            train_answers: paths.train_answers_path.clone(),
            test_questions: paths.test_questions_path.clone(),
            test_answers: paths.test_answers_path.clone(),
        }
    }
}

impl SplitFiles {
    pub fn persist(&self, partition: &Partition) -> Result<()> {
        let answers = |xs: &[String]| xs.iter().map(|a| AnswerLine { answer: a.clone() }).collect::<Vec<_>>();
        let questions: Vec<QuestionLine> =
            partition.test_questions.iter().map(|q| QuestionLine { question: q.clone() }).collect();
        write_jsonl(&self.train_answers, &answers(&partition.train_answers))?;
        write_jsonl(&self.test_questions, &questions)?;
        write_jsonl(&self.test_answers, &answers(&partition.test_answers))?;
        info!(
            train = partition.train_answers.len(),
            test = partition.test_questions.len(),
            "split persisted"
        );
        Ok(())
    }

    pub fn load_train_answers(&self) -> Result<Vec<String>> {
        Ok(read_jsonl::<AnswerLine>(&self.train_answers)?.into_iter().map(|l| l.answer).collect())
    }

    /// Held-out questions and answers, aligned by position.
    pub fn load_test_set(&self) -> Result<(Vec<String>, Vec<String>)> {
        let questions: Vec<String> =
            read_jsonl::<QuestionLine>(&self.test_questions)?.into_iter().map(|l| l.question).collect();
        let answers: Vec<String> =
            read_jsonl::<AnswerLine>(&self.test_answers)?.into_iter().map(|l| l.answer).collect();
        if questions.len() != answers.len() {
            return Err(Error::InvalidInput(format!(
                "{} test questions but {} test answers",
                questions.len(),
                answers.len()
            )));
        }
        Ok((questions, answers))
    }

    pub fn load(&self) -> Result<Partition> {
        let train_answers = self.load_train_answers()?;
        let (test_questions, test_answers) = self.load_test_set()?;
        Ok(Partition { train_answers, test_questions, test_answers })
    }
}
