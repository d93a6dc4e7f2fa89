//! Prompt layout:
//!
//! ```text
//! You are a medical assistant. Use the following context to answer the question.
//! If the context is insufficient, say "I don't know".
//!
//! Context:
//! <passage 1>
//!
//! <passage 2>
//!
//! Question: <question>
//! Answer:
//! ```

pub const SYSTEM_PREAMBLE: &str = "You are a medical assistant. Use the following context to answer the question.\n\
If the context is insufficient, say \"I don't know\".";

pub const CONTEXT_HEADER: &str = "Context:\n";
pub const QUESTION_PREFIX: &str = "\n\nQuestion: ";
pub const ANSWER_SUFFIX: &str = "\nAnswer:";

/// Passages, nearest first, separated by a blank line.
pub fn build_prompt(question: &str, passages: &[String]) -> String {
    let context = passages.join("\n\n");
    format!("{SYSTEM_PREAMBLE}\n\n{CONTEXT_HEADER}{context}{QUESTION_PREFIX}{question}{ANSWER_SUFFIX}")
}

/// Recover the passages from a prompt produced by [`build_prompt`].
pub fn context_passages(prompt: &str) -> Vec<&str> {
    let Some(start) = prompt.find(CONTEXT_HEADER) else { return Vec::new() };
    let body = &prompt[start + CONTEXT_HEADER.len()..];
    let end = body.rfind(QUESTION_PREFIX).unwrap_or(body.len());
    body[..end].split("\n\n").filter(|p| !p.trim().is_empty()).collect()
}
