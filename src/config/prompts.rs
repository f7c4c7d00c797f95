//! Prompt template for answering questions about the script.
//!
//! The built-in template can be replaced by a `rag.toml` file in the custom
//! prompts directory:
//!
//! ```toml
//! template = """
//! Context:
//! {context}
//!
//! Question: {question}"""
//! ```

use crate::error::{Result, ScriptQaError};
use serde::Deserialize;
use std::path::PathBuf;

/// Built-in template for movie-script questions.
pub const MOVIE_SCRIPT_TEMPLATE: &str = "
You are an expert assistant analyzing a movie script. Based on the provided context from the script, answer the user's question as thoroughly as possible.

Instructions:
- Use the retrieved context as your primary source of truth
- If the context does not contain the answer, say so clearly instead of guessing
- When possible, cite the specific scene, dialogue, or action description from the script to support your answer
- Provide both a concise answer and, if useful, a deeper explanation of its significance (e.g., themes, character motivations)
- Be objective about facts (who, what, when) but you may briefly interpret themes or symbolism if the question asks for it

Context from the script:
{context}

Question: {question}

Answer:";

/// Role label the filled template is sent and printed under.
const HUMAN_PREFIX: &str = "Human";

const CONTEXT_SLOT: &str = "{context}";
const QUESTION_SLOT: &str = "{question}";

/// On-disk override format.
#[derive(Debug, Deserialize)]
struct RagPromptFile {
    template: String,
}

/// A prompt template with `{context}` and `{question}` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: MOVIE_SCRIPT_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplate {
    /// Create a template, checking that both slots are present.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        for slot in [CONTEXT_SLOT, QUESTION_SLOT] {
            if !template.contains(slot) {
                return Err(ScriptQaError::Config(format!(
                    "Prompt template is missing the {} slot",
                    slot
                )));
            }
        }
        Ok(Self { template })
    }

    /// Load the template from `<custom_dir>/rag.toml`, falling back to the built-in one.
    pub fn load(custom_dir: Option<&str>) -> Result<Self> {
        let Some(dir) = custom_dir else {
            return Ok(Self::default());
        };

        let path = PathBuf::from(shellexpand::tilde(dir).to_string()).join("rag.toml");
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let file: RagPromptFile = toml::from_str(&content)?;
        Self::new(file.template)
    }

    /// Raw template text.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Substitute context and question in a single pass.
    ///
    /// Substituted text is never scanned again, so a question that happens to
    /// contain `{context}` is inserted verbatim.
    pub fn fill(&self, context: &str, question: &str) -> String {
        let mut out = String::with_capacity(self.template.len() + context.len() + question.len());
        let mut rest = self.template.as_str();

        while let Some(pos) = rest.find('{') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            if let Some(after) = tail.strip_prefix(CONTEXT_SLOT) {
                out.push_str(context);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(QUESTION_SLOT) {
                out.push_str(question);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);
        out
    }

    /// Fill the template and render it as a one-message chat transcript.
    ///
    /// This is the exact text printed before the answer and sent to the model.
    pub fn format(&self, context: &str, question: &str) -> String {
        format!("{}: {}", HUMAN_PREFIX, self.fill(context, question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_has_slots() {
        let template = PromptTemplate::default();
        assert!(PromptTemplate::new(template.as_str()).is_ok());
        assert!(template.as_str().starts_with("\nYou are an expert assistant analyzing a movie script."));
        assert!(template.as_str().ends_with("Question: {question}\n\nAnswer:"));
    }

    #[test]
    fn test_fill_inserts_verbatim() {
        let template = PromptTemplate::new("C={context}|Q={question}").unwrap();
        assert_eq!(template.fill("a\n\n---\n\nb", "why?"), "C=a\n\n---\n\nb|Q=why?");
    }

    #[test]
    fn test_fill_does_not_rescan_substitutions() {
        let template = PromptTemplate::new("{question} / {context}").unwrap();
        let filled = template.fill("ctx {question}", "what is {context}?");
        assert_eq!(filled, "what is {context}? / ctx {question}");
    }

    #[test]
    fn test_fill_keeps_other_braces() {
        let template = PromptTemplate::new("{x} {context} {question} {").unwrap();
        assert_eq!(template.fill("c", "q"), "{x} c q {");
    }

    #[test]
    fn test_format_adds_human_prefix() {
        let formatted = PromptTemplate::default().format("CTX", "Who is Rick?");
        assert!(formatted.starts_with("Human: \nYou are an expert assistant"));
        assert!(formatted.contains("Context from the script:\nCTX\n\nQuestion: Who is Rick?\n\nAnswer:"));
    }

    #[test]
    fn test_missing_slot_rejected() {
        let err = PromptTemplate::new("only {context}").unwrap_err();
        assert!(err.to_string().contains("{question}"));
    }

    #[test]
    fn test_load_custom_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("rag.toml"),
            "template = \"Ctx: {context}\\nQ: {question}\"\n",
        )
        .unwrap();

        let template = PromptTemplate::load(dir.path().to_str()).unwrap();
        assert_eq!(template.fill("c", "q"), "Ctx: c\nQ: q");
    }

    #[test]
    fn test_load_without_file_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(PromptTemplate::load(dir.path().to_str()).unwrap(), PromptTemplate::default());
        assert_eq!(PromptTemplate::load(None).unwrap(), PromptTemplate::default());
    }
}
