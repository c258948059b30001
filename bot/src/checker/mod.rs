//! Grammar correction and translation.
//!
//! The checker classifies incoming text, builds the matching instruction
//! prompt, and calls the generation backend. It deliberately never returns
//! an error: backend failures degrade to a fixed apology string so the user
//! always gets a human-readable reply, and an empty model response stays
//! empty so callers can skip the reply entirely.

pub mod language;

use std::sync::Arc;

use tracing::{debug, error};

use crate::gemini::GenerateText;

pub use language::is_english;

/// Reply the model is instructed to give when the input needs no fixes.
/// Downstream compares against this exact literal to suppress the reply.
pub const NO_CORRECTIONS: &str = "No corrections needed.";

/// Fixed reply sent to the user when the model call fails.
pub const SERVICE_UNAVAILABLE: &str =
    "Sorry, the grammar correction service is temporarily unavailable.";

/// Grammar checker over a pluggable generation backend.
#[derive(Clone)]
pub struct GrammarChecker {
    generator: Arc<dyn GenerateText>,
}

impl GrammarChecker {
    pub fn new(generator: Arc<dyn GenerateText>) -> Self {
        Self { generator }
    }

    /// Check grammar if the text is English, otherwise ask for an English
    /// translation. Returns the trimmed model output, [`NO_CORRECTIONS`]
    /// when nothing needed fixing, an empty string when the model produced
    /// nothing usable, or [`SERVICE_UNAVAILABLE`] when the call failed.
    pub async fn correct(&self, text: &str) -> String {
        let english = is_english(text);
        let prompt = build_prompt(text, english);

        debug!(english, prompt_length = prompt.len(), "prompt_built");

        match self.generator.generate(&prompt).await {
            Ok(output) => output.trim().to_string(),
            Err(e) => {
                error!(error = %e, "generate_failed");
                SERVICE_UNAVAILABLE.to_string()
            }
        }
    }
}

/// Build the instruction prompt for one input.
///
/// Both branches demand plain text and a single answer; the wording is a
/// prompt-engineering tunable, the branch split is not.
pub fn build_prompt(text: &str, is_english: bool) -> String {
    if is_english {
        format!(
            "You are a helpful English grammar and spelling corrector.\n\
             Check the following sentence and provide corrections if needed.\n\
             If there is no error, reply with '{NO_CORRECTIONS}'\n\
             If there are mistakes, reply with a single corrected sentence followed by a short explanation.\n\
             Reply in plain text without any markdown formatting and do not offer alternative phrasings.\n\
             \n\
             Sentence: {text}"
        )
    } else {
        format!(
            "The following text is not in English:\n\
             {text}\n\
             \n\
             Please provide one natural and correct English version of this sentence.\n\
             Reply in plain text without any markdown formatting."
        )
    }
}
