//! Grounded prompt assembly.
//!
//! Pure string composition: retrieved chunks are concatenated in the order
//! received and embedded into a fixed instruction template. There is no
//! branching on content - constraining the answer to the context is the
//! generator's job, stated in the instructions.

use crate::types::RetrievedChunk;

/// Fixed instruction preamble establishing role, tone, and grounding rules.
const SYSTEM_PREAMBLE: &str = "You are the official School AI Assistant. \
Use the provided context to answer questions accurately and politely. \
If the answer is not in the context, say you don't know.";

/// A fully assembled generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundedPrompt {
    /// System instructions including the context block.
    pub system: String,
    /// The literal user query.
    pub user: String,
}

/// Assemble the grounded prompt for one turn.
///
/// An empty context produces a valid prompt with an empty context block;
/// the generator is expected to state uncertainty rather than fabricate.
pub fn build_prompt(query: &str, context: &[RetrievedChunk]) -> GroundedPrompt {
    let context_block = context
        .iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    GroundedPrompt {
        system: format!("{}\n\nContext: {}", SYSTEM_PREAMBLE, context_block),
        user: query.to_string(),
    }
}
