//! Answer orchestration and conversation state.
//!
//! [`ChatSession`] drives one turn at a time through the fixed pipeline:
//! input gate, retrieval, prompt assembly, generation, output gate. Each
//! turn terminates in exactly one of three states - rejected, delivered, or
//! failed - and every non-delivered state carries a human-readable reason.
//!
//! The session exclusively owns its conversation log; the caller owns the
//! session's lifetime and may clear the log explicitly. A rejected query is
//! deliberately never appended, so blocked content cannot poison later
//! context. A failed generation leaves the user's turn appended with no
//! assistant turn - an observable, recoverable inconsistency the caller
//! must tolerate.

pub mod prompt;

use crate::guardrails::{GuardrailPolicy, RejectionKind};
use crate::llm::LLMClient;
use crate::rag::Retriever;
use crate::types::{Message, RetrievedChunk};
use tracing::{error, info, warn};

pub use prompt::{build_prompt, GroundedPrompt};

/// Terminal state of one conversation turn.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// The input gate refused the query; nothing else ran.
    Rejected {
        /// Which check fired.
        kind: RejectionKind,
        /// User-facing reason.
        reason: String,
    },
    /// The full pipeline ran and produced a (screened) answer.
    Delivered {
        /// The answer after output screening.
        answer: String,
        /// Whether the answer was replaced by the redaction notice.
        redacted: bool,
        /// The retrieved context that grounded the answer.
        sources: Vec<RetrievedChunk>,
    },
    /// The generator failed; the turn was aborted.
    Failed {
        /// Human-readable failure reason.
        error: String,
    },
}

/// A single-user chat session over an indexed corpus.
pub struct ChatSession {
    policy: GuardrailPolicy,
    retriever: Retriever,
    llm: Box<dyn LLMClient>,
    top_k: usize,
    log: Vec<Message>,
}

impl ChatSession {
    /// Create a session. `top_k` is the retrieval breadth per turn.
    pub fn new(
        policy: GuardrailPolicy,
        retriever: Retriever,
        llm: Box<dyn LLMClient>,
        top_k: usize,
    ) -> Self {
        Self {
            policy,
            retriever,
            llm,
            top_k,
            log: Vec::new(),
        }
    }

    /// Process one user turn through the guarded answer pipeline.
    ///
    /// Retrieval problems degrade to context-free generation; only the
    /// input gate and the generator can terminate a turn early.
    pub async fn handle_turn(&mut self, query: &str) -> TurnOutcome {
        let verdict = self.policy.screen_input(query);
        if let Some(rejection) = verdict.rejection {
            info!(kind = ?rejection.kind, "Query rejected by input gate");
            return TurnOutcome::Rejected {
                kind: rejection.kind,
                reason: rejection.reason,
            };
        }

        self.log.push(Message::user(query));

        let sources = match self.retriever.retrieve(query, self.top_k).await {
            Ok(chunks) => chunks,
            Err(e) => {
                // Degraded mode: answer without context rather than failing.
                warn!(error = %e, "Retrieval unavailable; generating without context");
                Vec::new()
            }
        };

        let prompt = build_prompt(query, &sources);
        let raw_answer = match self
            .llm
            .generate_with_system(&prompt.system, &prompt.user)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Generation failed");
                return TurnOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        let answer = self.policy.screen_output(&raw_answer);
        let redacted = answer != raw_answer;
        if redacted {
            info!("Answer replaced by redaction notice");
        }

        self.log.push(Message::assistant(answer.clone()));

        TurnOutcome::Delivered {
            answer,
            redacted,
            sources,
        }
    }

    /// The session's conversation log, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.log
    }

    /// Clear the conversation log.
    pub fn clear(&mut self) {
        self.log.clear();
    }
}
