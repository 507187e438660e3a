//! Answer prompt assembly.

use tributary_core::models::{ContextDocument, ConversationTurn};

/// Instructions leading every answer prompt.
pub const ANSWER_INSTRUCTIONS: &str = "You are a helpful assistant. Use the provided context to answer the question.\nCite sources using [Doc N] when relevant. If unsure, say you don't know.";

/// `role: content`, one turn per line.
pub fn format_history(history: &[ConversationTurn]) -> String {
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `[Doc N] content` blocks separated by blank lines.
pub fn format_context(context: &[ContextDocument]) -> String {
    context
        .iter()
        .map(|doc| format!("{} {}", doc.label(), doc.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_prompt(question: &str, history: &[ConversationTurn], context: &[ContextDocument]) -> String {
    format!(
        "{ANSWER_INSTRUCTIONS}\n\nConversation History:\n{}\n\nContext:\n{}\n\nQuestion: {question}\nAnswer:",
        format_history(history),
        format_context(context),
    )
}
