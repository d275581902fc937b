//! Prompt templates for document Q&A

/// Build the grounded Q&A prompt
///
/// The model is instructed to answer only from the supplied context, cite
/// sources with `[Source X]` markers, and admit when the context is
/// insufficient instead of guessing.
pub fn build_qa_prompt(question: &str, context: &str) -> String {
    format!(
        r#"You are a helpful assistant that answers questions based on the provided context.

INSTRUCTIONS:
1. Answer the question using ONLY the information provided in the CONTEXT section below.
2. If the answer cannot be found in the context, respond with "I don't have enough information to answer that question based on the available documents."
3. When referencing information, cite your sources using the [Source X] format (e.g., "According to [Source 1]...").
4. Be concise but comprehensive in your response.
5. Do not make up or infer information that is not explicitly stated in the context.

CONTEXT:
{context}

QUESTION:
{question}

ANSWER:"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_context_and_question() {
        let prompt = build_qa_prompt("What is the PTO policy?", "[Source 1: Handbook, chunk 0]");
        assert!(prompt.contains("What is the PTO policy?"));
        assert!(prompt.contains("[Source 1: Handbook, chunk 0]"));
        assert!(prompt.contains("[Source X]"));
    }
}
