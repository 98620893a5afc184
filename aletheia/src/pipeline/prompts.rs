//! Prompt construction for resolution and re-verification

/// Persona for the first generation call, specialized by the caller's domain
/// hint. The hint parameterizes the persona only; scoring is unaffected.
pub fn system_prompt(domain_hint: Option<&str>) -> String {
    format!(
        "You are a knowledgeable assistant specializing in {}. \
         Provide accurate, fact-based answers with specific details when available. \
         If you're uncertain, acknowledge it clearly.",
        domain_hint.unwrap_or("general knowledge")
    )
}

/// Audit-and-improve instruction for the single re-verification pass
pub fn review_prompt(answer: &str) -> String {
    format!(
        "Review this response for accuracy: \"{}\". \
         Is it factual? Provide an improved, more accurate version if needed.",
        answer
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_uses_domain_hint() {
        let prompt = system_prompt(Some("cardiology"));
        assert!(prompt.contains("specializing in cardiology"));
    }

    #[test]
    fn test_system_prompt_defaults_to_general_knowledge() {
        let prompt = system_prompt(None);
        assert!(prompt.contains("general knowledge"));
    }

    #[test]
    fn test_review_prompt_quotes_answer() {
        let prompt = review_prompt("The sky is green.");
        assert!(prompt.contains("\"The sky is green.\""));
        assert!(prompt.contains("Review this response for accuracy"));
    }
}
