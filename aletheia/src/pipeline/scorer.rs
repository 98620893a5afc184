//! Heuristic confidence scoring
//!
//! A cheap, explainable proxy for answer quality. Deterministic and pure:
//! the same text always scores the same. This is not a factuality check; it
//! only gates whether an answer earns a re-verification pass.

use regex::Regex;

/// Scores generated answers into `[0, 1]`.
///
/// Starts at 0.5 and applies independent adjustments:
/// - more than 200 characters: +0.15
/// - a 4-digit year, percentage, or currency amount: +0.15
/// - an attribution phrase ("according to", "based on", "study shows"): +0.10
/// - hedging language ("may", "might", "possibly", "unclear", "uncertain"): -0.20
pub struct ConfidenceScorer {
    specifics: Regex,
    attribution: Regex,
    hedging: Regex,
}

impl ConfidenceScorer {
    pub fn new() -> Self {
        Self {
            specifics: Regex::new(r"\d{4}|\d+%|\$\d+").expect("hard-coded pattern"),
            attribution: Regex::new(r"(?i)according to|based on|study shows")
                .expect("hard-coded pattern"),
            hedging: Regex::new(r"(?i)may|might|possibly|unclear|uncertain")
                .expect("hard-coded pattern"),
        }
    }

    pub fn score(&self, text: &str) -> f64 {
        let mut score: f64 = 0.5;

        if text.chars().count() > 200 {
            score += 0.15;
        }
        if self.specifics.is_match(text) {
            score += 0.15;
        }
        if self.attribution.is_match(text) {
            score += 0.10;
        }
        if self.hedging.is_match(text) {
            score -= 0.20;
        }

        score.clamp(0.0, 1.0)
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> ConfidenceScorer {
        ConfidenceScorer::new()
    }

    #[test]
    fn test_neutral_text_scores_base() {
        let score = scorer().score("Metformin is used for type 2 diabetes.");
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_specifics_bonus() {
        let score = scorer().score("Approved in 1995 for clinical use.");
        assert!((score - 0.65).abs() < 1e-9);

        let score = scorer().score("Response rates reached 70% in trials.");
        assert!((score - 0.65).abs() < 1e-9);

        let score = scorer().score("Treatment costs about $40 per month.");
        assert!((score - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_attribution_bonus_is_case_insensitive() {
        let score = scorer().score("According to clinical guidelines, metformin is first-line.");
        assert!((score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_hedging_penalty() {
        let score = scorer().score("It might help, but the evidence is unclear.");
        assert!((score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_length_bonus() {
        let long = "Metformin lowers hepatic glucose production and improves insulin \
                    sensitivity in peripheral tissue. It is taken orally, usually twice \
                    daily with meals, and remains the most widely prescribed first-line \
                    agent for type two diabetes worldwide.";
        assert!(long.chars().count() > 200);
        let score = scorer().score(long);
        assert!((score - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_adjustments_combine() {
        // specifics + attribution, no hedging, short
        let score =
            scorer().score("According to a 2019 meta-analysis, efficacy exceeded placebo.");
        assert!((score - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_bounded() {
        for text in [
            "",
            "maybe possibly unclear uncertain",
            "According to a 2020 study shows 90% efficacy at $5, based on data. \
             Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod \
             tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim \
             veniam, quis nostrud exercitation ullamco laboris.",
        ] {
            let score = scorer().score(text);
            assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
        }
    }

    #[test]
    fn test_score_is_deterministic() {
        let text = "According to a 2019 study, 40% of patients responded.";
        assert_eq!(scorer().score(text).to_bits(), scorer().score(text).to_bits());
    }
}
