//! Follow-up question generation: one probing question per answer, with a
//! template fallback driven by the original question's topic.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::interview::prompts::{FOLLOWUP_PROMPT_TEMPLATE, FOLLOWUP_SYSTEM};
use crate::interview::questions::{Category, Difficulty, Question};
use crate::interview::Sourced;
use crate::llm_client::TextCompletion;

/// Label prefixes models like to prepend; stripped in this order.
const REPLY_PREFIXES: &[&str] = &["Follow-up:", "Question:", "Q:", "Next:", "Here's", "Here is"];

/// A cleaned reply shorter than this, or without a question mark, is
/// discarded in favor of the fallback.
const MIN_REPLY_LEN: usize = 20;

/// Extracts the phrase the original question was about.
static TOPIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:about|with|experience with|using|in)\s+([A-Za-z][A-Za-z\s.]+?)(?:\?|\.|\s+What)")
        .unwrap()
});

/// Verbs in the answer that signal hands-on build work.
const BUILD_VERBS: &[&str] = &["project", "built", "developed", "created", "worked on"];

/// Generates a follow-up for a question/answer pair. Category is always
/// Follow-up and difficulty always Hard, whichever branch produces the text.
pub async fn generate_followup(
    llm: &dyn TextCompletion,
    original_question: &str,
    answer: &str,
) -> Sourced<Question> {
    let prompt = FOLLOWUP_PROMPT_TEMPLATE
        .replace("{question}", original_question)
        .replace("{answer}", answer);

    match llm.complete(&prompt, FOLLOWUP_SYSTEM).await {
        Ok(reply) => {
            let mut text = reply.trim();
            for prefix in REPLY_PREFIXES {
                if let Some(rest) = text.strip_prefix(prefix) {
                    text = rest.trim_start();
                }
            }

            if text.chars().count() < MIN_REPLY_LEN || !text.contains('?') {
                Sourced::heuristic(fallback_followup(original_question, answer))
            } else {
                Sourced::llm(followup_question(text.to_string()))
            }
        }
        Err(e) => {
            warn!("follow-up generation fell back to templates: {e}");
            Sourced::heuristic(fallback_followup(original_question, answer))
        }
    }
}

/// Deterministic fallback: five fixed templates, checked in order, first
/// matching condition fires.
pub fn fallback_followup(original_question: &str, answer: &str) -> Question {
    let answer_lower = answer.to_lowercase();
    let question_lower = original_question.to_lowercase();

    let topic = TOPIC
        .captures(original_question)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_else(|| "this".to_string());

    let text = if BUILD_VERBS.iter().any(|verb| answer_lower.contains(verb)) {
        format!(
            "Can you describe the technical challenges you faced while working with {topic} and how you solved them?"
        )
    } else if answer.split_whitespace().count() < 20 {
        format!(
            "Could you provide a specific real-world example of how you've used {topic} in production?"
        )
    } else if question_lower.contains("api") || question_lower.contains("rest") {
        "How do you handle API authentication, error handling, and rate limiting in your implementations?"
            .to_string()
    } else if question_lower.contains("react") || question_lower.contains("frontend") {
        "Can you explain how you handle state management and component lifecycle in your applications?"
            .to_string()
    } else {
        format!("What performance optimizations have you implemented when using {topic}?")
    };

    followup_question(text)
}

fn followup_question(text: String) -> Question {
    Question {
        text,
        category: Category::FollowUp,
        difficulty: Difficulty::Hard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::Source;
    use crate::llm_client::testing::{Scripted, Unreachable};

    // Long enough (> 20 words) to dodge the short-answer template.
    const LONG_NEUTRAL_ANSWER: &str =
        "I usually start from the requirements, sketch interfaces, validate assumptions \
         early, measure everything in staging, and only then commit to an approach after \
         comparing alternatives carefully.";

    #[test]
    fn test_build_verbs_select_challenges_template() {
        let q = fallback_followup("What is your experience with Docker?", "I built a caching layer");
        assert!(q.text.contains("technical challenges"));
        assert_eq!(q.category, Category::FollowUp);
        assert_eq!(q.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_short_answer_selects_production_example_template() {
        let q = fallback_followup("What challenges did you face with Docker?", "It went fine overall");
        assert!(q.text.contains("in production"));
        assert!(q.text.contains("Docker"));
    }

    #[test]
    fn test_api_question_selects_api_template() {
        let q = fallback_followup("How do you design a REST API layer for partners and internal teams?", LONG_NEUTRAL_ANSWER);
        assert!(q.text.contains("rate limiting"));
    }

    #[test]
    fn test_frontend_question_selects_state_template() {
        let q = fallback_followup("How do you structure large React codebases across feature teams?", LONG_NEUTRAL_ANSWER);
        assert!(q.text.contains("state management"));
    }

    #[test]
    fn test_default_template_asks_about_performance() {
        let q = fallback_followup("Why do you enjoy mentoring junior engineers on your team?", LONG_NEUTRAL_ANSWER);
        assert!(q.text.contains("performance optimizations"));
    }

    #[test]
    fn test_topic_defaults_to_this() {
        let q = fallback_followup("Walk me through your debugging process?", "Short answer here");
        assert!(q.text.contains("this"));
    }

    #[test]
    fn test_build_verb_check_wins_over_short_answer() {
        // "built" fires first even though the answer is under 20 words.
        let q = fallback_followup("What is your experience with Redis?", "I built a cache");
        assert!(q.text.contains("technical challenges"));
    }

    #[tokio::test]
    async fn test_llm_reply_is_cleaned_and_kept() {
        let llm = Scripted("Follow-up: How would you shard the cache across regions?");
        let generated = generate_followup(&llm, "Tell me about caching.", "I built a cache layer").await;

        assert_eq!(generated.source, Source::Llm);
        let question = generated.into_inner();
        assert_eq!(question.text, "How would you shard the cache across regions?");
        assert_eq!(question.category, Category::FollowUp);
        assert_eq!(question.difficulty, Difficulty::Hard);
    }

    #[tokio::test]
    async fn test_short_reply_is_discarded_for_fallback() {
        let generated = generate_followup(&Scripted("Why?"), "What is your experience with Docker?", "I built a thing").await;
        assert_eq!(generated.source, Source::Heuristic);
        assert!(generated.into_inner().text.contains("technical challenges"));
    }

    #[tokio::test]
    async fn test_reply_without_question_mark_is_discarded() {
        let llm = Scripted("That was an interesting answer about caching layers.");
        let generated = generate_followup(&llm, "Tell me about caching.", "It caches things nicely").await;
        assert_eq!(generated.source, Source::Heuristic);
    }

    #[tokio::test]
    async fn test_llm_failure_takes_fallback() {
        let generated = generate_followup(&Unreachable, "What is your experience with Kafka?", "I built pipelines").await;
        assert_eq!(generated.source, Source::Heuristic);
        assert!(generated.into_inner().text.contains("technical challenges"));
    }
}
