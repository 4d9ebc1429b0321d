//! Answer evaluation: labeled-reply parsing with a word-count fallback.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::interview::prompts::{EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM};
use crate::interview::Sourced;
use crate::llm_client::TextCompletion;

const DEFAULT_SCORE: u8 = 5;
const MAX_POINTS: usize = 3;
/// Fixed suggestion attached to every parsed evaluation; never parsed out of
/// the reply.
const PARSED_SUGGESTION: &str = "Consider providing specific examples with technical details.";

/// Structured scoring of one answer. Scores are clamped to [0, 10] on every
/// path that produces this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerEvaluation {
    pub score: u8,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Labeled-reply parser
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Score,
    Feedback,
    Strengths,
    Improvements,
}

const LABELS: [(Field, &str); 4] = [
    (Field::Score, "Score:"),
    (Field::Feedback, "Feedback:"),
    (Field::Strengths, "Strengths:"),
    (Field::Improvements, "Improvements:"),
];

/// Locates every label occurrence and assigns each the span up to the next
/// recognized label. One linear pass, so span boundaries are consistent
/// across fields by construction.
fn label_spans(text: &str) -> Vec<(Field, usize, usize)> {
    let mut marks: Vec<(usize, Field, usize)> = Vec::new();

    for (field, label) in LABELS {
        let mut from = 0;
        while let Some(pos) = text[from..].find(label) {
            let start = from + pos;
            marks.push((start, field, start + label.len()));
            from = start + label.len();
        }
    }
    marks.sort_by_key(|&(start, _, _)| start);

    marks
        .iter()
        .enumerate()
        .map(|(i, &(_, field, content_start))| {
            let end = marks.get(i + 1).map(|&(start, _, _)| start).unwrap_or(text.len());
            (field, content_start, end)
        })
        .collect()
}

/// Parses a reply in the requested `Score:`/`Feedback:`/`Strengths:`/
/// `Improvements:` format. Missing fields take the documented defaults; the
/// first occurrence of each label wins.
pub fn parse_evaluation_reply(reply: &str) -> AnswerEvaluation {
    let mut score: Option<u32> = None;
    let mut feedback: Option<String> = None;
    let mut strengths: Option<Vec<String>> = None;
    let mut weaknesses: Option<Vec<String>> = None;

    for (field, start, end) in label_spans(reply) {
        let span = reply[start..end].trim();
        match field {
            Field::Score if score.is_none() => score = parse_leading_int(span),
            Field::Feedback if feedback.is_none() => feedback = Some(span.to_string()),
            Field::Strengths if strengths.is_none() => strengths = Some(bullet_points(span)),
            Field::Improvements if weaknesses.is_none() => weaknesses = Some(bullet_points(span)),
            _ => {}
        }
    }

    AnswerEvaluation {
        score: score.unwrap_or(DEFAULT_SCORE as u32).min(10) as u8,
        feedback: feedback.unwrap_or_else(|| reply.chars().take(200).collect()),
        strengths: or_default(strengths.unwrap_or_default(), "Provided an answer"),
        weaknesses: or_default(weaknesses.unwrap_or_default(), "Could be more detailed"),
        suggestions: PARSED_SUGGESTION.to_string(),
    }
}

fn parse_leading_int(span: &str) -> Option<u32> {
    let digits: String = span.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Splits a span into bullet points: one per line, leading `-`/`•` and
/// whitespace stripped, blanks dropped, capped at three.
fn bullet_points(span: &str) -> Vec<String> {
    span.lines()
        .map(|line| line.trim().trim_start_matches(['-', '•']).trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_POINTS)
        .collect()
}

fn or_default(points: Vec<String>, default: &str) -> Vec<String> {
    if points.is_empty() {
        vec![default.to_string()]
    } else {
        points
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluation entry point and fallback
// ────────────────────────────────────────────────────────────────────────────

/// Evaluates one answer. Primary path prompts the LLM and parses the reply:
/// the labeled parser when any requested label is present, the loose parser
/// when the model ignored the format entirely. Any LLM failure takes the
/// word-count fallback.
pub async fn evaluate_answer(
    llm: &dyn TextCompletion,
    question: &str,
    answer: &str,
) -> Sourced<AnswerEvaluation> {
    let prompt = EVALUATION_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer);

    match llm.complete(&prompt, EVALUATION_SYSTEM).await {
        Ok(reply) => {
            let parsed = if LABELS.iter().any(|(_, label)| reply.contains(label)) {
                parse_evaluation_reply(&reply)
            } else {
                parse_evaluation_loose(&reply, answer)
            };
            Sourced::llm(parsed)
        }
        Err(e) => {
            warn!("answer evaluation fell back to word count: {e}");
            Sourced::heuristic(fallback_evaluation(answer))
        }
    }
}

/// Fallback scoring: a pure function of the answer's word count, capped at 7.
/// Never reads any LLM reply.
pub fn fallback_evaluation(answer: &str) -> AnswerEvaluation {
    let words = answer.split_whitespace().count();

    AnswerEvaluation {
        score: (words / 10).min(7) as u8,
        feedback: "Answer received and evaluated.".to_string(),
        strengths: vec!["Attempted to answer the question".to_string()],
        weaknesses: vec!["Could provide more detail and examples".to_string()],
        suggestions: "Include specific examples from your experience.".to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// General-purpose free-text parser
// ────────────────────────────────────────────────────────────────────────────

static SCORE_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"score[:\s]+(\d+)").unwrap(),
        Regex::new(r"(\d+)\s*/\s*10").unwrap(),
        Regex::new(r"rating[:\s]+(\d+)").unwrap(),
    ]
});

const STRENGTH_HEADERS: &[&str] = &["strength", "positive", "good"];
const WEAKNESS_HEADERS: &[&str] = &["weakness", "improvement", "concern"];

/// Parses evaluations out of free text that ignored the labeled format:
/// three score patterns tried in order (first in-range match wins),
/// section headers recognized by keyword, bullet lines collected into the
/// active section, and defaults chosen by the answer's length.
pub fn parse_evaluation_loose(text: &str, answer: &str) -> AnswerEvaluation {
    let lowered = text.to_lowercase();

    let mut score = DEFAULT_SCORE as u32;
    for pattern in SCORE_PATTERNS.iter() {
        let matched = pattern
            .captures(&lowered)
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .filter(|value| *value <= 10);
        if let Some(value) = matched {
            score = value;
            break;
        }
    }

    #[derive(PartialEq)]
    enum Section {
        None,
        Strengths,
        Weaknesses,
    }

    let mut strengths: Vec<String> = Vec::new();
    let mut weaknesses: Vec<String> = Vec::new();
    let mut section = Section::None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_lower = line.to_lowercase();

        if STRENGTH_HEADERS.iter().any(|kw| line_lower.contains(kw)) {
            section = Section::Strengths;
            continue;
        }
        if WEAKNESS_HEADERS.iter().any(|kw| line_lower.contains(kw)) {
            section = Section::Weaknesses;
            continue;
        }

        if let Some(item) = line.strip_prefix(['-', '•', '*']) {
            let item = item.trim().to_string();
            match section {
                Section::Strengths => strengths.push(item),
                Section::Weaknesses => weaknesses.push(item),
                Section::None => {}
            }
        }
    }

    if strengths.is_empty() {
        strengths.push(
            if answer.len() > 100 {
                "Provided a detailed response"
            } else {
                "Attempted to answer the question"
            }
            .to_string(),
        );
    }
    if weaknesses.is_empty() {
        weaknesses.push(
            if answer.len() < 50 {
                "Answer could be more detailed"
            } else {
                "Could provide more specific examples"
            }
            .to_string(),
        );
    }
    strengths.truncate(MAX_POINTS);
    weaknesses.truncate(MAX_POINTS);

    AnswerEvaluation {
        score: score as u8,
        feedback: text.chars().take(500).collect(),
        strengths,
        weaknesses,
        suggestions: "Consider providing more specific examples and details in your responses."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::Source;
    use crate::llm_client::testing::{Scripted, Unreachable};

    const LABELED_REPLY: &str = "Score: 8\n\
                                 Feedback: Solid answer.\n\
                                 Strengths:\n\
                                 - Clear structure\n\
                                 Improvements:\n\
                                 - Add metrics";

    #[test]
    fn test_labeled_reply_parses_all_fields() {
        let eval = parse_evaluation_reply(LABELED_REPLY);
        assert_eq!(eval.score, 8);
        assert_eq!(eval.feedback, "Solid answer.");
        assert_eq!(eval.strengths, vec!["Clear structure"]);
        assert_eq!(eval.weaknesses, vec!["Add metrics"]);
        assert_eq!(eval.suggestions, PARSED_SUGGESTION);
    }

    #[test]
    fn test_labeled_parse_is_idempotent() {
        assert_eq!(
            parse_evaluation_reply(LABELED_REPLY),
            parse_evaluation_reply(LABELED_REPLY)
        );
    }

    #[test]
    fn test_out_of_range_score_clamps_to_ten() {
        let eval = parse_evaluation_reply("Score: 15\nFeedback: Over-enthusiastic.");
        assert_eq!(eval.score, 10);
    }

    #[test]
    fn test_unparseable_score_defaults_to_five() {
        let eval = parse_evaluation_reply("Score: excellent\nFeedback: No digits here.");
        assert_eq!(eval.score, 5);
    }

    #[test]
    fn test_missing_labels_take_defaults() {
        let reply = "The model ignored the format and wrote prose instead.";
        let eval = parse_evaluation_reply(reply);
        assert_eq!(eval.score, 5);
        assert_eq!(eval.feedback, reply); // under 200 chars, kept whole
        assert_eq!(eval.strengths, vec!["Provided an answer"]);
        assert_eq!(eval.weaknesses, vec!["Could be more detailed"]);
    }

    #[test]
    fn test_default_feedback_truncates_to_200_chars() {
        let reply = "x".repeat(300);
        let eval = parse_evaluation_reply(&reply);
        assert_eq!(eval.feedback.chars().count(), 200);
    }

    #[test]
    fn test_feedback_span_ends_at_next_label() {
        let reply = "Feedback: Good pacing.\nStrengths:\n- Calm delivery\n- Cited numbers";
        let eval = parse_evaluation_reply(reply);
        assert_eq!(eval.feedback, "Good pacing.");
        assert_eq!(eval.strengths, vec!["Calm delivery", "Cited numbers"]);
    }

    #[test]
    fn test_bullet_lists_cap_at_three() {
        let reply = "Strengths:\n- one\n- two\n- three\n- four";
        let eval = parse_evaluation_reply(reply);
        assert_eq!(eval.strengths.len(), 3);
    }

    #[test]
    fn test_fallback_scores_by_word_count() {
        let answer = (0..35).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        assert_eq!(fallback_evaluation(&answer).score, 3);
    }

    #[test]
    fn test_fallback_score_caps_at_seven() {
        let answer = (0..200).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        assert_eq!(fallback_evaluation(&answer).score, 7);
    }

    #[test]
    fn test_fallback_empty_answer_scores_zero() {
        assert_eq!(fallback_evaluation("").score, 0);
    }

    #[tokio::test]
    async fn test_evaluate_answer_llm_branch() {
        let evaluated = evaluate_answer(&Scripted(LABELED_REPLY), "Q?", "A").await;
        assert_eq!(evaluated.source, Source::Llm);
        assert_eq!(evaluated.into_inner().score, 8);
    }

    #[tokio::test]
    async fn test_evaluate_answer_routes_unlabeled_reply_to_loose_parser() {
        let llm = Scripted("A reasonable response overall, 6/10 from me.");
        let evaluated = evaluate_answer(&llm, "Q?", "A").await;
        assert_eq!(evaluated.source, Source::Llm);
        assert_eq!(evaluated.into_inner().score, 6);
    }

    #[tokio::test]
    async fn test_evaluate_answer_fallback_branch_never_reads_reply() {
        let answer = "one two three four five six seven eight nine ten eleven twelve";
        let evaluated = evaluate_answer(&Unreachable, "Q?", answer).await;
        assert_eq!(evaluated.source, Source::Heuristic);
        assert_eq!(evaluated.into_inner().score, 1);
    }

    #[test]
    fn test_loose_score_pattern_order() {
        // First pattern matches out of range, second pattern is in range.
        let eval = parse_evaluation_loose("score: 99 overall, but really 7/10", "answer");
        assert_eq!(eval.score, 7);
    }

    #[test]
    fn test_loose_rating_pattern() {
        let eval = parse_evaluation_loose("rating: 6 for this one", "answer");
        assert_eq!(eval.score, 6);
    }

    #[test]
    fn test_loose_no_score_defaults_to_five() {
        let eval = parse_evaluation_loose("no numbers anywhere", "answer");
        assert_eq!(eval.score, 5);
    }

    #[test]
    fn test_loose_sections_collect_bullets() {
        let text = "Strengths observed:\n\
                    - clear examples\n\
                    * confident tone\n\
                    Areas for improvement:\n\
                    - missing metrics";
        let eval = parse_evaluation_loose(text, "a sufficiently long answer for defaults");
        assert_eq!(eval.strengths, vec!["clear examples", "confident tone"]);
        assert_eq!(eval.weaknesses, vec!["missing metrics"]);
    }

    #[test]
    fn test_loose_defaults_depend_on_answer_length() {
        let short = parse_evaluation_loose("nothing structured", "brief");
        assert_eq!(short.strengths, vec!["Attempted to answer the question"]);
        assert_eq!(short.weaknesses, vec!["Answer could be more detailed"]);

        let long_answer = "a".repeat(150);
        let long = parse_evaluation_loose("nothing structured", &long_answer);
        assert_eq!(long.strengths, vec!["Provided a detailed response"]);
        assert_eq!(long.weaknesses, vec!["Could provide more specific examples"]);
    }

    #[test]
    fn test_loose_feedback_truncates_to_500_chars() {
        let text = "y".repeat(600);
        let eval = parse_evaluation_loose(&text, "answer");
        assert_eq!(eval.feedback.chars().count(), 500);
    }
}
