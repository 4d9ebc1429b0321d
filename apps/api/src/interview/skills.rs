//! Skill extraction: LLM strategy with an unconditional keyword fallback.

use std::collections::HashSet;

use tracing::warn;

use crate::interview::prompts::{SKILLS_PROMPT_TEMPLATE, SKILLS_SYSTEM};
use crate::interview::Sourced;
use crate::llm_client::{LlmError, TextCompletion};

/// Input text is truncated to this many characters before prompting.
const PROMPT_TEXT_LIMIT: usize = 1500;

/// At most this many skills survive either strategy.
pub const MAX_SKILLS: usize = 10;

/// Fixed vocabulary for the heuristic strategy: languages, frameworks, data
/// stores, cloud/infra, and methodology terms, matched as substrings.
pub const SKILL_KEYWORDS: &[&str] = &[
    "python", "java", "javascript", "typescript", "react", "angular", "vue", "svelte",
    "node.js", "nodejs", "express", "django", "flask", "spring", "springboot",
    "sql", "nosql", "mongodb", "postgresql", "mysql", "redis", "dynamodb",
    "aws", "azure", "gcp", "cloud", "docker", "kubernetes", "k8s",
    "git", "ci/cd", "jenkins", "github actions", "gitlab",
    "rest api", "rest", "api", "graphql", "grpc", "soap",
    "html", "css", "sass", "scss", "tailwind", "bootstrap",
    "webpack", "vite", "babel", "npm", "yarn",
    "microservices", "serverless", "lambda", "agile", "scrum", "devops",
    "machine learning", "ml", "ai", "deep learning", "data science",
    "tensorflow", "pytorch", "keras", "pandas", "numpy", "scikit-learn",
    "nlp", "computer vision", "opencv", "llm",
    "c++", "c#", ".net", "go", "golang", "rust", "ruby", "php",
    "cassandra", "elasticsearch", "kafka", "rabbitmq",
    "testing", "jest", "pytest", "selenium", "junit",
];

/// LLM strategy: one prompt over the first 1500 characters, comma-split
/// reply, tokens kept when their length is strictly between 1 and 30.
pub async fn extract_skills_llm(
    llm: &dyn TextCompletion,
    text: &str,
    doc_label: &str,
) -> Result<Vec<String>, LlmError> {
    let snippet: String = text.chars().take(PROMPT_TEXT_LIMIT).collect();
    let prompt = SKILLS_PROMPT_TEMPLATE
        .replace("{doc_type}", doc_label)
        .replace("{text}", &snippet);

    let reply = llm.complete(&prompt, SKILLS_SYSTEM).await?;

    Ok(reply
        .split(',')
        .map(|token| token.trim().to_string())
        .filter(|token| {
            let len = token.chars().count();
            len > 1 && len < 30
        })
        .take(MAX_SKILLS)
        .collect())
}

/// Heuristic strategy: case-folded substring containment against the fixed
/// vocabulary. Membership is deterministic; iteration order over the
/// deduplicated set is not, and callers must not depend on it.
pub fn extract_skills_heuristic(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();

    let found: HashSet<&str> = SKILL_KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| text_lower.contains(keyword))
        .collect();

    found.into_iter().map(title_case).take(MAX_SKILLS).collect()
}

/// Tries the LLM strategy and falls back to the keyword heuristic on any
/// failure. Job descriptions come through here; resume text goes straight to
/// the heuristic.
pub async fn extract_skills(
    llm: &dyn TextCompletion,
    text: &str,
    doc_label: &str,
) -> Sourced<Vec<String>> {
    match extract_skills_llm(llm, text, doc_label).await {
        Ok(skills) => Sourced::llm(skills),
        Err(e) => {
            warn!("skill extraction fell back to keyword matching: {e}");
            Sourced::heuristic(extract_skills_heuristic(text))
        }
    }
}

/// Capitalizes the first letter of every alphabetic run ("node.js" → "Node.Js").
fn title_case(keyword: &str) -> String {
    let mut out = String::with_capacity(keyword.len());
    let mut prev_alpha = false;

    for ch in keyword.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::Source;
    use crate::llm_client::testing::{Scripted, Unreachable};

    #[test]
    fn test_heuristic_membership_is_deterministic() {
        let text = "Experience with Python, React, and Docker";

        let mut first = extract_skills_heuristic(text);
        let mut second = extract_skills_heuristic(text);
        first.sort();
        second.sort();

        assert_eq!(first, vec!["Docker", "Python", "React"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_heuristic_title_cases_matches() {
        let skills = extract_skills_heuristic("we use kubernetes heavily");
        assert!(skills.contains(&"Kubernetes".to_string()));
    }

    #[test]
    fn test_heuristic_caps_at_ten() {
        let text = "python java javascript typescript react angular vue svelte \
                    docker kubernetes rust ruby php kafka redis mysql";
        assert!(extract_skills_heuristic(text).len() <= MAX_SKILLS);
    }

    #[test]
    fn test_heuristic_empty_text_finds_nothing() {
        assert!(extract_skills_heuristic("").is_empty());
    }

    #[test]
    fn test_title_case_keeps_punctuation_runs() {
        assert_eq!(title_case("node.js"), "Node.Js");
        assert_eq!(title_case("ci/cd"), "Ci/Cd");
        assert_eq!(title_case("c++"), "C++");
    }

    #[tokio::test]
    async fn test_llm_strategy_filters_token_lengths() {
        let llm = Scripted("Python, React, , x, this skill name is far too long to keep around, Docker");
        let skills = extract_skills_llm(&llm, "jd text", "job description")
            .await
            .unwrap();
        assert_eq!(skills, vec!["Python", "React", "Docker"]);
    }

    #[tokio::test]
    async fn test_llm_strategy_caps_at_ten_preserving_order() {
        let llm = Scripted("s01, s02, s03, s04, s05, s06, s07, s08, s09, s10, s11, s12");
        let skills = extract_skills_llm(&llm, "jd", "job description").await.unwrap();
        assert_eq!(skills.len(), MAX_SKILLS);
        assert_eq!(skills[0], "s01");
        assert_eq!(skills[9], "s10");
    }

    #[tokio::test]
    async fn test_failure_routes_to_heuristic_branch() {
        let sourced = extract_skills(&Unreachable, "We need rust and kafka experts", "job description").await;
        assert_eq!(sourced.source, Source::Heuristic);

        let mut skills = sourced.into_inner();
        skills.sort();
        assert_eq!(skills, vec!["Kafka", "Rust"]);
    }

    #[tokio::test]
    async fn test_success_stays_on_llm_branch() {
        let sourced = extract_skills(&Scripted("Rust, Kafka"), "ignored", "job description").await;
        assert_eq!(sourced.source, Source::Llm);
        assert_eq!(sourced.into_inner(), vec!["Rust", "Kafka"]);
    }
}
