//! Question generation and free-text question parsing.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::interview::prompts::{QUESTIONS_PROMPT_TEMPLATE, QUESTIONS_SYSTEM};
use crate::interview::skills::{extract_skills, extract_skills_heuristic};
use crate::interview::Sourced;
use crate::llm_client::TextCompletion;

/// How many questions a generation round aims for.
pub const TARGET_QUESTION_COUNT: usize = 5;
/// Hard cap on questions accepted from one parsed reply.
const PARSE_CAP: usize = 10;
/// How many skills from each document feed the prompt summary.
const PROMPT_SKILL_CAP: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Technical,
    Behavioral,
    Experience,
    #[serde(rename = "Problem-solving")]
    ProblemSolving,
    #[serde(rename = "Follow-up")]
    FollowUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// One interview question. Immutable once created; sequence order is
/// display/navigation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub category: Category,
    pub difficulty: Difficulty,
}

/// Labels assigned to parsed questions by cycling both enumerations in
/// lockstep with one shared counter per parse. The labels rotate rather than
/// reflect question content; preserved as observed behavior.
const CATEGORY_CYCLE: [Category; 4] = [
    Category::Technical,
    Category::Behavioral,
    Category::Experience,
    Category::ProblemSolving,
];
const DIFFICULTY_CYCLE: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

/// Lead words that mark a line as a question even without a list marker.
const LEAD_WORDS: &[&str] = &[
    "what", "how", "why", "describe", "tell", "explain", "can you", "have you", "do you",
];

/// Parses questions out of arbitrary multi-line LLM text.
///
/// Per trimmed line: skip blanks and lines under 10 characters; recognize a
/// numeric list marker (`1.`–`19.`, `1)`–`19)`) or an interrogative lead
/// word; accept when the remaining text exceeds 15 characters.
pub fn parse_questions(text: &str) -> Vec<Question> {
    let mut questions = Vec::new();
    let mut cycle = 0usize;

    for line in text.lines() {
        let line = line.trim();
        if line.len() < 10 {
            continue;
        }

        let question_text = if let Some(rest) = strip_list_marker(line) {
            rest
        } else if has_question_lead(line) {
            line
        } else {
            continue;
        };

        if question_text.chars().count() > 15 {
            questions.push(Question {
                text: question_text.to_string(),
                category: CATEGORY_CYCLE[cycle % CATEGORY_CYCLE.len()],
                difficulty: DIFFICULTY_CYCLE[cycle % DIFFICULTY_CYCLE.len()],
            });
            cycle += 1;

            if questions.len() == PARSE_CAP {
                break;
            }
        }
    }

    questions
}

/// Strips a `1.`–`19.` / `1)`–`19)` marker plus any leading punctuation.
fn strip_list_marker(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 || digits > 2 {
        return None;
    }

    let number: u32 = line[..digits].parse().ok()?;
    if !(1..=19).contains(&number) {
        return None;
    }

    let rest = &line[digits..];
    if !rest.starts_with('.') && !rest.starts_with(')') {
        return None;
    }

    Some(rest.trim_start_matches(['.', ')']).trim_start())
}

fn has_question_lead(line: &str) -> bool {
    let lower = line.to_lowercase();
    LEAD_WORDS.iter().any(|word| lower.starts_with(word))
}

/// Generates the question set for one interview round.
///
/// Job skills come from the LLM strategy, resume skills from the keyword
/// heuristic; both are summarized into one prompt. A short parse is padded
/// from the fixed generic list; a failed LLM call skips parsing entirely and
/// synthesizes questions from the extracted skills.
pub async fn generate_questions(
    llm: &dyn TextCompletion,
    job_description: &str,
    resume: &str,
) -> Sourced<Vec<Question>> {
    let job_skills = extract_skills(llm, job_description, "job description")
        .await
        .into_inner();
    let resume_skills = extract_skills_heuristic(resume);

    let skills_summary = format!(
        "Job requires: {}\nCandidate has: {}",
        join_skills(&job_skills),
        join_skills(&resume_skills),
    );
    let prompt = QUESTIONS_PROMPT_TEMPLATE.replace("{skills_summary}", &skills_summary);

    match llm.complete(&prompt, QUESTIONS_SYSTEM).await {
        Ok(reply) => {
            let mut questions = parse_questions(&reply);
            if questions.len() < TARGET_QUESTION_COUNT {
                let missing = TARGET_QUESTION_COUNT - questions.len();
                questions.extend(
                    padding_questions(job_skills.first().map(String::as_str))
                        .into_iter()
                        .take(missing),
                );
            }
            questions.truncate(TARGET_QUESTION_COUNT);
            Sourced::llm(questions)
        }
        Err(e) => {
            warn!("question generation fell back to skill templates: {e}");
            Sourced::heuristic(fallback_questions(&job_skills, &resume_skills))
        }
    }
}

fn join_skills(skills: &[String]) -> String {
    skills
        .iter()
        .take(PROMPT_SKILL_CAP)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fixed generic questions used to pad a short parse up to the target count.
fn padding_questions(top_job_skill: Option<&str>) -> Vec<Question> {
    let subject = top_job_skill.unwrap_or("this role");
    vec![
        Question {
            text: format!("Tell me about your experience with {subject}."),
            category: Category::Technical,
            difficulty: Difficulty::Medium,
        },
        Question {
            text: "Describe a challenging project you worked on and the outcome.".to_string(),
            category: Category::Experience,
            difficulty: Difficulty::Medium,
        },
        Question {
            text: "How do you handle tight deadlines and pressure?".to_string(),
            category: Category::Behavioral,
            difficulty: Difficulty::Easy,
        },
        Question {
            text: "What motivates you in your work?".to_string(),
            category: Category::Behavioral,
            difficulty: Difficulty::Easy,
        },
        Question {
            text: "Where do you see yourself in 2-3 years?".to_string(),
            category: Category::Behavioral,
            difficulty: Difficulty::Easy,
        },
    ]
}

/// Deepest fallback: skill-templated questions plus two fixed generics.
fn fallback_questions(job_skills: &[String], resume_skills: &[String]) -> Vec<Question> {
    let mut questions: Vec<Question> = job_skills
        .iter()
        .chain(resume_skills)
        .take(3)
        .map(|skill| Question {
            text: format!("Tell me about your experience with {skill}."),
            category: Category::Technical,
            difficulty: Difficulty::Medium,
        })
        .collect();

    questions.push(Question {
        text: "Describe a challenging project you completed.".to_string(),
        category: Category::Experience,
        difficulty: Difficulty::Medium,
    });
    questions.push(Question {
        text: "How do you approach problem-solving?".to_string(),
        category: Category::Behavioral,
        difficulty: Difficulty::Easy,
    });

    questions.truncate(TARGET_QUESTION_COUNT);
    questions
}
