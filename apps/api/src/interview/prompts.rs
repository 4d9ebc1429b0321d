// All LLM prompt constants for the interview pipeline.

/// System prompt for skill extraction calls.
pub const SKILLS_SYSTEM: &str =
    "You are a technical recruiter extracting skills from hiring documents. \
    Respond with a single comma-separated list and nothing else.";

/// Skill extraction template. Replace `{doc_type}` and `{text}` before sending.
pub const SKILLS_PROMPT_TEMPLATE: &str =
    "List ONLY the technical skills from this {doc_type} (comma-separated, max 10 skills):\n\n{text}";

/// System prompt for question generation.
pub const QUESTIONS_SYSTEM: &str =
    "You are an experienced interviewer preparing questions for a screening round. \
    Respond with a numbered list and nothing else.";

/// Question generation template. Replace `{skills_summary}` before sending.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"{skills_summary}

Generate 5 interview questions (mix of technical and behavioral). Format:
1. [Question text]
2. [Question text]
..."#;

/// System prompt for answer evaluation.
pub const EVALUATION_SYSTEM: &str =
    "You are an interviewer scoring a candidate's answer. Follow the requested format exactly.";

/// Answer evaluation template. Replace `{question}` and `{answer}`.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Q: {question}
A: {answer}

Rate this answer 0-10 and give brief feedback (2-3 sentences). Format:
Score: X/10
Feedback: [your feedback]
Strengths: [1-2 points]
Improvements: [1-2 points]"#;

/// System prompt for follow-up generation.
pub const FOLLOWUP_SYSTEM: &str =
    "You are an interviewer probing deeper into a candidate's previous answer.";

/// Follow-up template. Replace `{question}` and `{answer}`.
pub const FOLLOWUP_PROMPT_TEMPLATE: &str = r#"Previous Q: {question}
Previous A: {answer}

Generate 1 follow-up question to dig deeper. Just write the question."#;
