//! Markdown export of a session's evaluations.

use std::fmt::Write;

use super::Session;

/// Renders the evaluation report offered for download. One-shot text
/// formatting; nothing is stored.
pub fn render_report(session: &Session) -> String {
    let mut report = String::from("# Interview Evaluation Report\n\n");

    let _ = writeln!(report, "**Total Questions:** {}", session.questions.len());
    let _ = writeln!(report, "**Answered Questions:** {}", session.evaluations.len());
    let _ = writeln!(
        report,
        "**Average Score:** {:.1}/10",
        session.average_score().unwrap_or(0.0)
    );

    for record in &session.evaluations {
        let _ = writeln!(report, "\n## Question {}", record.question_index + 1);
        let _ = writeln!(report, "**Q:** {}\n", record.question_text);
        let _ = writeln!(report, "**A:** {}\n", record.answer_text);
        let _ = writeln!(report, "**Score:** {}/10\n", record.evaluation.score);
        let _ = writeln!(report, "**Feedback:** {}", record.evaluation.feedback);
    }

    report
}
