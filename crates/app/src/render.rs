//! Plain-text screens for each exam phase.

use std::fmt::Write as _;

use exam_core::model::QuestionStatus;
use exam_core::scoring::{CORRECT_MARKS, INCORRECT_MARKS};
use services::{ExamSession, PaletteEntry, Phase, Scorecard, StatusCounts, SubmissionSummary};

use crate::vm::{PaperView, format_clock, format_datetime, format_hours_minutes};

#[must_use]
pub fn status_code(status: QuestionStatus) -> &'static str {
    match status {
        QuestionStatus::NotVisited => "--",
        QuestionStatus::NotAnswered => "NA",
        QuestionStatus::Answered => "AN",
        QuestionStatus::Marked => "MR",
        QuestionStatus::AnsweredMarked => "AM",
    }
}

#[must_use]
pub fn render(session: &ExamSession, view: &PaperView, fullscreen: bool) -> String {
    match session.phase() {
        Phase::Login => login_screen(session),
        Phase::Instructions => instructions_screen(session),
        Phase::Active => active_screen(session, view, fullscreen),
        Phase::Submitted => session
            .submission_summary()
            .map(summary_screen)
            .unwrap_or_default(),
        Phase::Verifying => verification_screen(session),
        Phase::Scored => session
            .scorecard()
            .map(|card| scorecard_text(&card))
            .unwrap_or_default(),
    }
}

fn login_screen(session: &ExamSession) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", session.exam_name());
    match session.paper() {
        Some(paper) => {
            let _ = writeln!(out, "Question paper: {} ({} bytes)", paper.name(), paper.len());
        }
        None => {
            let _ = writeln!(out, "Question paper: none (questions are read from the booklet)");
        }
    }
    out.push_str("Sign in with `login <your name>`.");
    out
}

fn instructions_screen(session: &ExamSession) -> String {
    let blueprint = session.blueprint();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Welcome, {}.",
        session.candidate_name().unwrap_or_default()
    );
    let _ = writeln!(
        out,
        "{}: {} questions, {} minutes.",
        session.exam_name(),
        blueprint.total_questions(),
        blueprint.duration_secs() / 60
    );
    for section in blueprint.sections().sections() {
        let _ = writeln!(
            out,
            "  {:<8} {:<24} Q{}-Q{} ({})",
            section.id(),
            section.label(),
            section.start(),
            section.end(),
            section.kind()
        );
    }
    let _ = writeln!(
        out,
        "Marking: {CORRECT_MARKS:+} for a correct answer, {INCORRECT_MARKS} for an incorrect one, 0 if left blank."
    );
    let _ = writeln!(
        out,
        "The exam is submitted automatically when the timer reaches zero."
    );
    out.push_str("Type `accept` to accept the declaration and start.");
    out
}

fn active_screen(session: &ExamSession, view: &PaperView, fullscreen: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} | {} | Time left {}{}",
        session.exam_name(),
        session.candidate_name().unwrap_or_default(),
        format_clock(session.remaining_secs()),
        if fullscreen { " | fullscreen" } else { "" }
    );

    let active = session.active_section().map(|s| s.id().clone());
    let tabs: Vec<String> = session
        .blueprint()
        .sections()
        .sections()
        .iter()
        .map(|s| {
            if Some(s.id()) == active.as_ref() {
                format!("[{}]", s.id())
            } else {
                s.id().to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "Tabs: {}", tabs.join("  "));

    if let Some(question) = session.current_question() {
        let _ = writeln!(
            out,
            "Question {} ({}, {})",
            question.id(),
            question.subject(),
            question.kind()
        );
        let _ = writeln!(out, "{}", view.caption(session.paper(), question.id()));
        let response = question.response_label();
        let _ = writeln!(
            out,
            "Response: {}",
            if response.is_empty() { "-" } else { response.as_str() }
        );
    }

    let _ = writeln!(out, "{}", palette_line(&session.palette()));
    out.push_str(&legend_line(&session.status_counts()));
    out
}

fn palette_line(entries: &[PaletteEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let marker = if entry.is_current { ">" } else { "" };
            format!("{marker}{}:{}", entry.id, status_code(entry.status))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn legend_line(counts: &StatusCounts) -> String {
    QuestionStatus::ALL
        .iter()
        .map(|status| format!("{} {} {}", status_code(*status), status, counts.get(*status)))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn summary_screen(summary: SubmissionSummary) -> String {
    format!(
        "Exam submitted.\nAnswered: {}\nNot answered: {}\nTime spent: {}\nType `confirm` to verify your answers.",
        summary.answered,
        summary.not_answered,
        format_clock(summary.time_spent_secs)
    )
}

fn verification_screen(session: &ExamSession) -> String {
    let rows = session.verification_rows();
    if rows.is_empty() {
        return "No questions were attempted. Type `finish` to see the scorecard.".to_string();
    }
    let mut out = String::from("Mark each attempted question with `right <n>` or `wrong <n>`.\n");
    for row in &rows {
        let verdict = match row.verdict {
            Some(true) => "right",
            Some(false) => "wrong",
            None => "?",
        };
        let _ = writeln!(
            out,
            "  Q{:<3} {:<12} {:<8} {}",
            row.id.value(),
            row.subject,
            row.response,
            verdict
        );
    }
    if session.ready_to_score() {
        out.push_str("All graded. Type `finish` to see the scorecard.");
    } else {
        let _ = write!(out, "Ungraded: {}", session.ungraded_count());
    }
    if let Some(at) = session.submitted_at() {
        let _ = write!(out, " | submitted {}", format_datetime(at));
    }
    out
}

#[must_use]
pub fn scorecard_text(card: &Scorecard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Scorecard: {} ==", card.exam_name);
    let _ = writeln!(out, "Candidate: {}", card.candidate_name);
    let _ = writeln!(out, "Time spent: {}", format_hours_minutes(card.time_spent_secs));
    let _ = writeln!(
        out,
        "{:<12} {:>9} {:>7} {:>9} {:>6}",
        "Subject", "Attempted", "Correct", "Incorrect", "Marks"
    );
    for row in &card.report.subjects {
        let _ = writeln!(
            out,
            "{:<12} {:>9} {:>7} {:>9} {:>6}",
            row.subject, row.tally.attempted, row.tally.correct, row.tally.incorrect, row.tally.marks
        );
    }
    let overall = &card.report.overall;
    let _ = write!(
        out,
        "{:<12} {:>9} {:>7} {:>9} {:>6}",
        "Total", overall.attempted, overall.correct, overall.incorrect, overall.marks
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use exam_core::ExamConfig;
    use exam_core::model::{AnswerInput, OptionChoice, QuestionId};
    use exam_core::time::fixed_now;

    fn active() -> ExamSession {
        let blueprint = Arc::new(ExamConfig::default().into_blueprint().unwrap());
        let mut session = ExamSession::new(blueprint).unwrap();
        session.login("Asha").unwrap();
        session.begin(true, fixed_now()).unwrap();
        session
    }

    #[test]
    fn active_screen_shows_clock_prompt_and_palette() {
        let mut session = active();
        session
            .set_answer(AnswerInput::Select(OptionChoice::new(2).unwrap()))
            .unwrap();
        session.save_and_next().unwrap();

        let screen = render(&session, &PaperView::default(), false);
        assert!(screen.contains("Time left 03:00:00"));
        assert!(screen.contains("Tabs: [math_a]"));
        assert!(screen.contains("Please read Question Number 2 from your booklet."));
        assert!(screen.contains("1:AN >2:--"));
        assert!(screen.contains("AN answered 1"));
    }

    #[test]
    fn summary_uses_full_clock_format() {
        let mut session = active();
        for _ in 0..37 {
            session.tick(fixed_now()).unwrap();
        }
        session.submit(fixed_now()).unwrap();
        let screen = render(&session, &PaperView::default(), false);
        assert!(screen.contains("Time spent: 00:00:37"));
        assert!(screen.contains("Not answered: 0"));
    }

    #[test]
    fn scorecard_lists_subjects_and_total() {
        let mut session = active();
        session
            .set_answer(AnswerInput::Select(OptionChoice::new(1).unwrap()))
            .unwrap();
        session.save_and_next().unwrap();
        session.submit(fixed_now()).unwrap();
        session.confirm_submission().unwrap();
        session.set_correctness(QuestionId::new(1), true).unwrap();
        session.finish_verification().unwrap();

        let text = scorecard_text(&session.scorecard().unwrap());
        assert!(text.contains("Candidate: Asha"));
        assert!(text.contains("Time spent: 00:00"));
        assert!(text.lines().any(|l| l.starts_with("Mathematics") && l.ends_with('4')));
        assert!(text.lines().any(|l| l.starts_with("Chemistry") && l.ends_with('0')));
        assert!(text.lines().last().unwrap().starts_with("Total"));
    }
}
