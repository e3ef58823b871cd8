use std::sync::Arc;

use exam_core::ExamConfig;
use exam_core::model::{AnswerInput, OptionChoice, QuestionId, QuestionStatus, SectionId};
use exam_core::time::fixed_clock;
use services::{
    ExamLoopService, ExamSession, NoFullscreen, Phase, RecordingPrinter, SessionCommand,
    SessionError,
};

fn loop_service() -> ExamLoopService {
    ExamLoopService::new(Arc::new(NoFullscreen), Arc::new(RecordingPrinter::new()))
        .with_clock(fixed_clock())
}

fn started_session(svc: &ExamLoopService) -> ExamSession {
    let blueprint = Arc::new(ExamConfig::default().into_blueprint().unwrap());
    let mut session = ExamSession::new(blueprint).unwrap();
    svc.dispatch(
        &mut session,
        SessionCommand::Login {
            candidate_name: "Meera".into(),
        },
    )
    .unwrap();
    svc.dispatch(&mut session, SessionCommand::Begin { acknowledged: true })
        .unwrap();
    session
}

fn pick(option: u8) -> SessionCommand {
    SessionCommand::Answer(AnswerInput::Select(OptionChoice::new(option).unwrap()))
}

#[test]
fn answering_first_question_moves_to_second() {
    let svc = loop_service();
    let mut session = started_session(&svc);
    assert_eq!(session.questions().len(), 75);

    svc.dispatch(&mut session, pick(2)).unwrap();
    svc.dispatch(&mut session, SessionCommand::SaveAndNext).unwrap();

    let q1 = session.question(QuestionId::new(1)).unwrap();
    assert_eq!(q1.status(), QuestionStatus::Answered);
    assert_eq!(q1.selected_option().map(OptionChoice::value), Some(2));
    assert_eq!(session.current_question().unwrap().id(), QuestionId::new(2));
}

#[test]
fn marking_without_value_keeps_it_empty() {
    let svc = loop_service();
    let mut session = started_session(&svc);
    svc.dispatch(&mut session, SessionCommand::GoTo(2)).unwrap();
    svc.dispatch(&mut session, SessionCommand::MarkForReview).unwrap();

    let q3 = session.question(QuestionId::new(3)).unwrap();
    assert_eq!(q3.status(), QuestionStatus::Marked);
    assert!(!q3.has_value());
    assert_eq!(session.current_index(), 3);
}

#[test]
fn one_right_one_wrong_scores_three() {
    let svc = loop_service();
    let mut session = started_session(&svc);
    svc.dispatch(&mut session, pick(1)).unwrap();
    svc.dispatch(&mut session, SessionCommand::SaveAndNext).unwrap();
    svc.dispatch(&mut session, pick(4)).unwrap();
    svc.dispatch(&mut session, SessionCommand::SaveAndNext).unwrap();
    svc.dispatch(&mut session, SessionCommand::Submit).unwrap();

    let summary = session.submission_summary().unwrap();
    assert_eq!(summary.answered, 2);
    assert_eq!(summary.not_answered, 0);

    svc.dispatch(&mut session, SessionCommand::ConfirmSubmission)
        .unwrap();
    assert_eq!(session.attempted().len(), 2);

    svc.dispatch(
        &mut session,
        SessionCommand::Grade {
            id: QuestionId::new(1),
            is_correct: true,
        },
    )
    .unwrap();

    let err = svc
        .dispatch(&mut session, SessionCommand::FinishVerification)
        .unwrap_err();
    assert_eq!(err, SessionError::UngradedQuestions { remaining: 1 });
    assert_eq!(err.to_string(), "1 questions remain ungraded");
    assert_eq!(session.phase(), Phase::Verifying);

    svc.dispatch(
        &mut session,
        SessionCommand::Grade {
            id: QuestionId::new(2),
            is_correct: false,
        },
    )
    .unwrap();
    svc.dispatch(&mut session, SessionCommand::FinishVerification)
        .unwrap();

    assert_eq!(session.phase(), Phase::Scored);
    let report = session.report().unwrap();
    assert_eq!(report.overall.marks, 3);
    assert_eq!(report.overall.attempted, 2);
    assert_eq!(report.subject("Mathematics").unwrap().marks, 3);
    assert_eq!(report.subject("Physics").unwrap().attempted, 0);

    assert!(
        svc.dispatch(&mut session, SessionCommand::FinishVerification)
            .is_err()
    );
}

#[test]
fn numeric_backspace_drops_last_digit() {
    let svc = loop_service();
    let mut session = started_session(&svc);
    svc.dispatch(&mut session, SessionCommand::GoTo(20)).unwrap();
    assert_eq!(
        session.active_section().unwrap().id(),
        &SectionId::new("math_b")
    );

    svc.dispatch(&mut session, SessionCommand::Answer(AnswerInput::Append("1".into())))
        .unwrap();
    svc.dispatch(&mut session, SessionCommand::Answer(AnswerInput::Append("2".into())))
        .unwrap();
    svc.dispatch(&mut session, SessionCommand::Answer(AnswerInput::Backspace))
        .unwrap();

    let q21 = session.question(QuestionId::new(21)).unwrap();
    assert_eq!(q21.numeric_value(), "1");
    assert_eq!(q21.status(), QuestionStatus::NotVisited);
}

#[test]
fn submit_after_37_ticks_records_elapsed() {
    let svc = loop_service();
    let mut session = started_session(&svc);
    assert_eq!(session.remaining_secs(), 10_800);

    for _ in 0..37 {
        svc.on_tick(&mut session).unwrap();
    }
    svc.dispatch(&mut session, SessionCommand::Submit).unwrap();

    assert_eq!(session.time_spent_secs(), Some(37));
    assert_eq!(session.remaining_secs(), 10_763);

    for _ in 0..5 {
        svc.on_tick(&mut session).unwrap();
    }
    assert_eq!(session.remaining_secs(), 10_763);
    assert_eq!(session.time_spent_secs(), Some(37));
    assert_eq!(session.phase(), Phase::Submitted);
}

#[test]
fn grading_unattempted_question_is_rejected() {
    let svc = loop_service();
    let mut session = started_session(&svc);
    svc.dispatch(&mut session, SessionCommand::MarkForReview).unwrap();
    svc.dispatch(&mut session, SessionCommand::Submit).unwrap();
    svc.dispatch(&mut session, SessionCommand::ConfirmSubmission)
        .unwrap();

    let err = svc
        .dispatch(
            &mut session,
            SessionCommand::Grade {
                id: QuestionId::new(1),
                is_correct: true,
            },
        )
        .unwrap_err();
    assert_eq!(err, SessionError::NotAttempted(QuestionId::new(1)));
    assert!(session.correctness().is_empty());
}

#[test]
fn status_always_matches_content() {
    let svc = loop_service();
    let mut session = started_session(&svc);
    let commands = [
        pick(3),
        SessionCommand::MarkForReview,
        SessionCommand::SaveAndNext,
        pick(1),
        SessionCommand::ClearResponse,
        SessionCommand::SaveAndNext,
        SessionCommand::SelectSection(SectionId::new("chem_b")),
        SessionCommand::Answer(AnswerInput::Append("9".into())),
        SessionCommand::MarkForReview,
        SessionCommand::Answer(AnswerInput::Append("0".into())),
        SessionCommand::SaveAndNext,
    ];
    for command in commands {
        svc.dispatch(&mut session, command).unwrap();
    }

    for q in session.questions() {
        match q.status() {
            QuestionStatus::Answered | QuestionStatus::AnsweredMarked => assert!(q.has_value()),
            QuestionStatus::NotAnswered | QuestionStatus::Marked => assert!(!q.has_value()),
            QuestionStatus::NotVisited => {}
        }
    }
    let counts = session.status_counts();
    assert_eq!(counts.answered_marked, 2);
    assert_eq!(counts.not_answered, 2);
    assert_eq!(counts.answered, 1);
    assert_eq!(counts.attempted(), 3);
}

#[test]
fn advancing_never_moves_backwards_or_past_end() {
    let svc = loop_service();
    let mut session = started_session(&svc);
    let mut last = session.current_index();
    for i in 0..100 {
        let command = if i % 2 == 0 {
            SessionCommand::SaveAndNext
        } else {
            SessionCommand::MarkForReview
        };
        svc.dispatch(&mut session, command).unwrap();
        let now = session.current_index();
        assert!(now >= last);
        assert!(now <= 74);
        last = now;
    }
    assert_eq!(last, 74);
}
