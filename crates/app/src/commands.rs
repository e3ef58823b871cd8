use std::fmt;
use std::path::PathBuf;

use exam_core::model::{AnswerInput, OptionChoice, QuestionId, SectionId};
use services::SessionCommand;

/// Actions handled by the terminal shell itself rather than the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalAction {
    LoadPaper(PathBuf),
    ZoomIn,
    ZoomOut,
    Show,
    Help,
    Restart,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Session(SessionCommand),
    Local(LocalAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingArgument { command: &'static str },
    InvalidNumber { raw: String },
    InvalidOption { raw: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(word) => write!(f, "unknown command: {word} (try `help`)"),
            CommandError::MissingArgument { command } => write!(f, "{command} requires a value"),
            CommandError::InvalidNumber { raw } => write!(f, "not a question number: {raw}"),
            CommandError::InvalidOption { raw } => write!(f, "options are 1 to 4, got {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

pub const HELP: &str = "\
login <name>        sign in (login screen)
name <exam name>    rename the exam (login screen)
paper <path.pdf>    attach the question paper (login screen)
accept              accept the declaration and start
go <n>              jump to question n
opt <1-4>           choose an option
type <chars>        append to a numeric answer
back                delete the last numeric character
next | save         save and go to the next question
mark                mark for review and go to the next question
clear               clear the current response
tab <section id>    switch section tab
fs                  toggle fullscreen
zoom in | zoom out  resize the paper viewer
submit              end the exam
confirm             continue to verification
right <n> | wrong <n>   record a verdict
finish              compute the scorecard
print               print the scorecard
restart             start a new attempt after scoring
show | help | quit";

/// Parse one line of user input. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns `CommandError` for unknown words or malformed arguments.
pub fn parse_line(line: &str) -> Result<Option<Input>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word.to_ascii_lowercase().as_str() {
        "login" => session(SessionCommand::Login {
            candidate_name: required(rest, "login")?.to_string(),
        }),
        "name" => session(SessionCommand::SetExamName(required(rest, "name")?.to_string())),
        "paper" => Input::Local(LocalAction::LoadPaper(PathBuf::from(required(rest, "paper")?))),
        "accept" => session(SessionCommand::Begin { acknowledged: true }),
        "begin" => session(SessionCommand::Begin {
            acknowledged: rest.eq_ignore_ascii_case("yes"),
        }),
        "go" => {
            let id = question_number(required(rest, "go")?)?;
            session(SessionCommand::GoTo(id.index().unwrap_or(usize::MAX)))
        }
        "opt" => session(SessionCommand::Answer(AnswerInput::Select(option(required(
            rest, "opt",
        )?)?))),
        "type" => session(SessionCommand::Answer(AnswerInput::Append(
            required(rest, "type")?.to_string(),
        ))),
        "back" => session(SessionCommand::Answer(AnswerInput::Backspace)),
        "next" | "save" => session(SessionCommand::SaveAndNext),
        "mark" => session(SessionCommand::MarkForReview),
        "clear" => session(SessionCommand::ClearResponse),
        "tab" => session(SessionCommand::SelectSection(SectionId::new(required(
            rest, "tab",
        )?))),
        "fs" | "fullscreen" => session(SessionCommand::ToggleFullscreen),
        "zoom" => match rest {
            "in" | "+" => Input::Local(LocalAction::ZoomIn),
            "out" | "-" => Input::Local(LocalAction::ZoomOut),
            "" => return Err(CommandError::MissingArgument { command: "zoom" }),
            other => return Err(CommandError::Unknown(format!("zoom {other}"))),
        },
        "submit" => session(SessionCommand::Submit),
        "confirm" => session(SessionCommand::ConfirmSubmission),
        "right" | "wrong" => session(SessionCommand::Grade {
            id: question_number(required(rest, "grade")?)?,
            is_correct: word.eq_ignore_ascii_case("right"),
        }),
        "finish" => session(SessionCommand::FinishVerification),
        "print" => session(SessionCommand::Print),
        "restart" => Input::Local(LocalAction::Restart),
        "show" => Input::Local(LocalAction::Show),
        "help" | "?" => Input::Local(LocalAction::Help),
        "quit" | "exit" => Input::Local(LocalAction::Quit),
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(Some(input))
}

fn session(command: SessionCommand) -> Input {
    Input::Session(command)
}

fn required<'a>(rest: &'a str, command: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command })
    } else {
        Ok(rest)
    }
}

fn question_number(raw: &str) -> Result<QuestionId, CommandError> {
    raw.parse::<QuestionId>()
        .map_err(|_| CommandError::InvalidNumber {
            raw: raw.to_string(),
        })
}

fn option(raw: &str) -> Result<OptionChoice, CommandError> {
    raw.parse::<u8>()
        .ok()
        .and_then(|value| OptionChoice::new(value).ok())
        .ok_or_else(|| CommandError::InvalidOption {
            raw: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Input {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_line("   "), Ok(None));
    }

    #[test]
    fn question_numbers_are_one_based() {
        assert_eq!(parse("go 21"), Input::Session(SessionCommand::GoTo(20)));
        assert_eq!(
            parse("right 3"),
            Input::Session(SessionCommand::Grade {
                id: QuestionId::new(3),
                is_correct: true
            })
        );
        assert!(matches!(
            parse_line("go 0"),
            Err(CommandError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn options_outside_one_to_four_are_rejected() {
        assert_eq!(
            parse("opt 4"),
            Input::Session(SessionCommand::Answer(AnswerInput::Select(
                OptionChoice::new(4).unwrap()
            )))
        );
        assert_eq!(
            parse_line("opt 5"),
            Err(CommandError::InvalidOption { raw: "5".into() })
        );
    }

    #[test]
    fn names_keep_inner_spaces() {
        assert_eq!(
            parse("login  Asha Rao "),
            Input::Session(SessionCommand::Login {
                candidate_name: "Asha Rao".into()
            })
        );
        assert_eq!(
            parse("type 1.5"),
            Input::Session(SessionCommand::Answer(AnswerInput::Append("1.5".into())))
        );
    }

    #[test]
    fn begin_needs_explicit_yes() {
        assert_eq!(
            parse("begin"),
            Input::Session(SessionCommand::Begin {
                acknowledged: false
            })
        );
        assert_eq!(
            parse("BEGIN yes"),
            Input::Session(SessionCommand::Begin { acknowledged: true })
        );
    }

    #[test]
    fn shell_actions() {
        assert_eq!(parse("zoom in"), Input::Local(LocalAction::ZoomIn));
        assert_eq!(parse("zoom -"), Input::Local(LocalAction::ZoomOut));
        assert_eq!(
            parse("paper ./booklet.pdf"),
            Input::Local(LocalAction::LoadPaper(PathBuf::from("./booklet.pdf")))
        );
        assert_eq!(
            parse_line("login"),
            Err(CommandError::MissingArgument { command: "login" })
        );
        assert_eq!(
            parse_line("dance"),
            Err(CommandError::Unknown("dance".into()))
        );
    }
}
