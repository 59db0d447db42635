//! Line protocol for the interactive picker.
//!
//! Plain lines are the query. Lines starting with `/` are keys:
//! `/down`, `/up`, `/enter`, `/click N` (1-based), `/reset`, `/quit`.
//! A leading `//` escapes a query that starts with a slash.

use lookout_graph::SearchEvent;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickInput {
    Event(SearchEvent),
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PickInputError {
    #[error("unknown command /{0} (try /down, /up, /enter, /click N, /reset, /quit)")]
    UnknownCommand(String),
    #[error("/click needs a result number starting at 1, got {0:?}")]
    BadPosition(String),
}

pub fn parse_line(line: &str) -> Result<PickInput, PickInputError> {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(escaped) = line.strip_prefix("//") {
        return Ok(PickInput::Event(SearchEvent::QueryChanged(format!(
            "/{escaped}"
        ))));
    }
    let Some(command) = line.strip_prefix('/') else {
        return Ok(PickInput::Event(SearchEvent::QueryChanged(line.to_string())));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let event = match name {
        "down" => SearchEvent::HighlightNext,
        "up" => SearchEvent::HighlightPrevious,
        "enter" => SearchEvent::Confirm,
        "reset" => SearchEvent::Reset,
        "quit" | "q" => return Ok(PickInput::Quit),
        "click" => {
            let arg = parts.next().unwrap_or_default();
            match arg.parse::<usize>() {
                Ok(n) if n >= 1 => SearchEvent::Click(n - 1),
                _ => return Err(PickInputError::BadPosition(arg.to_string())),
            }
        }
        other => return Err(PickInputError::UnknownCommand(other.to_string())),
    };
    Ok(PickInput::Event(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(line: &str) -> SearchEvent {
        match parse_line(line).unwrap() {
            PickInput::Event(event) => event,
            PickInput::Quit => panic!("unexpected quit for {line:?}"),
        }
    }

    #[test]
    fn test_plain_lines_are_queries() {
        assert_eq!(event("computer\n"), SearchEvent::QueryChanged("computer".into()));
        assert_eq!(event(""), SearchEvent::QueryChanged(String::new()));
        assert_eq!(event("  spaced  "), SearchEvent::QueryChanged("  spaced  ".into()));
    }

    #[test]
    fn test_commands() {
        assert_eq!(event("/down"), SearchEvent::HighlightNext);
        assert_eq!(event("/up"), SearchEvent::HighlightPrevious);
        assert_eq!(event("/enter"), SearchEvent::Confirm);
        assert_eq!(event("/reset"), SearchEvent::Reset);
        assert_eq!(event("/click 1"), SearchEvent::Click(0));
        assert_eq!(event("/click 3\r\n"), SearchEvent::Click(2));
        assert_eq!(parse_line("/quit").unwrap(), PickInput::Quit);
    }

    #[test]
    fn test_escaped_slash_is_a_query() {
        assert_eq!(event("//etc"), SearchEvent::QueryChanged("/etc".into()));
    }

    #[test]
    fn test_bad_input() {
        assert_eq!(
            parse_line("/click 0"),
            Err(PickInputError::BadPosition("0".into()))
        );
        assert_eq!(
            parse_line("/click"),
            Err(PickInputError::BadPosition(String::new()))
        );
        assert_eq!(
            parse_line("/jump"),
            Err(PickInputError::UnknownCommand("jump".into()))
        );
    }
}
