// Error taxonomy surfaced to the user at the session boundary.
//
// Every variant renders to a message meant for direct display. Nothing here
// terminates the session; only the `bye` command does that.
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CherryError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Storage error: {0}")]
    Persistence(String),
}

impl CherryError {
    /// Wraps a filesystem failure, keeping the whole context chain in the message.
    pub fn persistence(err: anyhow::Error) -> Self {
        CherryError::Persistence(format!("{:#}", err))
    }
}

/// Malformed command text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("No user input :(")]
    Empty,
    #[error("Sorry, I don't know the command '{verb}'.{}", suggestion_hint(.suggestion))]
    UnknownVerb {
        verb: String,
        suggestion: Option<String>,
    },
    #[error("Missing {0}")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a valid task number")]
    NotANumber(String),
    #[error("'{0}' takes a single task number and nothing else")]
    UnexpectedArguments(&'static str),
    #[error("Unexpected text '{0}' before the first field marker")]
    StrayText(String),
    #[error("Nothing to update: give at least one of /desc, /by, /from or /to")]
    NoUpdateFields,
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" Did you mean '{}'?", s),
        None => String::new(),
    }
}

/// Task numbers that cannot refer to an existing task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("Task numbers start from 1 (got {0})")]
    NonPositive(String),
    #[error("Task number {value} is too large (maximum is {max})")]
    AboveLimit { value: String, max: usize },
    #[error("Task {index} does not exist, you have {count} task(s) in the list")]
    OutOfRange { index: usize, count: usize },
    #[error("Your list is full ({max} tasks). Delete a task before adding another")]
    ListFull { max: usize },
}

/// Field-level problems: markers, lengths and dates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} not found in command")]
    MissingMarker(&'static str),
    #[error("{0} appears more than once in command")]
    DuplicateMarker(&'static str),
    #[error("{first} must come before {second}")]
    MarkerOrder {
        first: &'static str,
        second: &'static str,
    },
    #[error("Please give a {0}")]
    EmptyField(&'static str),
    #[error("The {field} is too long (maximum {max} characters)")]
    FieldTooLong { field: &'static str, max: usize },
    #[error("The {field} cannot contain the '|' character")]
    ReservedCharacter { field: &'static str },
    #[error("Invalid date format '{0}'. Please use yyyy-MM-dd (E.g. 2025-12-31)")]
    DateFormat(String),
    #[error("'{0}' is not a real calendar date")]
    InvalidCalendarDate(String),
    #[error("{date} is more than {years} years in the past")]
    DateTooFarPast { date: NaiveDate, years: u32 },
    #[error("{date} is more than {years} years in the future")]
    DateTooFarFuture { date: NaiveDate, years: u32 },
}

pub type CherryResult<T> = Result<T, CherryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_verb_message_with_and_without_hint() {
        let with = ParseError::UnknownVerb {
            verb: "lst".to_string(),
            suggestion: Some("list".to_string()),
        };
        assert_eq!(
            with.to_string(),
            "Sorry, I don't know the command 'lst'. Did you mean 'list'?"
        );

        let without = ParseError::UnknownVerb {
            verb: "dance".to_string(),
            suggestion: None,
        };
        assert_eq!(without.to_string(), "Sorry, I don't know the command 'dance'.");
    }

    #[test]
    fn test_persistence_keeps_context_chain() {
        let err = anyhow::anyhow!("disk full").context("Failed to save tasks");
        let wrapped = CherryError::persistence(err);
        assert_eq!(
            wrapped.to_string(),
            "Storage error: Failed to save tasks: disk full"
        );
    }
}
