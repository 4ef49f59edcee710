// Converts tasks to and from the pipe-delimited save line format:
//
//   (T) | [ ] | <description>
//   (D) | [X] | <description> | <yyyy-MM-dd>
//   (E) | [ ] | <description> | <start label> | <end label>
use crate::error::ValidationError;
use crate::model::item::{Task, TaskKind};
use crate::model::parser::parse_iso_date;
use thiserror::Error;

const DELIMITER: char = '|';
const DONE_MARKER: &str = "[X]";
const PENDING_MARKER: &str = "[ ]";
// Older save files wrote a check mark for done tasks.
const LEGACY_DONE_MARKER: &str = "[✔]";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveLineError {
    #[error("expected {expected} fields for type {tag}, found {found}")]
    FieldCount {
        tag: String,
        expected: usize,
        found: usize,
    },
    #[error("unknown task type '{0}'")]
    UnknownType(String),
    #[error("unknown done marker '{0}'")]
    DoneMarker(String),
    #[error("line is not valid UTF-8 (bad byte at column {0})")]
    Encoding(usize),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A line that could not be restored, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_number: usize,
    pub content: String,
    pub reason: SaveLineError,
}

impl Task {
    pub fn to_save_line(&self) -> String {
        let done = if self.is_done() {
            DONE_MARKER
        } else {
            PENDING_MARKER
        };
        let head = format!("({}) | {} | {}", self.kind().tag(), done, self.description());
        match self.kind() {
            TaskKind::Todo => head,
            TaskKind::Deadline { due } => format!("{} | {}", head, due.format("%Y-%m-%d")),
            TaskKind::Event { start, end } => format!("{} | {} | {}", head, start, end),
        }
    }

    pub fn from_save_line(line: &str) -> Result<Self, SaveLineError> {
        let fields: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();

        let tag = fields[0];
        let expected = match tag {
            "(T)" => 3,
            "(D)" => 4,
            "(E)" => 5,
            _ => return Err(SaveLineError::UnknownType(tag.to_string())),
        };
        if fields.len() != expected {
            return Err(SaveLineError::FieldCount {
                tag: tag.to_string(),
                expected,
                found: fields.len(),
            });
        }

        let done = match fields[1] {
            DONE_MARKER | LEGACY_DONE_MARKER => true,
            PENDING_MARKER => false,
            other => return Err(SaveLineError::DoneMarker(other.to_string())),
        };

        let description = fields[2];
        let task = match tag {
            "(T)" => Task::todo(description)?,
            "(D)" => Task::deadline(description, parse_iso_date(fields[3])?)?,
            _ => Task::event(description, fields[3], fields[4])?,
        };
        Ok(task.with_done(done))
    }
}

/// Restores every well-formed line, collecting the rest instead of failing.
/// Blank lines are ignored silently.
pub fn decode_lines<I, S>(lines: I) -> (Vec<Task>, Vec<SkippedLine>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tasks = Vec::new();
    let mut skipped = Vec::new();

    for (i, line) in lines.into_iter().enumerate() {
        decode_one(i + 1, line.as_ref(), &mut tasks, &mut skipped);
    }
    (tasks, skipped)
}

/// Same as [`decode_lines`], but over the raw file contents.
///
/// Lines split on `\n` (a trailing `\r` is dropped) and are decoded one at a
/// time, so a line that is not UTF-8 is skipped on its own.
pub fn decode_bytes(contents: &[u8]) -> (Vec<Task>, Vec<SkippedLine>) {
    let mut tasks = Vec::new();
    let mut skipped = Vec::new();

    for (i, raw) in contents.split(|b| *b == b'\n').enumerate() {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        match std::str::from_utf8(raw) {
            Ok(line) => decode_one(i + 1, line, &mut tasks, &mut skipped),
            Err(e) => skipped.push(SkippedLine {
                line_number: i + 1,
                content: String::from_utf8_lossy(raw).into_owned(),
                reason: SaveLineError::Encoding(e.valid_up_to() + 1),
            }),
        }
    }
    (tasks, skipped)
}

fn decode_one(
    line_number: usize,
    line: &str,
    tasks: &mut Vec<Task>,
    skipped: &mut Vec<SkippedLine>,
) {
    if line.trim().is_empty() {
        return;
    }
    match Task::from_save_line(line) {
        Ok(task) => tasks.push(task),
        Err(reason) => skipped.push(SkippedLine {
            line_number,
            content: line.to_string(),
            reason,
        }),
    }
}

pub fn encode_lines(tasks: &[Task]) -> Vec<String> {
    tasks.iter().map(Task::to_save_line).collect()
}
