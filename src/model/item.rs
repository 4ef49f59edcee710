// Core data structures for tasks and their per-variant payloads.
use crate::error::ValidationError;
use chrono::NaiveDate;

/// Variant-specific payload. The shared fields live on [`Task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Todo,
    Deadline { due: NaiveDate },
    Event { start: String, end: String },
}

impl TaskKind {
    /// One-letter tag used by both the save line and the display line.
    pub fn tag(&self) -> &'static str {
        match self {
            TaskKind::Todo => "T",
            TaskKind::Deadline { .. } => "D",
            TaskKind::Event { .. } => "E",
        }
    }
}

/// A single entry in the task list.
///
/// Fields are private: the description and payload only change through
/// [`Task::update`], the done flag through [`Task::mark_done`] and
/// [`Task::mark_not_done`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    description: String,
    done: bool,
    kind: TaskKind,
}

/// Fixed set of fields an `update` command may touch.
///
/// Each variant only honours the fields that make sense for it; the rest are
/// ignored without error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub desc: Option<String>,
    pub by: Option<NaiveDate>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl Task {
    pub fn new(description: &str, kind: TaskKind) -> Result<Self, ValidationError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyField("task description"));
        }
        Ok(Self {
            description: description.to_string(),
            done: false,
            kind,
        })
    }

    pub fn todo(description: &str) -> Result<Self, ValidationError> {
        Self::new(description, TaskKind::Todo)
    }

    pub fn deadline(description: &str, due: NaiveDate) -> Result<Self, ValidationError> {
        Self::new(description, TaskKind::Deadline { due })
    }

    pub fn event(description: &str, start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(
            description,
            TaskKind::Event {
                start: start.trim().to_string(),
                end: end.trim().to_string(),
            },
        )
    }

    /// Builder used when restoring a task from disk.
    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn due(&self) -> Option<NaiveDate> {
        match &self.kind {
            TaskKind::Deadline { due } => Some(*due),
            _ => None,
        }
    }

    /// Returns `false` when the task was already done.
    pub fn mark_done(&mut self) -> bool {
        let changed = !self.done;
        self.done = true;
        changed
    }

    /// Returns `false` when the task was already pending.
    pub fn mark_not_done(&mut self) -> bool {
        let changed = self.done;
        self.done = false;
        changed
    }

    /// Case-sensitive substring test against the description.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        self.description.contains(keyword)
    }

    pub fn update(&mut self, fields: &TaskUpdate) {
        if let Some(desc) = &fields.desc {
            let desc = desc.trim();
            if !desc.is_empty() {
                self.description = desc.to_string();
            }
        }

        match &mut self.kind {
            TaskKind::Todo => {}
            TaskKind::Deadline { due } => {
                if let Some(by) = fields.by {
                    *due = by;
                }
            }
            TaskKind::Event { start, end } => {
                if let Some(from) = &fields.from {
                    *start = from.trim().to_string();
                }
                if let Some(to) = &fields.to {
                    *end = to.trim().to_string();
                }
            }
        }
    }
}
