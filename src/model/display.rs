use crate::model::item::{Task, TaskKind};

pub trait TaskDisplay {
    fn checkbox_symbol(&self) -> &'static str;
    fn details_suffix(&self) -> String;
    fn to_display_line(&self) -> String;
}

impl TaskDisplay for Task {
    fn checkbox_symbol(&self) -> &'static str {
        if self.is_done() { "[X]" } else { "[ ]" }
    }

    fn details_suffix(&self) -> String {
        match self.kind() {
            TaskKind::Todo => String::new(),
            TaskKind::Deadline { due } => format!(" (by: {})", due.format("%d %b %Y")),
            TaskKind::Event { start, end } => format!(" (from: {} to: {})", start, end),
        }
    }

    // e.g. "(D) [X] pay rent (by: 01 Jan 2025)"
    fn to_display_line(&self) -> String {
        format!(
            "({}) {} {}{}",
            self.kind().tag(),
            self.checkbox_symbol(),
            self.description(),
            self.details_suffix()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_display_lines_per_variant() {
        let todo = Task::todo("buy milk").unwrap();
        assert_eq!(todo.to_display_line(), "(T) [ ] buy milk");

        let due = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let deadline = Task::deadline("pay rent", due).unwrap().with_done(true);
        assert_eq!(deadline.to_display_line(), "(D) [X] pay rent (by: 01 Jan 2025)");

        let event = Task::event("trip", "Mon", "Wed").unwrap();
        assert_eq!(event.to_display_line(), "(E) [ ] trip (from: Mon to: Wed)");
    }
}
