// Plain-text response formatting. Highlighting is the renderer's business.
use crate::error::CherryError;
use crate::help::{get_command_help, render_help};
use crate::model::Task;
use crate::model::display::TaskDisplay;
use crate::store::TaskList;

const CHECK: &str = "✓";
const CIRCLE: &str = "○";
const CROSS: &str = "✗";

#[derive(Debug, Clone, Copy, Default)]
pub struct Ui;

impl Ui {
    pub fn welcome(&self, count: usize, skipped: usize) -> String {
        let mut s = String::from("Hello! I'm Cherry, your task tracker.\n");
        s.push_str(&format!(
            "You have {} in your list. Type 'help' to see what I can do.",
            plural(count)
        ));
        if skipped > 0 {
            s.push_str(&format!(
                "\n(Skipped {} unreadable line(s) in the save file.)",
                skipped
            ));
        }
        s
    }

    pub fn goodbye(&self) -> String {
        "Bye! Your tasks are saved and ready for next time.".to_string()
    }

    pub fn help(&self) -> String {
        render_help(&get_command_help())
    }

    pub fn task_added(&self, task: &Task, count: usize) -> String {
        format!(
            "Got it. I've added this task:\n  {}\nNow you have {} in the list.",
            task.to_display_line(),
            plural(count)
        )
    }

    pub fn task_duplicated(&self, task: &Task, count: usize) -> String {
        format!(
            "Copied! Added this task again:\n  {}\nNow you have {} in the list.",
            task.to_display_line(),
            plural(count)
        )
    }

    pub fn task_marked(&self, task: &Task) -> String {
        format!(
            "Nice! I've marked this task as done:\n  {} {}",
            CHECK,
            task.to_display_line()
        )
    }

    pub fn already_done(&self, task: &Task) -> String {
        format!("This task is already done:\n  {}", task.to_display_line())
    }

    pub fn task_unmarked(&self, task: &Task) -> String {
        format!(
            "OK, I've marked this task as not done yet:\n  {} {}",
            CIRCLE,
            task.to_display_line()
        )
    }

    pub fn already_pending(&self, task: &Task) -> String {
        format!("This task is not done yet:\n  {}", task.to_display_line())
    }

    pub fn task_deleted(&self, task: &Task, count: usize) -> String {
        format!(
            "Noted. I've removed this task:\n  {} {}\nNow you have {} in the list.",
            CROSS,
            task.to_display_line(),
            plural(count)
        )
    }

    pub fn task_updated(&self, task: &Task) -> String {
        format!("Updated! The task now reads:\n  {}", task.to_display_line())
    }

    pub fn list(&self, tasks: &TaskList) -> String {
        if tasks.is_empty() {
            return "Your task list is empty! Try: todo buy coffee beans".to_string();
        }
        format!("Here are the tasks in your list:\n{}", render_rows(tasks))
    }

    pub fn matches(&self, found: &TaskList, keyword: &str) -> String {
        if found.is_empty() {
            return format!(
                "{} No matching tasks found for '{}'. Try a different keyword.",
                CROSS, keyword
            );
        }
        format!(
            "Here are the matching tasks in your list:\n{}",
            render_rows(found)
        )
    }

    pub fn error(&self, err: &CherryError) -> String {
        format!("Oops! {}", err)
    }
}

fn render_rows(tasks: &TaskList) -> String {
    let mut out = String::new();
    let mut done = 0;
    for (i, task) in tasks.iter().enumerate() {
        if task.is_done() {
            done += 1;
        }
        out.push_str(&format!("{}. {}\n", i + 1, task.to_display_line()));
    }
    out.push_str(&format!(
        "Total: {} | {} {} done | {} {} pending",
        tasks.count(),
        CHECK,
        done,
        CIRCLE,
        tasks.count() - done
    ));
    out
}

fn plural(count: usize) -> String {
    if count == 1 {
        "1 task".to_string()
    } else {
        format!("{} tasks", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_rows_and_summary() {
        let list = TaskList::from_tasks(vec![
            Task::todo("a").unwrap().with_done(true),
            Task::event("b", "Mon", "Tue").unwrap(),
        ]);
        let text = Ui.list(&list);
        assert!(text.contains("1. (T) [X] a\n"));
        assert!(text.contains("2. (E) [ ] b (from: Mon to: Tue)\n"));
        assert!(text.ends_with("Total: 2 | ✓ 1 done | ○ 1 pending"));
    }

    #[test]
    fn test_empty_list_and_no_matches_messages() {
        assert!(Ui.list(&TaskList::new()).contains("empty"));
        assert!(Ui.matches(&TaskList::new(), "xyz").contains("No matching tasks found for 'xyz'"));
    }

    #[test]
    fn test_count_wording() {
        let t = Task::todo("a").unwrap();
        assert!(Ui.task_added(&t, 1).ends_with("Now you have 1 task in the list."));
        assert!(Ui.task_added(&t, 0).ends_with("Now you have 0 tasks in the list."));
    }
}
