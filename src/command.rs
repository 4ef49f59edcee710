//! One executable operation per verb.
//!
//! A `Command` is built by the parser, executed exactly once against the
//! session's task list, then dropped. Every mutating command persists the
//! whole list before returning; any index failure aborts before anything is
//! changed or written.
use crate::error::{CherryError, CherryResult};
use crate::model::matcher::KeywordMatcher;
use crate::model::{Task, TaskUpdate};
use crate::storage::TaskStorage;
use crate::store::TaskList;
use crate::ui::Ui;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Task),
    List,
    Find {
        keyword: String,
        case_sensitive: bool,
    },
    Mark(usize),
    Unmark(usize),
    Delete(usize),
    Duplicate(usize),
    Update {
        index: usize,
        fields: TaskUpdate,
    },
    Help,
    Exit,
}

/// Text to show the user, plus whether the session should end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub text: String,
    pub exit: bool,
}

impl Response {
    fn reply(text: String) -> Self {
        Self { text, exit: false }
    }
}

impl Command {
    /// Commands that append a task and so need room in the list.
    pub fn adds_task(&self) -> bool {
        matches!(self, Command::Add(_) | Command::Duplicate(_))
    }

    pub fn execute(
        self,
        tasks: &mut TaskList,
        ui: &Ui,
        storage: &dyn TaskStorage,
    ) -> CherryResult<Response> {
        match self {
            Command::Add(task) => {
                tasks.add(task);
                persist(tasks, storage)?;
                let added = tasks.get(tasks.count())?;
                Ok(Response::reply(ui.task_added(added, tasks.count())))
            }
            Command::List => Ok(Response::reply(ui.list(tasks))),
            Command::Find {
                keyword,
                case_sensitive,
            } => {
                let found = tasks.filter(&KeywordMatcher::new(&keyword, case_sensitive));
                Ok(Response::reply(ui.matches(&found, &keyword)))
            }
            Command::Mark(index) => {
                if !tasks.mark_at(index)? {
                    return Ok(Response::reply(ui.already_done(tasks.get(index)?)));
                }
                persist(tasks, storage)?;
                Ok(Response::reply(ui.task_marked(tasks.get(index)?)))
            }
            Command::Unmark(index) => {
                if !tasks.unmark_at(index)? {
                    return Ok(Response::reply(ui.already_pending(tasks.get(index)?)));
                }
                persist(tasks, storage)?;
                Ok(Response::reply(ui.task_unmarked(tasks.get(index)?)))
            }
            Command::Delete(index) => {
                let removed = tasks.remove_at(index)?;
                persist(tasks, storage)?;
                Ok(Response::reply(ui.task_deleted(&removed, tasks.count())))
            }
            Command::Duplicate(index) => {
                let copy = tasks.get(index)?.clone();
                tasks.add(copy);
                persist(tasks, storage)?;
                let added = tasks.get(tasks.count())?;
                Ok(Response::reply(ui.task_duplicated(added, tasks.count())))
            }
            Command::Update { index, fields } => {
                tasks.get_mut(index)?.update(&fields);
                persist(tasks, storage)?;
                Ok(Response::reply(ui.task_updated(tasks.get(index)?)))
            }
            Command::Help => Ok(Response::reply(ui.help())),
            Command::Exit => Ok(Response {
                text: ui.goodbye(),
                exit: true,
            }),
        }
    }
}

fn persist(tasks: &TaskList, storage: &dyn TaskStorage) -> CherryResult<()> {
    storage.save(&tasks.snapshot()).map_err(|e| {
        log::error!("Failed to save task list: {:#}", e);
        CherryError::persistence(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexError;
    use crate::storage::LoadedTasks;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingStorage {
        saves: RefCell<Vec<Vec<String>>>,
    }

    impl TaskStorage for RecordingStorage {
        fn load(&self) -> anyhow::Result<LoadedTasks> {
            Ok(LoadedTasks::default())
        }

        fn save(&self, tasks: &[Task]) -> anyhow::Result<()> {
            self.saves
                .borrow_mut()
                .push(tasks.iter().map(Task::to_save_line).collect());
            Ok(())
        }
    }

    fn two_tasks() -> TaskList {
        TaskList::from_tasks(vec![
            Task::todo("read book").unwrap(),
            Task::event("trip", "Mon", "Wed").unwrap(),
        ])
    }

    #[test]
    fn test_read_only_commands_never_save() {
        let storage = RecordingStorage::default();
        let mut tasks = two_tasks();
        for cmd in [
            Command::List,
            Command::Help,
            Command::Find {
                keyword: "zzz".to_string(),
                case_sensitive: true,
            },
        ] {
            assert!(!cmd.adds_task());
            let resp = cmd.execute(&mut tasks, &Ui, &storage).unwrap();
            assert!(!resp.exit);
        }
        assert!(storage.saves.borrow().is_empty());
        assert_eq!(tasks, two_tasks());
    }

    #[test]
    fn test_exit_signals_without_mutation() {
        let storage = RecordingStorage::default();
        let mut tasks = two_tasks();
        let resp = Command::Exit.execute(&mut tasks, &Ui, &storage).unwrap();
        assert!(resp.exit);
        assert!(storage.saves.borrow().is_empty());
        assert_eq!(tasks, two_tasks());
    }

    #[test]
    fn test_bad_index_is_atomic() {
        let storage = RecordingStorage::default();
        for cmd in [
            Command::Mark(3),
            Command::Unmark(3),
            Command::Delete(3),
            Command::Duplicate(3),
            Command::Update {
                index: 3,
                fields: TaskUpdate {
                    desc: Some("x".to_string()),
                    ..Default::default()
                },
            },
        ] {
            let mut tasks = two_tasks();
            let err = cmd.execute(&mut tasks, &Ui, &storage).unwrap_err();
            assert_eq!(
                err,
                CherryError::Index(IndexError::OutOfRange { index: 3, count: 2 })
            );
            assert_eq!(tasks, two_tasks());
        }
        assert!(storage.saves.borrow().is_empty());
    }

    #[test]
    fn test_duplicate_is_independent_copy() {
        let storage = RecordingStorage::default();
        let mut tasks = two_tasks();
        Command::Duplicate(1)
            .execute(&mut tasks, &Ui, &storage)
            .unwrap();
        Command::Mark(3).execute(&mut tasks, &Ui, &storage).unwrap();

        assert_eq!(tasks.count(), 3);
        assert!(!tasks.get(1).unwrap().is_done());
        assert!(tasks.get(3).unwrap().is_done());
        assert_eq!(storage.saves.borrow().len(), 2);
        assert_eq!(storage.saves.borrow()[1][2], "(T) | [X] | read book");
    }

    #[test]
    fn test_remark_is_a_no_op() {
        let storage = RecordingStorage::default();
        let mut tasks = two_tasks();
        Command::Mark(1).execute(&mut tasks, &Ui, &storage).unwrap();
        let resp = Command::Mark(1).execute(&mut tasks, &Ui, &storage).unwrap();
        assert!(resp.text.contains("already done"));
        assert_eq!(storage.saves.borrow().len(), 1);

        let resp = Command::Unmark(2)
            .execute(&mut tasks, &Ui, &storage)
            .unwrap();
        assert!(resp.text.contains("not done yet"));
        assert_eq!(storage.saves.borrow().len(), 1);
    }
}
