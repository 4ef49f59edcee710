// In-memory, ordered task list.
//
// Insertion order is display order is persisted order. Only 1-based indices
// cross this API; the backing Vec is 0-based.
use crate::error::IndexError;
use crate::model::Task;
use crate::model::matcher::KeywordMatcher;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    fn slot(&self, index: usize) -> Result<usize, IndexError> {
        if index == 0 || index > self.tasks.len() {
            return Err(IndexError::OutOfRange {
                index,
                count: self.tasks.len(),
            });
        }
        Ok(index - 1)
    }

    pub fn get(&self, index: usize) -> Result<&Task, IndexError> {
        let slot = self.slot(index)?;
        Ok(&self.tasks[slot])
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Task, IndexError> {
        let slot = self.slot(index)?;
        Ok(&mut self.tasks[slot])
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Task, IndexError> {
        let slot = self.slot(index)?;
        Ok(self.tasks.remove(slot))
    }

    /// Returns whether the done flag actually changed.
    pub fn mark_at(&mut self, index: usize) -> Result<bool, IndexError> {
        Ok(self.get_mut(index)?.mark_done())
    }

    pub fn unmark_at(&mut self, index: usize) -> Result<bool, IndexError> {
        Ok(self.get_mut(index)?.mark_not_done())
    }

    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Ordered copy, detached from the live list.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    /// New transient list holding copies of the matching tasks, in order.
    pub fn filter(&self, matcher: &KeywordMatcher) -> TaskList {
        Self::from_tasks(
            self.tasks
                .iter()
                .filter(|t| matcher.matches(t))
                .cloned()
                .collect(),
        )
    }
}
