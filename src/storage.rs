// Flat-file persistence for the task list.
//
// The whole list is rewritten on every save: lines are written to a sibling
// .tmp file which is then renamed over the save file, all under an exclusive
// lock on a sibling .lock file.
use crate::model::Task;
use crate::model::adapter::{SkippedLine, decode_bytes, encode_lines};
use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs;
use std::path::{Path, PathBuf};

pub const TASK_FILENAME: &str = "cherry.txt";

/// Result of reading the save file.
#[derive(Debug, Default)]
pub struct LoadedTasks {
    pub tasks: Vec<Task>,
    pub skipped: Vec<SkippedLine>,
}

/// Where the session reads its initial list from and writes every change to.
pub trait TaskStorage {
    fn load(&self) -> Result<LoadedTasks>;
    fn save(&self, tasks: &[Task]) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_lock_path(file_path: &Path) -> PathBuf {
        file_path.with_extension("lock")
    }

    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        FileExt::unlock(&file)?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Raw contents of `path`; a missing file reads as empty.
    ///
    /// Bytes, not a `String`: one badly encoded line must not hide the rest.
    pub fn read_all_bytes(path: &Path) -> Result<Vec<u8>> {
        if !path.exists() {
            return Ok(vec![]);
        }
        Self::with_lock(path, || {
            fs::read(path).with_context(|| format!("Failed to read {:?}", path))
        })
    }

    /// Replaces the contents of `path`, creating its directory if needed.
    pub fn write_all_lines(path: &Path, lines: &[String]) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let mut contents = String::new();
        for line in lines {
            contents.push_str(line);
            contents.push('\n');
        }
        Self::with_lock(path, || {
            Self::atomic_write(path, &contents)
                .with_context(|| format!("Failed to save tasks to {:?}", path))
        })
    }
}

impl TaskStorage for LocalStorage {
    fn load(&self) -> Result<LoadedTasks> {
        let contents = Self::read_all_bytes(&self.path)?;
        let (tasks, skipped) = decode_bytes(&contents);
        for bad in &skipped {
            log::warn!(
                "Skipped corrupted line {} in {:?}: {} ({:?})",
                bad.line_number,
                self.path,
                bad.reason,
                bad.content
            );
        }
        log::info!("Loaded {} task(s) from {:?}", tasks.len(), self.path);
        Ok(LoadedTasks { tasks, skipped })
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        Self::write_all_lines(&self.path, &encode_lines(tasks))?;
        log::debug!("Saved {} task(s) to {:?}", tasks.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AppContext, TestContext};
    use crate::model::adapter::SaveLineError;

    #[test]
    fn test_missing_file_loads_empty() {
        let ctx = TestContext::new();
        let storage = LocalStorage::new(ctx.get_data_dir().unwrap().join("none.txt"));
        let loaded = storage.load().unwrap();
        assert!(loaded.tasks.is_empty());
        assert!(loaded.skipped.is_empty());
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_tmp() {
        let ctx = TestContext::new();
        let path = ctx.root.join("nested").join("deeper").join(TASK_FILENAME);
        let storage = LocalStorage::new(&path);

        storage.save(&[Task::todo("buy milk").unwrap()]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "(T) | [ ] | buy milk\n");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_save_replaces_previous_contents() {
        let ctx = TestContext::new();
        let storage = LocalStorage::new(ctx.get_data_dir().unwrap().join(TASK_FILENAME));
        storage
            .save(&[Task::todo("a").unwrap(), Task::todo("b").unwrap()])
            .unwrap();
        storage.save(&[]).unwrap();
        assert_eq!(fs::read_to_string(storage.path()).unwrap(), "");
        assert!(storage.load().unwrap().tasks.is_empty());
    }

    #[test]
    fn test_load_reports_skipped_lines() {
        let ctx = TestContext::new();
        let path = ctx.get_data_dir().unwrap().join(TASK_FILENAME);
        fs::write(&path, "(T) | [ ] | ok\nnot a task\n(D) | [X] | due | 2025-13-01\n").unwrap();

        let loaded = LocalStorage::new(&path).load().unwrap();
        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.skipped.len(), 2);
        assert_eq!(loaded.skipped[1].line_number, 3);
    }

    #[test]
    fn test_non_utf8_line_is_skipped() {
        let ctx = TestContext::new();
        let path = ctx.get_data_dir().unwrap().join(TASK_FILENAME);
        fs::write(
            &path,
            b"(T) | [ ] | good one\n(T) | [ ] | bad \xff byte\n(T) | [X] | good two\n",
        )
        .unwrap();

        let loaded = LocalStorage::new(&path).load().unwrap();
        let names: Vec<&str> = loaded.tasks.iter().map(|t| t.description()).collect();
        assert_eq!(names, vec!["good one", "good two"]);
        assert!(loaded.tasks[1].is_done());
        assert_eq!(loaded.skipped.len(), 1);
        assert_eq!(loaded.skipped[0].line_number, 2);
        assert!(matches!(
            loaded.skipped[0].reason,
            SaveLineError::Encoding(_)
        ));
    }
}
