//! Session controller: owns the task list for the lifetime of a session.
//!
//! Front ends (the REPL in `bin/cherry.rs`, or any other renderer) only call
//! [`Session::handle`] with a raw line and print what comes back, then check
//! [`Session::is_exit_requested`]. Errors never escape `handle`; they are
//! rendered as messages and the session carries on.
use crate::config::Config;
use crate::error::{CherryError, CherryResult, IndexError};
use crate::model::parser::{CommandParser, ParserOptions};
use crate::storage::TaskStorage;
use crate::store::TaskList;
use crate::ui::Ui;

pub struct Session {
    tasks: TaskList,
    parser: CommandParser,
    ui: Ui,
    storage: Box<dyn TaskStorage>,
    skipped_on_load: usize,
    exit_requested: bool,
}

impl Session {
    pub fn new(tasks: TaskList, parser: CommandParser, storage: Box<dyn TaskStorage>) -> Self {
        Self {
            tasks,
            parser,
            ui: Ui,
            storage,
            skipped_on_load: 0,
            exit_requested: false,
        }
    }

    /// Loads the saved list through `storage`.
    ///
    /// A load failure (other than a missing file) is returned rather than
    /// starting empty, so the next save cannot clobber a file we failed to read.
    pub fn open(storage: Box<dyn TaskStorage>, config: &Config) -> CherryResult<Self> {
        let loaded = storage.load().map_err(CherryError::persistence)?;
        let parser = CommandParser::new(ParserOptions::from(config));
        let mut session = Self::new(TaskList::from_tasks(loaded.tasks), parser, storage);
        session.skipped_on_load = loaded.skipped.len();
        log::info!(
            "Session started with {} task(s), {} line(s) skipped",
            session.tasks.count(),
            session.skipped_on_load
        );
        Ok(session)
    }

    pub fn welcome(&self) -> String {
        self.ui.welcome(self.tasks.count(), self.skipped_on_load)
    }

    /// Parses and runs one command line, returning the text to show.
    pub fn handle(&mut self, line: &str) -> String {
        match self.run(line) {
            Ok(text) => text,
            Err(err) => {
                log::debug!("Command {:?} failed: {}", line.trim(), err);
                self.ui.error(&err)
            }
        }
    }

    fn run(&mut self, line: &str) -> CherryResult<String> {
        let command = self.parser.parse(line)?;
        // Tasks past the index limit could never be addressed again.
        let max = self.parser.options().max_task_index;
        if command.adds_task() && self.tasks.count() >= max {
            return Err(IndexError::ListFull { max }.into());
        }
        log::debug!("Executing {:?}", command);
        let response = command.execute(&mut self.tasks, &self.ui, self.storage.as_ref())?;
        if response.exit {
            self.exit_requested = true;
        }
        Ok(response.text)
    }

    pub fn is_exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }
}
