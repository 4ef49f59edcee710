pub mod adapter;
pub mod display;
pub mod item;
pub mod matcher;
pub mod parser;

pub use item::{Task, TaskKind, TaskUpdate};
