// Turns a raw command line into a `Command`.
//
// Grammar (verb is case-insensitive, markers are exact):
//   todo <desc>
//   deadline <desc> /by <yyyy-MM-dd>
//   event <desc> /from <label> /to <label>
//   list | help | bye
//   find <keyword>
//   mark|unmark|delete|duplicate <idx>
//   update <idx> [/desc <d>] [/by <date>] [/from <l>] [/to <l>]
//
// Markers are located by value, not by position, because descriptions are
// free text of any length. Each marker a verb uses must appear exactly once.
use crate::command::Command;
use crate::config::Config;
use crate::error::{CherryResult, IndexError, ParseError, ValidationError};
use crate::model::item::{Task, TaskUpdate};
use chrono::{Local, Months, NaiveDate};
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

pub const MARKER_BY: &str = "/by";
pub const MARKER_FROM: &str = "/from";
pub const MARKER_TO: &str = "/to";
pub const MARKER_DESC: &str = "/desc";

const UPDATE_MARKERS: [&str; 4] = [MARKER_DESC, MARKER_BY, MARKER_FROM, MARKER_TO];

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Verb {
    Todo,
    Deadline,
    Event,
    List,
    Find,
    Mark,
    Unmark,
    Delete,
    Duplicate,
    Update,
    Help,
    #[strum(serialize = "bye")]
    Exit,
}

impl Verb {
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn lookup(word: &str) -> Option<Verb> {
        let lower = word.to_lowercase();
        Verb::iter().find(|v| v.name() == lower)
    }
}

/// Soft sanity bounds for user-supplied dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRules {
    pub max_years_past: u32,
    pub max_years_future: u32,
}

impl Default for DateRules {
    fn default() -> Self {
        Self {
            max_years_past: 10,
            max_years_future: 50,
        }
    }
}

impl DateRules {
    /// Format check, then calendar check, then range check relative to `today`.
    pub fn check(&self, text: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
        let date = parse_iso_date(text)?;

        let earliest = today
            .checked_sub_months(Months::new(self.max_years_past.saturating_mul(12)))
            .unwrap_or(NaiveDate::MIN);
        if date < earliest {
            return Err(ValidationError::DateTooFarPast {
                date,
                years: self.max_years_past,
            });
        }

        let latest = today
            .checked_add_months(Months::new(self.max_years_future.saturating_mul(12)))
            .unwrap_or(NaiveDate::MAX);
        if date > latest {
            return Err(ValidationError::DateTooFarFuture {
                date,
                years: self.max_years_future,
            });
        }
        Ok(date)
    }
}

/// Strict `YYYY-MM-DD` parse. Shared with the save line decoder.
pub fn parse_iso_date(text: &str) -> Result<NaiveDate, ValidationError> {
    let text = text.trim();
    let shape_ok = text.len() == 10
        && text.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(ValidationError::DateFormat(text.to_string()));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidCalendarDate(text.to_string()))
}

#[derive(Debug, Clone)]
pub struct ParserOptions {
    pub max_task_index: usize,
    pub max_field_length: usize,
    pub date_rules: DateRules,
    pub suggestion_distance: usize,
    pub case_sensitive_find: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_task_index: 100,
            max_field_length: 200,
            date_rules: DateRules::default(),
            suggestion_distance: 2,
            case_sensitive_find: true,
        }
    }
}

impl From<&Config> for ParserOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_task_index: config.max_task_index,
            max_field_length: config.max_field_length,
            date_rules: DateRules {
                max_years_past: config.max_years_past,
                max_years_future: config.max_years_future,
            },
            suggestion_distance: config.suggestion_distance,
            case_sensitive_find: config.case_sensitive_find,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandParser {
    options: ParserOptions,
    today: NaiveDate,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl CommandParser {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            today: Local::now().date_naive(),
        }
    }

    /// Pins the reference date used for range checks.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn parse(&self, input: &str) -> CherryResult<Command> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            return Err(ParseError::Empty.into());
        };

        let verb = Verb::lookup(first).ok_or_else(|| ParseError::UnknownVerb {
            verb: first.to_string(),
            suggestion: suggest_verb(first, self.options.suggestion_distance)
                .map(str::to_string),
        })?;

        match verb {
            Verb::Exit => Ok(Command::Exit),
            Verb::List => Ok(Command::List),
            Verb::Help => Ok(Command::Help),
            Verb::Todo => self.parse_todo(&tokens),
            Verb::Deadline => self.parse_deadline(&tokens),
            Verb::Event => self.parse_event(&tokens),
            Verb::Find => self.parse_find(&tokens),
            Verb::Mark => Ok(Command::Mark(self.single_index(&tokens, verb)?)),
            Verb::Unmark => Ok(Command::Unmark(self.single_index(&tokens, verb)?)),
            Verb::Delete => Ok(Command::Delete(self.single_index(&tokens, verb)?)),
            Verb::Duplicate => Ok(Command::Duplicate(self.single_index(&tokens, verb)?)),
            Verb::Update => self.parse_update(&tokens),
        }
    }

    fn parse_todo(&self, tokens: &[&str]) -> CherryResult<Command> {
        let description =
            self.storable_field("task description", &segment(tokens, 1, tokens.len()))?;
        Ok(Command::Add(Task::todo(&description)?))
    }

    fn parse_deadline(&self, tokens: &[&str]) -> CherryResult<Command> {
        let by = require_marker(tokens, MARKER_BY)?;
        let description = self.storable_field("task description", &segment(tokens, 1, by))?;
        let date_text = self.field("deadline date", &segment(tokens, by + 1, tokens.len()))?;
        let due = self.options.date_rules.check(&date_text, self.today)?;
        Ok(Command::Add(Task::deadline(&description, due)?))
    }

    fn parse_event(&self, tokens: &[&str]) -> CherryResult<Command> {
        let from = require_marker(tokens, MARKER_FROM)?;
        let to = require_marker(tokens, MARKER_TO)?;
        if from > to {
            return Err(ValidationError::MarkerOrder {
                first: MARKER_FROM,
                second: MARKER_TO,
            }
            .into());
        }
        let description = self.storable_field("task description", &segment(tokens, 1, from))?;
        let start = self.storable_field("event start", &segment(tokens, from + 1, to))?;
        let end = self.storable_field("event end", &segment(tokens, to + 1, tokens.len()))?;
        Ok(Command::Add(Task::event(&description, &start, &end)?))
    }

    fn parse_find(&self, tokens: &[&str]) -> CherryResult<Command> {
        let keyword = self.field("search keyword", &segment(tokens, 1, tokens.len()))?;
        Ok(Command::Find {
            keyword,
            case_sensitive: self.options.case_sensitive_find,
        })
    }

    fn parse_update(&self, tokens: &[&str]) -> CherryResult<Command> {
        let index = self.parse_index(tokens.get(1).copied())?;

        let mut positions: Vec<(&'static str, usize)> = Vec::new();
        for marker in UPDATE_MARKERS {
            if let Some(pos) = find_marker(tokens, marker)? {
                positions.push((marker, pos));
            }
        }
        let Some(first) = positions.iter().map(|(_, p)| *p).min() else {
            return Err(ParseError::NoUpdateFields.into());
        };
        if first > 2 {
            return Err(ParseError::StrayText(segment(tokens, 2, first)).into());
        }

        let mut fields = TaskUpdate::default();
        for &(marker, pos) in &positions {
            // A value runs until whichever marker comes next, in any order.
            let end = positions
                .iter()
                .map(|(_, p)| *p)
                .filter(|p| *p > pos)
                .min()
                .unwrap_or(tokens.len());
            let raw = segment(tokens, pos + 1, end);
            match marker {
                MARKER_DESC => fields.desc = Some(self.storable_field("task description", &raw)?),
                MARKER_BY => {
                    let text = self.field("deadline date", &raw)?;
                    fields.by = Some(self.options.date_rules.check(&text, self.today)?);
                }
                MARKER_FROM => fields.from = Some(self.storable_field("event start", &raw)?),
                _ => fields.to = Some(self.storable_field("event end", &raw)?),
            }
        }
        Ok(Command::Update { index, fields })
    }

    fn single_index(&self, tokens: &[&str], verb: Verb) -> CherryResult<usize> {
        let index = self.parse_index(tokens.get(1).copied())?;
        if tokens.len() > 2 {
            return Err(ParseError::UnexpectedArguments(verb.name()).into());
        }
        Ok(index)
    }

    fn parse_index(&self, token: Option<&str>) -> CherryResult<usize> {
        let token = token.ok_or(ParseError::MissingArgument("task number"))?;
        let max = self.options.max_task_index;

        match token.parse::<i64>() {
            Ok(value) if value <= 0 => Err(IndexError::NonPositive(token.to_string()).into()),
            Ok(value) if value as u64 > max as u64 => Err(IndexError::AboveLimit {
                value: token.to_string(),
                max,
            }
            .into()),
            Ok(value) => Ok(value as usize),
            Err(_) => {
                // Integers too wide for i64 are still integers.
                let (negative, digits) = match token.strip_prefix('-') {
                    Some(rest) => (true, rest),
                    None => (false, token.strip_prefix('+').unwrap_or(token)),
                };
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    Err(ParseError::NotANumber(token.to_string()).into())
                } else if negative {
                    Err(IndexError::NonPositive(token.to_string()).into())
                } else {
                    Err(IndexError::AboveLimit {
                        value: token.to_string(),
                        max,
                    }
                    .into())
                }
            }
        }
    }

    fn field(&self, name: &'static str, value: &str) -> Result<String, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyField(name));
        }
        if value.chars().count() > self.options.max_field_length {
            return Err(ValidationError::FieldTooLong {
                field: name,
                max: self.options.max_field_length,
            });
        }
        Ok(value.to_string())
    }

    // Fields that end up in the save file must not contain its delimiter.
    fn storable_field(&self, name: &'static str, value: &str) -> Result<String, ValidationError> {
        let value = self.field(name, value)?;
        if value.contains('|') {
            return Err(ValidationError::ReservedCharacter { field: name });
        }
        Ok(value)
    }
}

/// Tokens in `[start, end)` joined with single spaces.
fn segment(tokens: &[&str], start: usize, end: usize) -> String {
    if start >= end || start >= tokens.len() {
        return String::new();
    }
    tokens[start..end.min(tokens.len())].join(" ")
}

/// Position of `marker`, or `None` if absent. Duplicates are an error.
fn find_marker(tokens: &[&str], marker: &'static str) -> Result<Option<usize>, ValidationError> {
    let mut hits = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| **t == marker)
        .map(|(i, _)| i);
    let first = hits.next();
    if hits.next().is_some() {
        return Err(ValidationError::DuplicateMarker(marker));
    }
    Ok(first)
}

fn require_marker(tokens: &[&str], marker: &'static str) -> Result<usize, ValidationError> {
    find_marker(tokens, marker)?.ok_or(ValidationError::MissingMarker(marker))
}

/// Closest known verb within `tolerance` edits, if any.
pub fn suggest_verb(word: &str, tolerance: usize) -> Option<&'static str> {
    let lower = word.to_lowercase();
    Verb::iter()
        .map(|v| (v.name(), levenshtein(&lower, v.name())))
        .filter(|(_, d)| *d <= tolerance)
        .min_by_key(|(_, d)| *d)
        .map(|(name, _)| name)
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distances() {
        assert_eq!(levenshtein("list", "list"), 0);
        assert_eq!(levenshtein("lst", "list"), 1);
        assert_eq!(levenshtein("mrak", "mark"), 2);
        assert_eq!(levenshtein("", "bye"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn test_suggest_verb_within_tolerance() {
        assert_eq!(suggest_verb("lst", 2), Some("list"));
        assert_eq!(suggest_verb("DELTE", 2), Some("delete"));
        assert_eq!(suggest_verb("by", 2), Some("bye"));
        assert_eq!(suggest_verb("xyzzy", 2), None);
        assert_eq!(suggest_verb("lst", 0), None);
    }

    #[test]
    fn test_verb_names_match_table() {
        let names: Vec<&str> = Verb::iter().map(Verb::name).collect();
        assert!(names.contains(&"bye"));
        assert!(names.contains(&"duplicate"));
        assert!(!names.contains(&"exit"));
        for verb in Verb::iter() {
            assert_eq!(Verb::lookup(&verb.name().to_uppercase()), Some(verb));
        }
    }

    #[test]
    fn test_segment_bounds() {
        let tokens = ["a", "b", "c"];
        assert_eq!(segment(&tokens, 1, 3), "b c");
        assert_eq!(segment(&tokens, 2, 2), "");
        assert_eq!(segment(&tokens, 3, 3), "");
        assert_eq!(segment(&tokens, 2, 10), "c");
    }

    #[test]
    fn test_find_marker_counts() {
        let tokens = ["deadline", "x", "/by", "y", "/by", "z"];
        assert_eq!(
            find_marker(&tokens, MARKER_BY),
            Err(ValidationError::DuplicateMarker("/by"))
        );
        assert_eq!(find_marker(&tokens, MARKER_TO), Ok(None));
        assert_eq!(find_marker(&tokens[..4], MARKER_BY), Ok(Some(2)));
    }

    #[test]
    fn test_iso_date_shape() {
        assert!(parse_iso_date("2025-12-31").is_ok());
        assert!(matches!(
            parse_iso_date("2025-1-31"),
            Err(ValidationError::DateFormat(_))
        ));
        assert!(matches!(
            parse_iso_date("31/12/2025"),
            Err(ValidationError::DateFormat(_))
        ));
        assert!(matches!(
            parse_iso_date("2025-02-30"),
            Err(ValidationError::InvalidCalendarDate(_))
        ));
        assert!(matches!(
            parse_iso_date("2024-13-45"),
            Err(ValidationError::InvalidCalendarDate(_))
        ));
    }

    #[test]
    fn test_date_rules_range() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let rules = DateRules::default();
        assert!(rules.check("2015-06-15", today).is_ok());
        assert!(matches!(
            rules.check("2015-06-14", today),
            Err(ValidationError::DateTooFarPast { years: 10, .. })
        ));
        assert!(rules.check("2075-06-15", today).is_ok());
        assert!(matches!(
            rules.check("2075-06-16", today),
            Err(ValidationError::DateTooFarFuture { years: 50, .. })
        ));
    }
}
