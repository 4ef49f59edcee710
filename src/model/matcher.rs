// Keyword matching used by `find`.
//
// Matching is plain substring containment against the description. Case
// sensitivity is a config choice; the default is case-sensitive.
use crate::model::item::Task;

#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keyword: String,
    case_sensitive: bool,
}

impl KeywordMatcher {
    pub fn new(keyword: &str, case_sensitive: bool) -> Self {
        let keyword = if case_sensitive {
            keyword.to_string()
        } else {
            keyword.to_lowercase()
        };
        Self {
            keyword,
            case_sensitive,
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        if self.case_sensitive {
            task.matches_keyword(&self.keyword)
        } else {
            task.description().to_lowercase().contains(&self.keyword)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_option() {
        let task = Task::todo("Return Library Book").unwrap();
        assert!(!KeywordMatcher::new("book", true).matches(&task));
        assert!(KeywordMatcher::new("book", false).matches(&task));
        assert!(KeywordMatcher::new("LIBRARY", false).matches(&task));
    }

    #[test]
    fn test_multi_word_keyword() {
        let task = Task::todo("Return Library Book").unwrap();
        assert!(KeywordMatcher::new("Library Book", true).matches(&task));
        assert!(!KeywordMatcher::new("Book Library", true).matches(&task));
    }
}
