use regex::Regex;

use crate::model::task::Task;

/// Compile a case-insensitive matcher. Patterns that are not valid regexes
/// match literally.
pub fn build_matcher(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("(?i){}", pattern))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
        .ok()
}

/// Positions of tasks whose description matches `re` (all tasks if `None`)
pub fn matching_positions(tasks: &[Task], re: Option<&Regex>) -> Vec<usize> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| re.is_none_or(|re| re.is_match(&t.description)))
        .map(|(i, _)| i)
        .collect()
}
