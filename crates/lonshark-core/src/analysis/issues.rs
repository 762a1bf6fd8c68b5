use std::collections::HashMap;

use crate::Issue;

const MAX_EXAMPLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

#[derive(Debug)]
struct IssueEntry {
    severity: Severity,
    message: &'static str,
    count: u64,
    examples: Vec<String>,
}

/// Aggregates issues by id, keeping the first few occurrences as examples.
#[derive(Debug, Default)]
pub(crate) struct IssueTracker {
    entries: HashMap<&'static str, IssueEntry>,
}

impl IssueTracker {
    pub(crate) fn record(
        &mut self,
        id: &'static str,
        severity: Severity,
        message: &'static str,
        example: String,
    ) {
        let entry = self.entries.entry(id).or_insert_with(|| IssueEntry {
            severity,
            message,
            count: 0,
            examples: Vec::new(),
        });
        entry.count += 1;
        if entry.examples.len() < MAX_EXAMPLES {
            entry.examples.push(example);
        }
    }

    pub(crate) fn has_errors(&self) -> bool {
        self.entries
            .values()
            .any(|entry| entry.severity == Severity::Error)
    }

    pub(crate) fn into_issues(self) -> Vec<Issue> {
        let mut entries: Vec<_> = self.entries.into_iter().collect();
        entries.sort_by(|(a_id, a), (b_id, b)| a.severity.cmp(&b.severity).then(a_id.cmp(b_id)));
        entries
            .into_iter()
            .map(|(id, entry)| Issue {
                id: id.to_string(),
                severity: entry.severity.as_str().to_string(),
                message: entry.message.to_string(),
                count: entry.count,
                examples: entry.examples,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{IssueTracker, Severity};

    #[test]
    fn counts_every_occurrence_but_keeps_three_examples() {
        let mut tracker = IssueTracker::default();
        for idx in 0..5 {
            tracker.record("LS-LON-TRUNCATED", Severity::Error, "short", format!("frame {idx}"));
        }
        let issues = tracker.into_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].count, 5);
        assert_eq!(issues[0].examples, vec!["frame 0", "frame 1", "frame 2"]);
    }

    #[test]
    fn errors_sort_before_warnings_then_by_id() {
        let mut tracker = IssueTracker::default();
        tracker.record("LS-A", Severity::Warning, "a", String::new());
        tracker.record("LS-C", Severity::Error, "c", String::new());
        tracker.record("LS-B", Severity::Error, "b", String::new());
        assert!(tracker.has_errors());

        let ids: Vec<_> = tracker.into_issues().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["LS-B", "LS-C", "LS-A"]);
    }

    #[test]
    fn warnings_alone_are_not_errors() {
        let mut tracker = IssueTracker::default();
        tracker.record("LS-A", Severity::Warning, "a", String::new());
        assert!(!tracker.has_errors());
    }
}
