//! Student roster helpers.
//!
//! A roster is the list of [`StudentRecord`]s uploaded for a course. Every
//! record carries the same keys (the spreadsheet's column headers); those keys
//! are the variables a course can reference.

use crate::model::StudentRecord;

/// Column that identifies a student when none is configured.
pub const DEFAULT_ID_COLUMN: &str = "Number";

/// Shared key set of a roster, sorted.
///
/// Returns `None` if the records disagree on their keys. An empty roster has
/// an empty key set.
pub fn roster_keys(records: &[StudentRecord]) -> Option<Vec<&str>> {
    let Some((first, rest)) = records.split_first() else {
        return Some(Vec::new());
    };

    let uniform = rest
        .iter()
        .all(|record| record.len() == first.len() && record.keys().eq(first.keys()));

    uniform.then(|| first.keys().map(String::as_str).collect())
}

/// Student identifiers in roster order.
///
/// Records without the id column are skipped.
pub fn student_ids<'a>(records: &'a [StudentRecord], id_column: &str) -> Vec<&'a str> {
    records
        .iter()
        .filter_map(|record| record.get(id_column))
        .map(String::as_str)
        .collect()
}

/// Find the record whose id column equals `id`.
pub fn find_student<'a>(
    records: &'a [StudentRecord],
    id_column: &str,
    id: &str,
) -> Option<&'a StudentRecord> {
    records
        .iter()
        .find(|record| record.get(id_column).is_some_and(|value| value == id))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(pairs: &[(&str, &str)]) -> StudentRecord {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn roster() -> Vec<StudentRecord> {
        vec![
            record(&[("Number", "01"), ("Student", "student01"), ("ip", "10.0.0.1")]),
            record(&[("Number", "02"), ("Student", "student02"), ("ip", "10.0.0.2")]),
        ]
    }

    #[test]
    fn test_roster_keys_uniform() {
        let roster = roster();

        assert_eq!(roster_keys(&roster), Some(vec!["Number", "Student", "ip"]));
    }

    #[test]
    fn test_roster_keys_mismatch() {
        let mut roster = roster();
        roster.push(record(&[("Number", "03")]));

        assert_eq!(roster_keys(&roster), None);
    }

    #[test]
    fn test_roster_keys_empty() {
        assert_eq!(roster_keys(&[]), Some(Vec::new()));
    }

    #[test]
    fn test_student_ids() {
        assert_eq!(student_ids(&roster(), DEFAULT_ID_COLUMN), vec!["01", "02"]);
        assert!(student_ids(&roster(), "pod").is_empty());
    }

    #[test]
    fn test_find_student() {
        let roster = roster();

        let found = find_student(&roster, "Number", "02").unwrap();

        assert_eq!(found["Student"], "student02");
        assert!(find_student(&roster, "Number", "99").is_none());
    }
}
