use std::cmp::Ordering;

use crate::domain::format::parse_number;

pub mod entity_table;
pub mod measurement_table;

/// Placeholder rows drawn while a table is loading.
pub const SKELETON_ROWS: usize = 5;

/// Numeric when both sides parse as numbers, otherwise case-folded text with
/// byte order breaking ties.
pub fn compare_text(left: &str, right: &str) -> Ordering {
    match (parse_number(left), parse_number(right)) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        _ => left
            .to_lowercase()
            .cmp(&right.to_lowercase())
            .then_with(|| left.cmp(right)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(compare_text("9", "10"), Ordering::Less);
        assert_eq!(compare_text("2.5", "2.50"), Ordering::Equal);
    }

    #[test]
    fn text_compares_case_insensitively_first() {
        assert_eq!(compare_text("alice", "Bob"), Ordering::Less);
        assert_eq!(compare_text("Bob", "bob"), Ordering::Less);
        assert_eq!(compare_text("10", "abc"), Ordering::Less);
    }
}
