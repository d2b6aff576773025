use crate::domain::{status_label, Task};

/// Case-insensitive substring match on title, description and the localized
/// status label. A blank term matches every task.
pub fn matches_search(task: &Task, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    let haystack = format!(
        "{} {} {}",
        task.title,
        task.description,
        status_label(task.status)
    )
    .to_lowercase();
    haystack.contains(&term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;

    fn task() -> Task {
        Task::new("1", "Fix Login", "Session cookie expires", Status::InProgress, None)
    }

    #[test]
    fn test_empty_term_matches_all() {
        assert!(matches_search(&task(), ""));
        assert!(matches_search(&task(), "   "));
    }

    #[test]
    fn test_matches_title_description_and_status_label() {
        assert!(matches_search(&task(), "login"));
        assert!(matches_search(&task(), "  COOKIE "));
        assert!(matches_search(&task(), "in corso"));
        assert!(!matches_search(&task(), "inprogress"));
        assert!(!matches_search(&task(), "completato"));
    }
}
