//! Address list reconciliation
//!
//! Pure functions computing the new address list from the current one and a
//! desired delta. Membership is an ASCII case-insensitive exact string match,
//! so `2001:DB8::/32` and `2001:db8::/32` are the same entry but `10.0.0.0/8`
//! and `10.0.0.1/8` are not.

use tracing::debug;

/// Check whether `candidate` is already in `list`
pub fn contains(list: &[String], candidate: &str) -> bool {
    list.iter().any(|item| item.eq_ignore_ascii_case(candidate))
}

/// Append every addition not already present
///
/// Existing entries keep their position. Duplicates inside `additions`
/// collapse because each one is checked against the growing list.
pub fn add(current: &[String], additions: &[String]) -> Vec<String> {
    let mut result = current.to_vec();

    for address in additions {
        if contains(&result, address) {
            debug!("ip range [{}] already in IP set", address);
            continue;
        }
        result.push(address.clone());
    }

    result
}

/// Keep every entry of `current` that is not listed in `removals`
pub fn remove(current: &[String], removals: &[String]) -> Vec<String> {
    current
        .iter()
        .filter(|address| !contains(removals, address))
        .cloned()
        .collect()
}

/// Produce an empty address list
pub fn clear() -> Vec<String> {
    Vec::new()
}

/// Compare two lists entry by entry, ignoring ASCII case
pub fn same_list(left: &[String], right: &[String]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(l, r)| l.eq_ignore_ascii_case(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn as_set(items: &[String]) -> std::collections::BTreeSet<String> {
        items.iter().map(|s| s.to_ascii_lowercase()).collect()
    }

    #[test]
    fn test_add_appends_new_entries_only() {
        let current = list(&["1.2.3.0/24"]);
        let result = add(&current, &list(&["1.2.3.0/24", "5.6.7.0/24"]));
        assert_eq!(result, list(&["1.2.3.0/24", "5.6.7.0/24"]));
    }

    #[test]
    fn test_add_empty_delta_is_identity() {
        let current = list(&["1.2.3.0/24", "5.6.7.0/24"]);
        assert_eq!(add(&current, &[]), current);
    }

    #[test]
    fn test_add_collapses_duplicates_in_delta() {
        let result = add(&[], &list(&["9.9.9.0/24", "9.9.9.0/24", "9.9.9.0/24"]));
        assert_eq!(result, list(&["9.9.9.0/24"]));
    }

    #[test]
    fn test_add_matches_case_insensitively() {
        let current = list(&["2001:DB8::/32"]);
        let result = add(&current, &list(&["2001:db8::/32"]));
        assert_eq!(result, current);
    }

    #[test]
    fn test_add_is_idempotent() {
        let current = list(&["1.2.3.0/24", "10.0.0.0/8"]);
        let delta = list(&["10.0.0.0/8", "172.16.0.0/12", "2001:db8::/32"]);

        let once = add(&current, &delta);
        let twice = add(&once, &delta);
        assert_eq!(as_set(&once), as_set(&twice));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_drops_listed_entries() {
        let current = list(&["1.2.3.0/24", "5.6.7.0/24"]);
        let result = remove(&current, &list(&["5.6.7.0/24"]));
        assert_eq!(result, list(&["1.2.3.0/24"]));
    }

    #[test]
    fn test_remove_unknown_entry_is_noop() {
        let current = list(&["1.2.3.0/24"]);
        assert_eq!(remove(&current, &list(&["8.8.8.0/24"])), current);
    }

    #[test]
    fn test_remove_is_idempotent_and_complete() {
        let current = list(&["1.2.3.0/24", "5.6.7.0/24", "2001:DB8::/32", "10.0.0.0/8"]);
        let removals = list(&["5.6.7.0/24", "2001:db8::/32"]);

        let once = remove(&current, &removals);
        assert_eq!(remove(&once, &removals), once);
        assert!(removals.iter().all(|r| !contains(&once, r)));
        assert_eq!(once, list(&["1.2.3.0/24", "10.0.0.0/8"]));
    }

    #[test]
    fn test_clear_is_always_empty() {
        assert!(clear().is_empty());
    }

    #[test]
    fn test_same_list() {
        assert!(same_list(&list(&["A::/16"]), &list(&["a::/16"])));
        assert!(!same_list(&list(&["1.2.3.0/24"]), &list(&[])));
        assert!(!same_list(
            &list(&["1.2.3.0/24", "5.6.7.0/24"]),
            &list(&["5.6.7.0/24", "1.2.3.0/24"])
        ));
    }
}
