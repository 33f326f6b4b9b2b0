use lazy_static::lazy_static;
use std::sync::{Arc, RwLock};

// Autocomplete only ever offers this many choices
pub const MAX_SUGGESTIONS: usize = 25;

lazy_static! {
    // Empty until the first refresh; replaced wholesale by the refresh task
    static ref POLL_TAGS: RwLock<Arc<Vec<String>>> = RwLock::new(Arc::new(Vec::new()));
}

pub fn snapshot() -> Arc<Vec<String>> {
    match POLL_TAGS.read() {
        Ok(tags) => Arc::clone(&*tags),
        Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
    }
}

// Only the refresh task calls this
pub fn replace(tags: Vec<String>) {
    let fresh = Arc::new(tags.into_iter().map(|tag| tag.to_lowercase()).collect::<Vec<_>>());
    match POLL_TAGS.write() {
        Ok(mut current) => *current = fresh,
        Err(poisoned) => *poisoned.into_inner() = fresh,
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum TagCheck {
    Known,
    Unknown,
    // Nothing fetched yet, so nothing can be ruled out
    NotLoaded,
}

pub fn check(tags: &[String], tag: &str) -> TagCheck {
    if tags.is_empty() {
        TagCheck::NotLoaded
    } else if tags.iter().any(|known| known == tag) {
        TagCheck::Known
    } else {
        TagCheck::Unknown
    }
}

pub fn suggestions(tags: &[String], typed: &str) -> Vec<String> {
    let typed = typed.to_lowercase();
    tags.iter()
        .filter(|tag| tag.contains(&typed))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}

// Tests that touch the process-wide snapshot hold this so they never interleave
#[cfg(test)]
pub fn snapshot_guard() -> std::sync::MutexGuard<'static, ()> {
    lazy_static! {
        static ref SNAPSHOT_TESTS: std::sync::Mutex<()> = std::sync::Mutex::new(());
    }
    SNAPSHOT_TESTS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> Vec<String> {
        ["stability-fee", "collateral-onboard", "ratification", "risk-parameter"]
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn tag_checks_distinguish_unloaded_cache() {
        assert_eq!(check(&known(), "ratification"), TagCheck::Known);
        assert_eq!(check(&known(), "nope"), TagCheck::Unknown);
        assert_eq!(check(&[], "anything"), TagCheck::NotLoaded);
    }

    #[test]
    fn suggestions_match_substrings_case_insensitively() {
        assert_eq!(suggestions(&known(), "RAT"), vec!["ratification".to_string()]);
        assert_eq!(suggestions(&known(), "").len(), 4);
    }

    #[test]
    fn suggestions_are_capped() {
        let many: Vec<String> = (0..40).map(|i| format!("tag-{}", i)).collect();
        assert_eq!(suggestions(&many, "tag").len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn readers_keep_their_snapshot_across_a_refresh() {
        let _guard = snapshot_guard();
        replace(vec!["Old-Tag".to_string()]);
        let before = snapshot();
        replace(vec!["new-tag".to_string()]);

        assert_eq!(*before, vec!["old-tag".to_string()]);
        assert_eq!(*snapshot(), vec!["new-tag".to_string()]);
    }
}
