/// Blocking decision engine: URL matching, time containment, verdicts
use url::Url;

use crate::group_data::{BlockCheckResult, SectionGroups, TimeBlock};
use crate::time_utils::is_time_in_range;

/// Extension-internal pages are never candidates for blocking
pub const UNBLOCKABLE_URL_PREFIXES: [&str; 3] =
    ["chrome://", "moz-extension://", "chrome-extension://"];

/// Partial match: the registered URL must occur somewhere in the target.
/// Deliberately substring-based, so "twitter.com" matches
/// "https://twitter.com/home" (and also partial-domain false positives).
pub fn does_url_match(target_url: &str, registered_url: &str) -> bool {
    target_url.contains(registered_url)
}

/// Is `current_time` inside this block, inclusive on both boundaries?
/// Disabled blocks never contain anything.
pub fn is_time_in_block(current_time: &str, block: &TimeBlock) -> bool {
    block.is_enabled() && is_time_in_range(current_time, &block.start, &block.end)
}

/// Any enabled block containing the given time
pub fn is_current_time_blocked(blocks: &[TimeBlock], current_time: &str) -> bool {
    blocks.iter().any(|block| is_time_in_block(current_time, block))
}

/// Decide whether `current_url` should be blocked at `current_time`.
///
/// Groups are evaluated in insertion order and the first group that is
/// enabled, matches the URL, and is inside one of its windows wins; later
/// groups are never looked at. Pure over its inputs.
pub fn check_if_should_block(
    current_url: &str,
    groups: &SectionGroups,
    current_time: &str,
) -> BlockCheckResult {
    if UNBLOCKABLE_URL_PREFIXES
        .iter()
        .any(|prefix| current_url.starts_with(prefix))
    {
        return BlockCheckResult::no_block();
    }

    for (group_name, group) in groups {
        if !group.enabled {
            continue;
        }

        let Some(matched_url) = group
            .urls
            .iter()
            .find(|url| does_url_match(current_url, url))
        else {
            continue;
        };

        if is_current_time_blocked(&group.time_blocks, current_time) {
            return BlockCheckResult::blocked(group_name, current_time, matched_url);
        }
    }

    BlockCheckResult::no_block()
}

/// Build the block page URL carrying the verdict's attribution as query
/// parameters, e.g. `<base>block.html?group=SNS&time=10%3A00&url=twitter.com`
pub fn build_block_page_url(base_url: &str, result: &BlockCheckResult) -> Result<String, String> {
    let mut url = Url::parse(base_url).map_err(|e| format!("Invalid block page URL: {}", e))?;

    url.query_pairs_mut()
        .append_pair("group", result.group_name.as_deref().unwrap_or(""))
        .append_pair("time", result.current_time.as_deref().unwrap_or(""))
        .append_pair("url", result.matched_url.as_deref().unwrap_or(""));

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group_data::SectionGroup;

    fn create_test_group(name: &str, urls: &[&str], blocks: &[(&str, &str)]) -> SectionGroup {
        SectionGroup {
            name: name.to_string(),
            urls: urls.iter().map(|u| u.to_string()).collect(),
            time_blocks: blocks
                .iter()
                .map(|(start, end)| TimeBlock::new(start, end))
                .collect(),
            enabled: true,
        }
    }

    fn groups_of(groups: Vec<SectionGroup>) -> SectionGroups {
        groups.into_iter().map(|g| (g.name.clone(), g)).collect()
    }

    #[test]
    fn test_does_url_match_substring() {
        assert!(does_url_match("https://twitter.com/home", "twitter.com"));
        assert!(does_url_match(
            "https://twitter.com/home",
            "https://twitter.com"
        ));
        assert!(!does_url_match("https://google.com", "twitter.com"));
        // Substring semantics permit partial-domain matches
        assert!(does_url_match("https://xa.com", "a.com"));
        assert!(does_url_match("https://a.com.evil.org", "a.com"));
    }

    #[test]
    fn test_is_time_in_block() {
        let block = TimeBlock::new("09:00", "17:00");
        assert!(is_time_in_block("10:00", &block));
        assert!(is_time_in_block("09:00", &block));
        assert!(is_time_in_block("17:00", &block));
        assert!(!is_time_in_block("18:00", &block));

        let disabled = TimeBlock {
            enabled: Some(false),
            ..block
        };
        assert!(!is_time_in_block("10:00", &disabled));
    }

    #[test]
    fn test_check_empty_groups_never_blocks() {
        let groups = SectionGroups::new();
        let result = check_if_should_block("https://twitter.com/home", &groups, "10:00");
        assert_eq!(result, BlockCheckResult::no_block());
    }

    #[test]
    fn test_check_blocks_with_attribution() {
        let groups = groups_of(vec![create_test_group(
            "SNS",
            &["twitter.com"],
            &[("09:00", "12:00")],
        )]);

        let result = check_if_should_block("https://twitter.com/home", &groups, "10:00");

        assert!(result.should_block);
        assert_eq!(result.group_name.as_deref(), Some("SNS"));
        assert_eq!(result.current_time.as_deref(), Some("10:00"));
        assert_eq!(result.matched_url.as_deref(), Some("twitter.com"));
    }

    #[test]
    fn test_check_skips_disabled_group() {
        let mut group = create_test_group("SNS", &["twitter.com"], &[("09:00", "12:00")]);
        group.enabled = false;
        let groups = groups_of(vec![group]);

        let result = check_if_should_block("https://twitter.com/home", &groups, "10:00");
        assert_eq!(result, BlockCheckResult::no_block());
    }

    #[test]
    fn test_check_outside_window() {
        let groups = groups_of(vec![create_test_group(
            "SNS",
            &["twitter.com"],
            &[("09:00", "12:00")],
        )]);

        let result = check_if_should_block("https://twitter.com/home", &groups, "13:00");
        assert_eq!(result, BlockCheckResult::no_block());
    }

    #[test]
    fn test_check_skips_disabled_time_block() {
        let mut group = create_test_group("SNS", &["twitter.com"], &[("09:00", "12:00")]);
        group.time_blocks[0].enabled = Some(false);
        let groups = groups_of(vec![group]);

        let result = check_if_should_block("https://twitter.com/home", &groups, "10:00");
        assert_eq!(result, BlockCheckResult::no_block());
    }

    #[test]
    fn test_check_first_match_wins() {
        let groups = groups_of(vec![
            create_test_group("First", &["twitter.com"], &[("09:00", "12:00")]),
            create_test_group("Second", &["twitter.com"], &[("09:00", "12:00")]),
        ]);

        let result = check_if_should_block("https://twitter.com/home", &groups, "10:00");
        assert_eq!(result.group_name.as_deref(), Some("First"));

        // Identical inputs, identical output
        let again = check_if_should_block("https://twitter.com/home", &groups, "10:00");
        assert_eq!(result, again);
    }

    #[test]
    fn test_check_first_matching_url_reported() {
        let groups = groups_of(vec![create_test_group(
            "SNS",
            &["facebook.com", "twitter.com"],
            &[("09:00", "12:00")],
        )]);

        let result = check_if_should_block("https://twitter.com/home", &groups, "10:00");
        assert_eq!(result.matched_url.as_deref(), Some("twitter.com"));
    }

    #[test]
    fn test_check_overnight_window() {
        let groups = groups_of(vec![create_test_group(
            "Night",
            &["youtube.com"],
            &[("23:00", "02:00")],
        )]);

        let blocked = check_if_should_block("https://youtube.com", &groups, "00:30");
        assert!(blocked.should_block);

        let free = check_if_should_block("https://youtube.com", &groups, "12:00");
        assert!(!free.should_block);
    }

    #[test]
    fn test_check_extension_pages_never_blocked() {
        let groups = groups_of(vec![create_test_group(
            "All",
            &["chrome"],
            &[("00:00", "23:59")],
        )]);

        let result =
            check_if_should_block("chrome-extension://abc/block.html", &groups, "10:00");
        assert_eq!(result, BlockCheckResult::no_block());
    }

    #[test]
    fn test_check_garbage_time_never_blocks() {
        let groups = groups_of(vec![create_test_group(
            "SNS",
            &["twitter.com"],
            &[("09:00", "12:00")],
        )]);

        let result = check_if_should_block("https://twitter.com/home", &groups, "not-a-time");
        assert!(!result.should_block);

        // Numeric but out-of-range times fall through the same way
        let result = check_if_should_block("https://twitter.com/home", &groups, "71582789:00");
        assert!(!result.should_block);
    }

    #[test]
    fn test_build_block_page_url() {
        let result = BlockCheckResult::blocked("SNS", "10:00", "twitter.com");
        let url = build_block_page_url("chrome-extension://abc/block.html", &result).unwrap();

        assert!(url.starts_with("chrome-extension://abc/block.html?"));
        assert!(url.contains("group=SNS"));
        assert!(url.contains("time=10%3A00"));
        assert!(url.contains("url=twitter.com"));
    }

    #[test]
    fn test_build_block_page_url_invalid_base() {
        let result = BlockCheckResult::no_block();
        assert!(build_block_page_url("not a url", &result).is_err());
    }
}
