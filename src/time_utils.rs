/// Time-range arithmetic for Focus Blocker
///
/// Everything here works on "HH:MM" wall-clock strings. Parse failure never
/// panics: `time_to_minutes` returns None and the predicates answer false,
/// so a garbage time string simply never matches.
use std::sync::OnceLock;

use regex::Regex;

use crate::group_data::TimeBlock;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Convert "HH:MM" to minutes since midnight (0..=1439)
pub fn time_to_minutes(time: &str) -> Option<u32> {
    let (hours, minutes) = time.split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Format hours and minutes as a zero-padded "HH:MM" string
pub fn format_time(hours: u32, minutes: u32) -> String {
    format!("{:02}:{:02}", hours, minutes)
}

/// Validate "HH:MM" format with hour 0-23 and minute 00-59
pub fn is_valid_time_format(time: &str) -> bool {
    static TIME_FORMAT: OnceLock<Regex> = OnceLock::new();
    let re = TIME_FORMAT
        .get_or_init(|| Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").unwrap());
    re.is_match(time)
}

/// Check whether `time` falls inside [start, end], inclusive on both ends.
///
/// A range whose end is earlier than its start spans midnight: 23:00-02:00
/// contains 23:30 and 01:00 but not 12:00.
pub fn is_time_in_range(time: &str, start: &str, end: &str) -> bool {
    let (Some(time), Some(start), Some(end)) = (
        time_to_minutes(time),
        time_to_minutes(start),
        time_to_minutes(end),
    ) else {
        return false;
    };

    if start > end {
        // Overnight range
        time >= start || time <= end
    } else {
        time >= start && time <= end
    }
}

/// Strict range validation used by interactive editing: start must be
/// earlier than end. Overnight input is rejected here even though
/// `is_time_in_range` would evaluate it.
pub fn is_valid_time_range(start: &str, end: &str) -> bool {
    match (time_to_minutes(start), time_to_minutes(end)) {
        (Some(start), Some(end)) => start < end,
        _ => false,
    }
}

/// Overlap test for two same-day ranges. Only meaningful for non-overnight
/// input; the editor guarantees that by validating with
/// `is_valid_time_range` first. For overnight-aware overlap see
/// `time_blocks_overlap`.
pub fn is_time_overlapping(start1: &str, end1: &str, start2: &str, end2: &str) -> bool {
    let (Some(start1), Some(end1), Some(start2), Some(end2)) = (
        time_to_minutes(start1),
        time_to_minutes(end1),
        time_to_minutes(start2),
        time_to_minutes(end2),
    ) else {
        return false;
    };

    (start1 >= start2 && start1 < end2)
        || (end1 > start2 && end1 <= end2)
        || (start1 <= start2 && end1 >= end2)
}

/// Overnight-aware overlap between two time blocks. Disabled blocks never
/// overlap anything; two overnight blocks always share the stretch around
/// midnight.
pub fn time_blocks_overlap(block1: &TimeBlock, block2: &TimeBlock) -> bool {
    if !block1.is_enabled() || !block2.is_enabled() {
        return false;
    }

    let (Some(start1), Some(end1), Some(start2), Some(end2)) = (
        time_to_minutes(&block1.start),
        time_to_minutes(&block1.end),
        time_to_minutes(&block2.start),
        time_to_minutes(&block2.end),
    ) else {
        return false;
    };

    let overnight1 = start1 > end1;
    let overnight2 = start2 > end2;

    match (overnight1, overnight2) {
        (false, false) => !(end1 < start2 || end2 < start1),
        (true, false) => !(start2 > end1 && end2 < start1),
        (false, true) => !(start1 > end2 && end1 < start2),
        (true, true) => true,
    }
}

/// Stable ascending sort by start minutes. Unparseable starts sort first.
pub fn sort_time_blocks_by_start(blocks: &[TimeBlock]) -> Vec<TimeBlock> {
    let mut sorted = blocks.to_vec();
    sorted.sort_by_key(|block| time_to_minutes(&block.start).unwrap_or(0));
    sorted
}

/// Human-readable description of a time block
pub fn format_time_block(block: &TimeBlock) -> String {
    let status = if block.is_enabled() { "Enabled" } else { "Disabled" };
    format!("{} - {} ({})", block.start, block.end, status)
}

/// Minutes since midnight of the next moment the blocking status flips for
/// any enabled block. Values >= 1440 mean the boundary falls tomorrow.
/// None when no enabled block has a parseable range.
pub fn next_status_change(now_minutes: u32, blocks: &[TimeBlock]) -> Option<u32> {
    let mut next: Option<u32> = None;

    for block in blocks.iter().filter(|b| b.is_enabled()) {
        let (Some(start), Some(end)) =
            (time_to_minutes(&block.start), time_to_minutes(&block.end))
        else {
            continue;
        };

        let candidate = if start > end {
            // Overnight block
            if now_minutes <= end {
                end
            } else if now_minutes < start {
                start
            } else {
                end + MINUTES_PER_DAY
            }
        } else if now_minutes < start {
            start
        } else if now_minutes <= end {
            end
        } else {
            start + MINUTES_PER_DAY
        };

        next = Some(match next {
            Some(current) if current <= candidate => current,
            _ => candidate,
        });
    }

    next
}
