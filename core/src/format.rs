pub const THREE_STAR_LIMIT_MS: u64 = 30_000;
pub const TWO_STAR_LIMIT_MS: u64 = 60_000;

/// `mm:ss`, with minutes growing past two digits for long runs.
pub fn format_clock(elapsed_ms: u64) -> String {
    let total_secs = elapsed_ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

pub fn star_rating(elapsed_ms: u64) -> u8 {
    if elapsed_ms < THREE_STAR_LIMIT_MS {
        3
    } else if elapsed_ms < TWO_STAR_LIMIT_MS {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pads_and_truncates() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59_999), "00:59");
        assert_eq!(format_clock(61_000), "01:01");
        assert_eq!(format_clock(6_000_000), "100:00");
    }

    #[test]
    fn stars_follow_thresholds() {
        assert_eq!(star_rating(29_999), 3);
        assert_eq!(star_rating(30_000), 2);
        assert_eq!(star_rating(59_999), 2);
        assert_eq!(star_rating(60_000), 1);
    }
}
