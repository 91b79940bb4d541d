//! Time formatting helpers.

const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

/// Format a duration in seconds using its two most significant units,
/// e.g. `29d 23h` or `4m 10s`. Zero renders as `0s`.
pub fn format_duration(secs: u64) -> String {
    let mut rest = secs;
    let parts: Vec<String> = UNITS
        .iter()
        .filter_map(|&(size, suffix)| {
            let n = rest / size;
            rest %= size;
            (n > 0).then(|| format!("{n}{suffix}"))
        })
        .take(2)
        .collect();
    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_unit() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(61), "1m 1s");
        assert_eq!(format_duration(3_660), "1h 1m");
        assert_eq!(format_duration(30 * 86_400 + 7_200), "30d 2h");
    }

    #[test]
    fn keeps_two_most_significant_units() {
        assert_eq!(format_duration(86_400 + 3_600 + 61), "1d 1h");
        assert_eq!(format_duration(86_400 + 5), "1d 5s");
    }
}
