//! Group interval durations as written in rule files (`30s`, `1m30s`, `2h`).

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]+(?:ms|s|m|h|d|w|y))+$").expect("valid duration regex")
});

static TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)(ms|s|m|h|d|w|y)").expect("valid duration term regex")
});

/// Parse a duration string. `0` alone is accepted as zero.
///
/// Returns `None` for anything that is not a sequence of
/// `<integer><unit>` terms or that overflows.
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value == "0" {
        return Some(Duration::ZERO);
    }
    if !DURATION.is_match(value) {
        return None;
    }

    let mut total_ms: u64 = 0;
    for caps in TERM.captures_iter(value) {
        let amount: u64 = caps[1].parse().ok()?;
        let unit_ms: u64 = match &caps[2] {
            "ms" => 1,
            "s" => 1_000,
            "m" => 60_000,
            "h" => 3_600_000,
            "d" => 86_400_000,
            "w" => 604_800_000,
            "y" => 31_536_000_000,
            _ => return None,
        };
        total_ms = total_ms.checked_add(amount.checked_mul(unit_ms)?)?;
    }
    Some(Duration::from_millis(total_ms))
}

/// Render whole seconds the way rule files carry them; `None` for zero.
pub fn format_interval(seconds: u64) -> Option<String> {
    (seconds > 0).then(|| format!("{seconds}s"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("30s", 30_000)]
    #[case("1m", 60_000)]
    #[case("1m30s", 90_000)]
    #[case("1500ms", 1_500)]
    #[case("2h", 7_200_000)]
    #[case("1d", 86_400_000)]
    #[case("0", 0)]
    #[case("0s", 0)]
    fn test_parse_duration(#[case] input: &str, #[case] millis: u64) {
        assert_eq!(parse_duration(input), Some(Duration::from_millis(millis)));
    }

    #[rstest]
    #[case("")]
    #[case("30")]
    #[case("s30")]
    #[case("1.5m")]
    #[case("30 s")]
    #[case("99999999999999999999y")]
    fn test_parse_duration_rejects(#[case] input: &str) {
        assert_eq!(parse_duration(input), None);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(30), Some("30s".to_string()));
        assert_eq!(format_interval(0), None);
    }
}
