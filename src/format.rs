//! Time formatting for display layers.

/// Formats a second count as zero-padded `HH:MM:SS`.
///
/// Hours do not wrap at 24. Past 99 hours the hour field simply widens
/// beyond two digits: 100 hours renders as `"100:00:00"`.
pub fn elapsed_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_time_zero() {
        assert_eq!(elapsed_time(0), "00:00:00");
    }

    #[test]
    fn test_elapsed_time_minutes_and_seconds() {
        assert_eq!(elapsed_time(61), "00:01:01");
    }

    #[test]
    fn test_elapsed_time_hours() {
        assert_eq!(elapsed_time(3661), "01:01:01");
    }

    #[test]
    fn test_elapsed_time_hours_widen_past_two_digits() {
        assert_eq!(elapsed_time(90000), "25:00:00");
        assert_eq!(elapsed_time(360000), "100:00:00");
    }
}
