//! Formatting helpers for run summaries.
//!
//! - [`format_with_separator`] - thousands separators (1,234,567)
//! - [`overreach_percent`] - extra addresses relative to the input

/// Format a number with thousands separators (commas).
///
/// # Examples
/// ```
/// use cidrcap::utils::format_with_separator;
/// assert_eq!(format_with_separator(1000), "1,000");
/// assert_eq!(format_with_separator(4294967296), "4,294,967,296");
/// ```
pub fn format_with_separator(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Extra addresses as a percentage of the input addresses.
///
/// Returns 0 for an empty input.
pub fn overreach_percent(input_addresses: u64, output_addresses: u64) -> f64 {
    if input_addresses == 0 {
        return 0.0;
    }
    let extra = output_addresses.saturating_sub(input_addresses);
    (extra as f64 / input_addresses as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_separator() {
        assert_eq!(format_with_separator(0), "0");
        assert_eq!(format_with_separator(42), "42");
        assert_eq!(format_with_separator(999), "999");
        assert_eq!(format_with_separator(1000), "1,000");
        assert_eq!(format_with_separator(123456), "123,456");
        assert_eq!(format_with_separator(1234567), "1,234,567");
        assert_eq!(format_with_separator(1u64 << 32), "4,294,967,296");
    }

    #[test]
    fn test_overreach_percent() {
        assert_eq!(overreach_percent(0, 0), 0.0);
        assert_eq!(overreach_percent(256, 256), 0.0);
        assert_eq!(overreach_percent(256, 512), 100.0);
        assert_eq!(overreach_percent(512, 256), 0.0);
    }
}
