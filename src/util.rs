/// Compact currency amount, e.g. `$950`, `$12.4K`, `$3.10M`.
pub fn format_value(value: f64) -> String {
    const UNITS: [&str; 4] = ["", "K", "M", "B"];

    if !value.is_finite() {
        return "n/a".to_owned();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let mut amount = value.abs();
    let mut unit = 0usize;
    while amount >= 1000.0 && unit < UNITS.len() - 1 {
        amount /= 1000.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{sign}${amount:.0}")
    } else if amount >= 100.0 {
        format!("{sign}${amount:.0}{}", UNITS[unit])
    } else if amount >= 10.0 {
        format!("{sign}${amount:.1}{}", UNITS[unit])
    } else {
        format!("{sign}${amount:.2}{}", UNITS[unit])
    }
}

/// Integer with thousands separators, e.g. `12,345`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }
    formatted
}

/// Shortens `text` to at most `max_chars` characters, ending with an ellipsis.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut shortened = text
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    shortened.push('…');
    shortened
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_pick_a_readable_unit() {
        assert_eq!(format_value(950.0), "$950");
        assert_eq!(format_value(12_400.0), "$12.4K");
        assert_eq!(format_value(3_100_000.0), "$3.10M");
        assert_eq!(format_value(-250_000.0), "-$250K");
        assert_eq!(format_value(f64::NAN), "n/a");
    }

    #[test]
    fn counts_are_grouped_by_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn long_labels_are_truncated() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("Committee to Elect", 8), "Committ…");
    }
}
