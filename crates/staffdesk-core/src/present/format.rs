//! Human-readable money, duration, and relative-time formatting.

use chrono::{DateTime, Datelike, Utc};

/// Format an amount with its currency, grouping thousands: `$1,234.50`.
pub fn format_money(amount: f64, currency: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    match currency_symbol(currency) {
        Some(symbol) => format!("{sign}{symbol}{grouped}.{cents}"),
        None => format!("{sign}{} {grouped}.{cents}", currency.to_uppercase()),
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code.to_ascii_uppercase().as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "INR" => Some("₹"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

/// Format worked hours as "7h 30m".
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn format_hours(hours: f64) -> String {
    let minutes = (hours.max(0.0) * 60.0).round() as u64;
    let (h, m) = (minutes / 60, minutes % 60);
    match (h, m) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Relative time for feeds: "just now", "5m ago", "yesterday", "Jun 3".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let secs = elapsed.num_seconds();

    if secs < 60 {
        "just now".to_owned()
    } else if secs < 3600 {
        format!("{}m ago", elapsed.num_minutes())
    } else if secs < 86_400 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_days() == 1 {
        "yesterday".to_owned()
    } else if elapsed.num_days() < 7 {
        format!("{}d ago", elapsed.num_days())
    } else if then.year() == now.year() {
        then.format("%b %-d").to_string()
    } else {
        then.format("%b %-d, %Y").to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(format_money(1234.5, "USD"), "$1,234.50");
        assert_eq!(format_money(1_000_000.0, "eur"), "€1,000,000.00");
        assert_eq!(format_money(999.999, "USD"), "$1,000.00");
        assert_eq!(format_money(-42.0, "CHF"), "-CHF 42.00");
        assert_eq!(format_money(0.0, "USD"), "$0.00");
    }

    #[test]
    fn hours_round_to_minutes() {
        assert_eq!(format_hours(7.5), "7h 30m");
        assert_eq!(format_hours(8.0), "8h");
        assert_eq!(format_hours(0.25), "15m");
        assert_eq!(format_hours(-1.0), "0m");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        assert_eq!(time_ago(now - Duration::seconds(20), now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3h ago");
        assert_eq!(time_ago(now - Duration::hours(30), now), "yesterday");
        assert_eq!(time_ago(now - Duration::days(4), now), "4d ago");
        assert_eq!(time_ago(now - Duration::days(7), now), "Jun 3");
        assert_eq!(
            time_ago(Utc.with_ymd_and_hms(2023, 12, 24, 9, 0, 0).unwrap(), now),
            "Dec 24, 2023"
        );
        assert_eq!(time_ago(now + Duration::minutes(3), now), "just now");
    }
}
