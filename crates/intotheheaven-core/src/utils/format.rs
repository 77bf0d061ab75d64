use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// Korea Standard Time offset from UTC, in seconds.
const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Format a mobile number for display.
/// 11 digits become XXX-XXXX-XXXX; anything else is returned unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 11 {
        format!("{}-{}-{}", &digits[0..3], &digits[3..7], &digits[7..11])
    } else {
        phone.to_string()
    }
}

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Calendar date of a date or timestamp string. Timestamps are read in Korea
/// time, which is what members see on their devices.
fn parse_date(date: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        let kst = FixedOffset::east_opt(KST_OFFSET_SECS)?;
        return Some(dt.with_timezone(&kst).date_naive());
    }
    date.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

/// Format a date string as "2025년 1월 5일"
pub fn format_date(date: &str) -> String {
    match parse_date(date) {
        Some(d) => format!("{}년 {}월 {}일", d.year(), d.month(), d.day()),
        None => date.to_string(),
    }
}

/// Week of the month counting partial first weeks, Sunday-started.
pub fn week_of_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    let offset = first.weekday().num_days_from_sunday();
    (date.day() + offset).div_ceil(7)
}

/// Label a gathering date the way groups refer to their meetings: "25년 1월 1주차".
pub fn format_week_label(date: &str) -> Option<String> {
    let d = parse_date(date)?;
    Some(format!(
        "{:02}년 {}월 {}주차",
        d.year() % 100,
        d.month(),
        week_of_month(d)
    ))
}

/// Convert a date ("2025-01-05") and time ("19:30") entered in Korea time to
/// an RFC 3339 UTC timestamp.
pub fn kst_to_utc(date: &str, time: &str) -> Option<String> {
    let naive = NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M").ok()?;
    let kst = FixedOffset::east_opt(KST_OFFSET_SECS)?;
    let local = naive.and_local_timezone(kst).single()?;
    Some(
        local
            .with_timezone(&Utc)
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("01012345678"), "010-1234-5678");
        assert_eq!(format_phone("010-1234-5678"), "010-1234-5678");
        assert_eq!(format_phone("0212345678"), "0212345678");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("가족 건강", 10), "가족 건강");
        assert_eq!(truncate_string("가족의 건강과 평안을 위해", 8), "가족의 건...");
        assert_eq!(truncate_string("abcdef", 2), "ab");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-01-05"), "2025년 1월 5일");
        assert_eq!(format_date("2025-01-05T10:00:00Z"), "2025년 1월 5일");
        assert_eq!(format_date("soon"), "soon");
    }

    #[test]
    fn test_week_of_month() {
        // 2025-01-01 is a Wednesday
        let date = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
        assert_eq!(week_of_month(date(1)), 1);
        assert_eq!(week_of_month(date(4)), 1);
        assert_eq!(week_of_month(date(5)), 2);
        assert_eq!(week_of_month(date(31)), 5);
    }

    #[test]
    fn test_format_week_label() {
        assert_eq!(format_week_label("2025-01-05").as_deref(), Some("25년 1월 2주차"));
        assert_eq!(format_week_label("not a date"), None);
    }

    #[test]
    fn test_kst_to_utc() {
        assert_eq!(
            kst_to_utc("2025-01-05", "19:30").as_deref(),
            Some("2025-01-05T10:30:00.000Z")
        );
        assert_eq!(
            kst_to_utc("2025-01-05", "08:00").as_deref(),
            Some("2025-01-04T23:00:00.000Z")
        );
        assert_eq!(kst_to_utc("2025-01-05", "late"), None);
    }

    #[test]
    fn test_utc_timestamps_display_in_korea_time() {
        let stored = kst_to_utc("2025-01-05", "08:00").unwrap();
        assert_eq!(format_date(&stored), "2025년 1월 5일");
        assert_eq!(format_week_label(&stored).as_deref(), Some("25년 1월 2주차"));

        assert_eq!(format_date("2025-01-31T16:00:00+00:00"), "2025년 2월 1일");
    }
}
