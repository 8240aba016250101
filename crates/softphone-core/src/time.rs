use chrono::{DateTime, Local, Utc};

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

/// Local wall-clock time of day for a unix timestamp, `HH:MM:SS`.
pub fn format_timestamp_time(ts: i64) -> String {
    let dt = DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .with_timezone(&Local);
    dt.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::format_timestamp_time;
    use chrono::{Local, TimeZone, Utc};

    #[test]
    fn format_matches_local_time() {
        let local = Local.with_ymd_and_hms(2030, 1, 15, 13, 45, 7).unwrap();
        let ts = local.with_timezone(&Utc).timestamp();
        assert_eq!(format_timestamp_time(ts), "13:45:07");
    }
}
