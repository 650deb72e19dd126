pub mod config;
pub mod fragments;
pub mod plan;
pub mod session;

use chrono::NaiveDateTime;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a local wall-clock time such as `2026-10-19T09:30`.
pub fn parse_local(input: &str) -> Result<NaiveDateTime, String> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input.trim(), fmt).ok())
        .ok_or_else(|| format!("invalid local datetime '{input}' (expected YYYY-MM-DDTHH:MM)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_local_accepts_common_shapes() {
        let expected = chrono::NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_local("2026-10-19T09:30").unwrap(), expected);
        assert_eq!(parse_local("2026-10-19 09:30:00").unwrap(), expected);
        assert!(parse_local("09:30").is_err());
    }
}
