use chrono::{DateTime, Local};

/// Format a server timestamp (RFC 3339) for display in the local timezone
///
/// Unparseable input is shown as-is.
pub fn format_message_date(date: &str) -> String {
    match DateTime::parse_from_rfc3339(date) {
        Ok(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        Err(e) => {
            log::debug!("Unparseable message date {}: {}", date, e);
            date.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_passthrough() {
        assert_eq!(format_message_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_valid_date_formats() {
        let formatted = format_message_date("2024-03-01T10:15:00Z");
        assert_eq!(formatted.len(), "2024-03-01 10:15".len());
        assert!(formatted.starts_with("2024-0"));
    }
}
