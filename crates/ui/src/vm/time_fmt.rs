use chrono::{DateTime, Utc};

/// `HH:MM` label under a chat bubble.
#[must_use]
pub fn format_message_time(value: DateTime<Utc>) -> String {
    value.format("%H:%M").to_string()
}

/// Study-time label, without a trailing `.0` for whole hours.
#[must_use]
pub fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{hours:.0} Jam")
    } else {
        format!("{hours:.1} Jam")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coddy_core::time::fixed_now;

    #[test]
    fn message_time_is_hours_and_minutes() {
        assert_eq!(format_message_time(fixed_now()), "22:13");
    }

    #[test]
    fn hours_drop_zero_fraction() {
        assert_eq!(format_hours(46.0), "46 Jam");
        assert_eq!(format_hours(12.5), "12.5 Jam");
    }
}
