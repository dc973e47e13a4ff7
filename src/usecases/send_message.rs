//! Validation rules applied to every outgoing message.
//!
//! Kept free of session state so the rules stay independently testable: the
//! store passes the current clock reading and the previous accepted send.

use chrono::{DateTime, Utc};

/// Minimum interval between two accepted sends. Rapid repeated taps inside
/// this window are dropped silently.
pub const SEND_DEBOUNCE_MS: i64 = 500;

/// Outcome of the validation step. Rejections are silent by design; tests
/// and logs observe them through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendValidation {
    Accepted { text: String },
    RejectedEmpty,
    RejectedDebounced,
}

/// Trims and validates a draft against the debounce guard.
pub fn validate_send(
    text: &str,
    last_accepted_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> SendValidation {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return SendValidation::RejectedEmpty;
    }

    if let Some(last) = last_accepted_at {
        if (now - last).num_milliseconds() < SEND_DEBOUNCE_MS {
            return SendValidation::RejectedDebounced;
        }
    }

    SendValidation::Accepted {
        text: trimmed.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn rejects_empty_text() {
        assert_eq!(validate_send("", None, t0()), SendValidation::RejectedEmpty);
    }

    #[test]
    fn rejects_whitespace_only_text() {
        assert_eq!(
            validate_send("   \n\t  ", None, t0()),
            SendValidation::RejectedEmpty
        );
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(
            validate_send("  hello  ", None, t0()),
            SendValidation::Accepted {
                text: "hello".to_owned()
            }
        );
    }

    #[test]
    fn accepts_first_send_with_no_history() {
        assert_eq!(
            validate_send("hi", None, t0()),
            SendValidation::Accepted {
                text: "hi".to_owned()
            }
        );
    }

    #[test]
    fn rejects_second_send_inside_the_debounce_window() {
        let second = t0() + Duration::milliseconds(SEND_DEBOUNCE_MS - 1);
        assert_eq!(
            validate_send("hi again", Some(t0()), second),
            SendValidation::RejectedDebounced
        );
    }

    #[test]
    fn accepts_second_send_at_the_debounce_boundary() {
        let second = t0() + Duration::milliseconds(SEND_DEBOUNCE_MS);
        assert!(matches!(
            validate_send("hi again", Some(t0()), second),
            SendValidation::Accepted { .. }
        ));
    }

    #[test]
    fn empty_check_wins_over_the_debounce_guard() {
        let second = t0() + Duration::milliseconds(10);
        assert_eq!(
            validate_send("   ", Some(t0()), second),
            SendValidation::RejectedEmpty
        );
    }
}
