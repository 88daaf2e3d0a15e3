/// Longest phone number (area code plus mobile number) the questionnaire accepts.
pub const MAX_PHONE_DIGITS: usize = 11;

pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Display formatting applied while the visitor types.
///
/// Returns `None` when the input carries more digits than a Brazilian phone number can hold, in
/// which case the keystroke is discarded. Ten digits render as `(XX) XXXX-XXXX`, eleven as
/// `(XX) XXXXX-XXXX`; shorter inputs stay digits-only until they are complete.
pub fn format_for_display(raw: &str) -> Option<String> {
    let digits = digits_only(raw);
    match digits.len() {
        len if len > MAX_PHONE_DIGITS => None,
        10 => Some(format!(
            "({}) {}-{}",
            &digits[..2],
            &digits[2..6],
            &digits[6..]
        )),
        11 => Some(format!(
            "({}) {}-{}",
            &digits[..2],
            &digits[2..7],
            &digits[7..]
        )),
        _ => Some(digits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_landline_and_mobile_numbers() {
        assert_eq!(
            format_for_display("1133334444").as_deref(),
            Some("(11) 3333-4444")
        );
        assert_eq!(
            format_for_display("11987654321").as_deref(),
            Some("(11) 98765-4321")
        );
    }

    #[test]
    fn reformats_already_formatted_input() {
        assert_eq!(
            format_for_display("(11) 98765-432").as_deref(),
            Some("(11) 9876-5432")
        );
    }

    #[test]
    fn partial_numbers_stay_digits_only() {
        assert_eq!(format_for_display("11 98").as_deref(), Some("1198"));
        assert_eq!(format_for_display("").as_deref(), Some(""));
    }

    #[test]
    fn rejects_overlong_numbers() {
        assert_eq!(format_for_display("119876543210"), None);
    }
}
