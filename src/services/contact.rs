//! Contact-channel derivation for listing owners.
//!
//! Produces `wa.me` URIs from a stored phone identifier. The identifier is
//! normalized by stripping a leading `+` and then every non-digit; the
//! normalized form is valid only between 7 and 15 digits (international
//! numbering plan bounds).

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

/// Strip a leading `+`, then keep only ASCII digits.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    trimmed.chars().filter(char::is_ascii_digit).collect()
}

/// A phone identifier is usable iff its normalized form has 7-15 digits.
pub fn is_valid_phone(raw: &str) -> bool {
    let digits = normalize_phone(raw).len();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}

/// Build the WhatsApp contact URI, with an optional url-encoded prefilled
/// message.
pub fn whatsapp_url(phone: &str, message: Option<&str>) -> String {
    let digits = normalize_phone(phone);

    match message {
        Some(message) if !message.is_empty() => {
            format!("https://wa.me/{}?text={}", digits, urlencoding::encode(message))
        }
        _ => format!("https://wa.me/{}", digits),
    }
}

/// Default prefilled inquiry for a listing.
pub fn listing_inquiry_message(listing_title: &str) -> String {
    format!(
        "Hi! I'm interested in your listing: {}. Is it still available?",
        listing_title
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_formatting() {
        assert_eq!(normalize_phone("+1 (555) 123-4567"), "15551234567");
        assert_eq!(normalize_phone("030 1234567"), "0301234567");
        assert_eq!(normalize_phone("+49-30-901820"), "4930901820");
    }

    #[test]
    fn test_phone_validation_bounds() {
        assert!(is_valid_phone("+1 (555) 123-4567")); // 11 digits
        assert!(is_valid_phone("1234567")); // exactly 7
        assert!(is_valid_phone("123456789012345")); // exactly 15
        assert!(!is_valid_phone("123456")); // 6 digits
        assert!(!is_valid_phone("1234567890123456")); // 16 digits
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("+"));
    }

    #[test]
    fn test_whatsapp_url_without_message() {
        assert_eq!(
            whatsapp_url("+1 (555) 123-4567", None),
            "https://wa.me/15551234567"
        );
    }

    #[test]
    fn test_whatsapp_url_encodes_message() {
        let url = whatsapp_url("+15551234567", Some("Is this still available?"));
        assert_eq!(
            url,
            "https://wa.me/15551234567?text=Is%20this%20still%20available%3F"
        );
    }

    #[test]
    fn test_inquiry_message_includes_title() {
        let message = listing_inquiry_message("Fresh eggs");
        assert!(message.contains("Fresh eggs"));
    }
}
