//! Shipping / customer contact details

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Where the tiles go, and who to call about them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[validate(length(min = 6, max = 32, message = "phone is invalid"))]
    pub phone: String,
    #[validate(length(min = 1, max = 200, message = "address is required"))]
    pub address1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub address2: Option<String>,
    #[validate(length(min = 1, max = 100, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 1, max = 20, message = "postal code is required"))]
    pub postal: String,
    #[validate(length(min = 1, max = 100, message = "country is required"))]
    pub country: String,
}

impl ShippingDetails {
    /// Case-insensitive substring match over name, phone and email
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.phone.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> ShippingDetails {
        ShippingDetails {
            name: "Alice Johnson".to_string(),
            email: "alice.j@example.com".to_string(),
            phone: "+66 81 234 5678".to_string(),
            address1: "123 Sukhumvit Road".to_string(),
            address2: Some("Apt 4B".to_string()),
            city: "Bangkok".to_string(),
            postal: "10110".to_string(),
            country: "Thailand".to_string(),
        }
    }

    #[test]
    fn test_valid_details_pass() {
        assert!(alice().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_fail() {
        let mut details = alice();
        details.name.clear();
        details.email = "not-an-email".to_string();
        let errors = details.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(!fields.contains_key("city"));
    }

    #[test]
    fn test_matches() {
        let details = alice();
        assert!(details.matches("alice"));
        assert!(details.matches("234 5678"));
        assert!(details.matches("example.com"));
        assert!(!details.matches("bangkok"));
    }
}
