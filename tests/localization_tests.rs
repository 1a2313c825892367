//! # Localization Tests
//!
//! This module contains unit tests for the localization functionality,
//! testing message retrieval and formatting with various edge cases.

use food_ticket_bot::localization::LocalizationManager;
use std::collections::HashMap;

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_localization() -> LocalizationManager {
        // Create a new localization manager for each test
        LocalizationManager::new().expect("Failed to create localization manager")
    }

    #[test]
    fn test_get_message_existing_key() {
        let manager = setup_localization();

        let message = manager.get_message_in_language("welcome", "fa", None);
        assert_eq!(message, "به ربات بلیت غذا خوش آمدید!");
    }

    #[test]
    fn test_get_message_nonexistent_key() {
        let manager = setup_localization();

        let message = manager.get_message_in_language("nonexistent-key", "fa", None);
        assert!(message.starts_with("Missing translation:"));
    }

    #[test]
    fn test_get_message_unsupported_language() {
        let manager = setup_localization();

        let message = manager.get_message_in_language("status-valid", "unsupported", None);
        // Should fall back to Persian
        assert_eq!(message, "معتبر");
    }

    #[test]
    fn test_get_message_with_args() {
        let manager = setup_localization();

        let mut args = HashMap::new();
        args.insert("title", "Dinner");
        args.insert("status", "Used");

        let message = manager.get_message_in_language("ticket-caption", "en", Some(&args));
        assert_eq!(message, "🎫 Dinner ticket\nStatus: Used");
    }

    #[test]
    fn test_get_message_missing_args() {
        let manager = setup_localization();

        // Missing args render as the placeable name rather than failing
        let message = manager.get_message_in_language("user-info", "en", None);
        assert!(message.starts_with("User information:"));
    }

    #[test]
    fn test_every_key_exists_in_both_languages() {
        let manager = setup_localization();
        let keys = [
            "welcome",
            "ticket-button",
            "ask-id-number",
            "user-info",
            "ticket-caption",
            "status-valid",
            "status-used",
            "no-tickets",
            "use-ticket-button",
            "error-qr-download",
            "error-qr-send",
            "error-fetch-failed",
            "error-generic",
        ];

        for key in keys {
            for language in ["fa", "en"] {
                let message = manager.get_message_in_language(key, language, None);
                assert!(
                    !message.starts_with("Missing"),
                    "{key} missing for {language}"
                );
            }
            assert_ne!(
                manager.get_message_in_language(key, "fa", None),
                manager.get_message_in_language(key, "en", None)
            );
        }
    }

    #[test]
    fn test_matches_label() {
        let manager = setup_localization();

        assert!(manager.matches_label("ticket-button", "دریافت بلیت غذا"));
        assert!(manager.matches_label("ticket-button", "Get food ticket"));
        assert!(!manager.matches_label("ticket-button", "Get food tickets"));
    }

    #[test]
    fn test_language_detection() {
        use food_ticket_bot::localization::{detect_language, is_supported_language};

        assert_eq!(detect_language(Some("fa")), "fa");
        assert_eq!(detect_language(Some("fa-IR")), "fa");
        assert_eq!(detect_language(Some("en")), "en");
        assert_eq!(detect_language(Some("en-US")), "en");
        assert_eq!(detect_language(None), "fa"); // Default to Persian
        assert_eq!(detect_language(Some("unsupported")), "fa");

        assert!(is_supported_language("EN_gb"));
        assert!(!is_supported_language("de"));
    }

    #[test]
    fn test_convenience_functions() {
        // Initialize the global localization manager for this test
        food_ticket_bot::localization::init_localization()
            .expect("Failed to initialize localization");

        let message = food_ticket_bot::localization::t_lang("ask-id-number", Some("fa"));
        assert_eq!(message, "لطفا کد ملی خود را وارد کنید");

        let args = vec![("full_name", "Sara Ahmadi")];
        let message_with_args =
            food_ticket_bot::localization::t_args_lang("user-info", &args, Some("fa"));
        assert!(message_with_args.contains("Sara Ahmadi"));
    }
}
