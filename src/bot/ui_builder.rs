//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{KeyboardButton, KeyboardMarkup};

// Import localization
use crate::localization::{t_args_lang, t_lang};

use crate::api::{Ticket, TicketStatus, UserTickets};

/// Reply keyboard with the single "get food ticket" button
pub fn create_ticket_keyboard(language_code: Option<&str>) -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(t_lang(
        "ticket-button",
        language_code,
    ))]])
    .resize_keyboard()
}

/// Name reply sent before the tickets
pub fn format_user_info(user: &UserTickets, language_code: Option<&str>) -> String {
    t_args_lang(
        "user-info",
        &[("full_name", user.full_name().as_str())],
        language_code,
    )
}

pub fn status_label(status: TicketStatus, language_code: Option<&str>) -> String {
    match status {
        TicketStatus::Valid => t_lang("status-valid", language_code),
        TicketStatus::Used => t_lang("status-used", language_code),
    }
}

/// Photo caption: ticket title and status
pub fn format_ticket_caption(ticket: &Ticket, language_code: Option<&str>) -> String {
    let status = status_label(ticket.status, language_code);
    t_args_lang(
        "ticket-caption",
        &[
            ("title", ticket.ticket_type.title.as_str()),
            ("status", status.as_str()),
        ],
        language_code,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TicketType;
    use crate::localization::init_localization;

    fn ticket(status: TicketStatus) -> Ticket {
        Ticket {
            status,
            ticket_type: TicketType {
                title: "Lunch".to_string(),
            },
            qr_code_url: "http://qr/1".to_string(),
        }
    }

    #[test]
    fn test_ticket_keyboard_has_one_button() {
        init_localization().unwrap();
        let keyboard = create_ticket_keyboard(Some("fa"));

        assert_eq!(keyboard.keyboard.len(), 1);
        assert_eq!(keyboard.keyboard[0].len(), 1);
        assert_eq!(keyboard.keyboard[0][0].text, "دریافت بلیت غذا");
    }

    #[test]
    fn test_ticket_caption() {
        init_localization().unwrap();

        let caption = format_ticket_caption(&ticket(TicketStatus::Valid), Some("en"));
        assert_eq!(caption, "🎫 Lunch ticket\nStatus: Valid");

        let caption = format_ticket_caption(&ticket(TicketStatus::Used), Some("fa"));
        assert!(caption.contains("Lunch"));
        assert!(caption.contains("استفاده شده"));
    }

    #[test]
    fn test_user_info() {
        init_localization().unwrap();
        let user = UserTickets {
            first_name: "Ali".to_string(),
            last_name: "Rezaei".to_string(),
            username: "ali".to_string(),
            tickets: vec![],
        };

        assert_eq!(
            format_user_info(&user, Some("en")),
            "User information:\nName: Ali Rezaei"
        );
    }
}
