use super::EmailMessage;

const SUBJECT: &str = "Quick 2-sec favor from your box truck people 🚚✨";

/// Render the one-time review invitation sent to a load's assigned broker.
pub fn review_invitation(to: &str, review_link: &str, load_label: Option<&str>) -> EmailMessage {
    let html = format!(
        "<!doctype html>\n<html>\n  <body style=\"font-family: Arial, Helvetica, sans-serif; color:#111;\">\n    <h2>{SUBJECT}</h2>\n    <p>We're sending out a quick review link so brokers who work with us can share their experience.</p>\n    <p>\n      <a href=\"{review_link}\" style=\"display:inline-block;background:#0d9488;color:#fff;padding:10px 20px;border-radius:6px;text-decoration:none;\">Drop Your Review Here</a>\n    </p>\n    <p>Thank you — BTFS Team</p>\n  </body>\n</html>\n"
    );

    let load_line = match load_label {
        Some(label) => format!("Load: {label}\n\n"),
        None => String::new(),
    };
    let text = format!(
        "{SUBJECT}\n\nWe're sending out a quick review link so brokers can share their experience.\n\nReview link:\n{review_link}\n\n{load_line}Thank you — BTFS Team\n"
    );

    EmailMessage {
        to: to.to_string(),
        subject: SUBJECT.to_string(),
        html,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invitation_embeds_the_review_link() {
        let message = review_invitation(
            "broker@acme.com",
            "https://example.com/submit-review?loadUuid=abc-123",
            Some("L-1"),
        );
        assert_eq!(message.to, "broker@acme.com");
        assert!(message
            .html
            .contains("https://example.com/submit-review?loadUuid=abc-123"));
        assert!(message
            .text
            .contains("https://example.com/submit-review?loadUuid=abc-123"));
        assert!(message.text.contains("Load: L-1"));
    }

    #[test]
    fn invitation_omits_load_line_without_label() {
        let message = review_invitation("broker@acme.com", "https://example.com/r", None);
        assert!(!message.text.contains("Load:"));
    }
}
