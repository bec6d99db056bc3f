use crate::store::LoadId;

/// Build the public review link for a load. This is the only persisted
/// addressing scheme shared outside the service, so the format is fixed:
/// `<base-url>/submit-review?loadUuid=<load-id>`.
pub fn review_link(base_url: &str, load_uuid: &LoadId) -> String {
    format!(
        "{}/submit-review?loadUuid={}",
        base_url.trim_end_matches('/'),
        load_uuid
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_matches_the_fixed_format() {
        let link = review_link("https://example.com", &LoadId("abc-123".to_string()));
        assert_eq!(link, "https://example.com/submit-review?loadUuid=abc-123");
    }

    #[test]
    fn trailing_slash_on_base_is_tolerated() {
        let link = review_link("https://example.com/", &LoadId("abc-123".to_string()));
        assert_eq!(link, "https://example.com/submit-review?loadUuid=abc-123");
    }
}
