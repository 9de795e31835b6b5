pub mod url_validator;

/// Check a campaign name slug: lowercase ASCII letters, digits and hyphens
/// only, non-empty. Campaign names appear verbatim in scan paths
/// (`/r/{campaign_name}/{seq}`), so anything else is rejected up front.
pub fn is_valid_campaign_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_campaign_names() {
        assert!(is_valid_campaign_name("spring-sale"));
        assert!(is_valid_campaign_name("promo2026"));
        assert!(is_valid_campaign_name("a"));
        assert!(is_valid_campaign_name("x-1-y-2"));
    }

    #[test]
    fn test_invalid_campaign_names() {
        assert!(!is_valid_campaign_name(""));
        assert!(!is_valid_campaign_name("Spring-Sale"));
        assert!(!is_valid_campaign_name("spring sale"));
        assert!(!is_valid_campaign_name("spring_sale"));
        assert!(!is_valid_campaign_name("café"));
        assert!(!is_valid_campaign_name("promo/2026"));
    }
}
