pub mod link {
    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    pub const DEFAULT_DOMAIN: &str = "tinyurl.com";
    pub const MIN_ALIAS_CHARS: usize = 5;

    /// Form state for one create-link request. `url` and `alias` are cleared
    /// after a successful submission; the remaining fields carry over.
    #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
    pub struct LinkRequest {
        pub url: String,
        pub domain: String,
        pub alias: String,
        pub tags: String,
        pub expires_at: String,
        pub description: String,
    }

    impl Default for LinkRequest {
        fn default() -> Self {
            Self {
                url: String::new(),
                domain: DEFAULT_DOMAIN.to_string(),
                alias: String::new(),
                tags: String::new(),
                expires_at: String::new(),
                description: String::new(),
            }
        }
    }

    impl LinkRequest {
        pub fn clear_submitted(&mut self) {
            self.url.clear();
            self.alias.clear();
        }
    }

    /// Per-field messages plus the single api channel. Cleared wholesale on
    /// any edit, recomputed wholesale on each submission attempt.
    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct ValidationErrors {
        pub url: Option<String>,
        pub alias: Option<String>,
        pub api: Option<String>,
    }

    impl ValidationErrors {
        pub fn is_empty(&self) -> bool {
            self.url.is_none() && self.alias.is_none() && self.api.is_none()
        }

        // Field errors gate submission; a stale api message does not.
        pub fn blocks_submit(&self) -> bool {
            self.url.is_some() || self.alias.is_some()
        }

        pub fn clear(&mut self) {
            *self = Self::default();
        }
    }

    /// Side-effect free; emptiness of the returned field errors is the sole
    /// gate for submission.
    pub fn validate(req: &LinkRequest) -> ValidationErrors {
        let mut errs = ValidationErrors::default();
        if req.url.trim().is_empty() {
            errs.url = Some("URL is required".to_string());
        } else if url::Url::parse(&req.url).is_err() {
            errs.url = Some("Please enter a valid url".to_string());
        }
        let alias = req.alias.trim();
        if alias.is_empty() {
            errs.alias = Some("Alias is required".to_string());
        } else if alias.chars().count() < MIN_ALIAS_CHARS {
            errs.alias = Some("Alias must be at least 5 characters".to_string());
        }
        errs
    }

    /// A created short link as reported by the service. Immutable once built;
    /// the passthrough fields default to empty when absent from older history
    /// records.
    #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
    pub struct ShortLink {
        pub url: String,
        pub tiny_url: String,
        pub created_at: String,
        #[serde(default)]
        pub domain: String,
        #[serde(default)]
        pub alias: String,
        #[serde(default)]
        pub tags: Vec<String>,
    }

    #[derive(Error, Debug)]
    pub enum LinkError {
        #[error("{0}")] Api(String),
        #[error("auth: {0}")] Auth(String),
        #[error("rate limit: {0}")] RateLimit(String),
        #[error("network: {0}")] Network(String),
        #[error("timeout: {0}")] Timeout(String),
        #[error("decode: {0}")] Decode(String),
        #[error("{0}")] Other(String),
    }

    #[allow(async_fn_in_trait)]
    pub trait LinkClient: Send + Sync {
        async fn create_link(&self, req: &LinkRequest) -> Result<ShortLink, LinkError>;
    }
}

#[cfg(test)]
mod tests {
    use super::link::*;

    fn valid_request() -> LinkRequest {
        LinkRequest {
            url: "https://example.com".to_string(),
            alias: "abcde".to_string(),
            ..LinkRequest::default()
        }
    }

    #[test]
    fn empty_url_is_required() {
        let mut req = valid_request();
        req.url = String::new();
        let errs = validate(&req);
        assert_eq!(errs.url.as_deref(), Some("URL is required"));
        assert!(errs.blocks_submit());

        req.url = "   ".to_string();
        let errs = validate(&req);
        assert_eq!(errs.url.as_deref(), Some("URL is required"));
    }

    #[test]
    fn malformed_url_is_invalid() {
        let mut req = valid_request();
        req.url = "not a url".to_string();
        let errs = validate(&req);
        assert_eq!(errs.url.as_deref(), Some("Please enter a valid url"));
    }

    #[test]
    fn alias_must_be_long_enough() {
        let mut req = valid_request();
        req.alias = String::new();
        assert_eq!(validate(&req).alias.as_deref(), Some("Alias is required"));

        req.alias = "ab".to_string();
        let errs = validate(&req);
        assert_eq!(
            errs.alias.as_deref(),
            Some("Alias must be at least 5 characters")
        );

        // Whitespace padding does not count toward the minimum.
        req.alias = "  ab   ".to_string();
        assert!(validate(&req).alias.is_some());

        req.alias = "abcde".to_string();
        assert!(validate(&req).alias.is_none());
    }

    #[test]
    fn acceptable_input_yields_empty_set() {
        let errs = validate(&valid_request());
        assert!(errs.is_empty());
        assert!(!errs.blocks_submit());
    }

    #[test]
    fn stale_api_message_does_not_gate_submission() {
        let errs = ValidationErrors {
            api: Some("alias already in use".to_string()),
            ..ValidationErrors::default()
        };
        assert!(!errs.blocks_submit());
        assert!(!errs.is_empty());
    }

    #[test]
    fn clear_submitted_keeps_the_rest() {
        let mut req = valid_request();
        req.tags = "work".to_string();
        req.description = "landing page".to_string();
        req.clear_submitted();
        assert!(req.url.is_empty());
        assert!(req.alias.is_empty());
        assert_eq!(req.domain, DEFAULT_DOMAIN);
        assert_eq!(req.tags, "work");
        assert_eq!(req.description, "landing page");
    }

    #[test]
    fn short_link_round_trips_through_json() {
        let link = ShortLink {
            url: "https://example.com".to_string(),
            tiny_url: "https://tinyurl.com/abcde".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            domain: "tinyurl.com".to_string(),
            alias: "abcde".to_string(),
            tags: vec!["work".to_string()],
        };
        let text = serde_json::to_string(&link).unwrap();
        let back: ShortLink = serde_json::from_str(&text).unwrap();
        assert_eq!(back, link);
    }

    #[test]
    fn short_link_tolerates_missing_passthrough_fields() {
        let text = r#"{"url":"https://example.com","tiny_url":"https://tinyurl.com/abcde","created_at":"2024-01-01T00:00:00Z"}"#;
        let link: ShortLink = serde_json::from_str(text).unwrap();
        assert!(link.alias.is_empty());
        assert!(link.tags.is_empty());
    }
}
