use crate::tinyurl::config::TinyUrlConfig;
use miniurl_core::link::{LinkClient, LinkError, LinkRequest, ShortLink};
use reqwest::{header, Client, StatusCode};
use tracing::{error, info};

#[derive(Clone)]
pub struct TinyUrlClient {
    http: Client,
    cfg: TinyUrlConfig,
}

impl TinyUrlClient {
    pub fn new(cfg: TinyUrlConfig) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", cfg.api_token))?,
        );
        let mut builder = Client::builder()
            .default_headers(headers)
            .use_rustls_tls()
            .timeout(cfg.timeout);
        if let Some(p) = &cfg.proxy {
            builder = builder.proxy(reqwest::Proxy::all(p)?);
        }
        let http = builder.build()?;
        Ok(Self { http, cfg })
    }
}

impl LinkClient for TinyUrlClient {
    async fn create_link(&self, req: &LinkRequest) -> Result<ShortLink, LinkError> {
        let url = format!("{}/create", self.cfg.base_url.trim_end_matches('/'));
        info!(target: "providers::tinyurl", "create link url={} domain={} alias_chars={}", url, req.domain, req.alias.trim().chars().count());
        // The service takes the whole form, empty fields included.
        let body = serde_json::json!({
            "url": req.url,
            "domain": req.domain,
            "alias": req.alias,
            "tags": req.tags,
            "expires_at": req.expires_at,
            "description": req.description,
        });
        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_err)?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.ok();
            error!(target: "providers::tinyurl", "create non-200 status={} body={:?}", status, body);
            return Err(map_status_err(status, body.as_deref()));
        }
        let v: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| LinkError::Decode(e.to_string()))?;
        parse_created(&v)
    }
}

fn parse_created(v: &serde_json::Value) -> Result<ShortLink, LinkError> {
    let data = &v["data"];
    if !data.is_object() {
        return Err(LinkError::Decode("response has no data object".to_string()));
    }
    serde_json::from_value(data.clone()).map_err(|e| LinkError::Decode(e.to_string()))
}

fn map_reqwest_err(e: reqwest::Error) -> LinkError {
    if e.is_timeout() {
        LinkError::Timeout(e.to_string())
    } else if e.is_request() || e.is_connect() {
        LinkError::Network(e.to_string())
    } else {
        LinkError::Other(e.to_string())
    }
}

fn map_status_err(status: StatusCode, body: Option<&str>) -> LinkError {
    let detail = body.and_then(first_reported_error).unwrap_or_else(|| {
        format!(
            "{} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("request failed")
        )
    });
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LinkError::Auth(detail),
        StatusCode::TOO_MANY_REQUESTS => LinkError::RateLimit(detail),
        s if s.is_server_error() => LinkError::Network(detail),
        _ => LinkError::Api(detail),
    }
}

// First element of the body's `errors` sequence, when there is one.
fn first_reported_error(body: &str) -> Option<String> {
    let v: serde_json::Value = serde_json::from_str(body).ok()?;
    let first = v["errors"].as_array()?.first()?;
    match first {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        other => other["message"].as_str().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_created_link_from_data_object() {
        let v = json!({
            "data": {
                "url": "https://example.com",
                "tiny_url": "https://tinyurl.com/abcde",
                "created_at": "2024-01-01T00:00:00Z",
                "domain": "tinyurl.com",
                "alias": "abcde",
                "tags": ["work"]
            }
        });
        let link = parse_created(&v).unwrap();
        assert_eq!(link.url, "https://example.com");
        assert_eq!(link.tiny_url, "https://tinyurl.com/abcde");
        assert_eq!(link.created_at, "2024-01-01T00:00:00Z");
        assert_eq!(link.alias, "abcde");
        assert_eq!(link.tags, vec!["work".to_string()]);
    }

    #[test]
    fn missing_data_object_is_a_decode_error() {
        let v = json!({"errors": []});
        assert!(matches!(parse_created(&v), Err(LinkError::Decode(_))));
    }

    #[test]
    fn bad_request_surfaces_first_reported_error() {
        let body = r#"{"data":[],"errors":["alias already in use"]}"#;
        let err = map_status_err(StatusCode::BAD_REQUEST, Some(body));
        match err {
            LinkError::Api(detail) => assert!(detail.contains("alias already in use")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_error_body_falls_back_to_status_line() {
        let err = map_status_err(StatusCode::BAD_REQUEST, Some("{}"));
        match err {
            LinkError::Api(detail) => assert!(detail.contains("400")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn auth_and_rate_limit_statuses_are_classified() {
        assert!(matches!(
            map_status_err(StatusCode::UNAUTHORIZED, None),
            LinkError::Auth(_)
        ));
        assert!(matches!(
            map_status_err(StatusCode::TOO_MANY_REQUESTS, None),
            LinkError::RateLimit(_)
        ));
        assert!(matches!(
            map_status_err(StatusCode::BAD_GATEWAY, None),
            LinkError::Network(_)
        ));
    }

    #[test]
    fn object_shaped_errors_are_understood_too() {
        let body = r#"{"errors":[{"message":"alias already in use"}]}"#;
        assert_eq!(
            first_reported_error(body).as_deref(),
            Some("alias already in use")
        );
    }
}
