//! HTTP price feed.
//!
//! Fetches a price from a URL. The response body may be a bare JSON number,
//! a numeric string, or an object carrying a `price` field (either form).

use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::error::{FeedError, FeedResult};
use crate::source::{BoxFuture, PriceFeed};

/// Default timeout for feed requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Price feed backed by an HTTP GET endpoint.
pub struct UrlFeed {
    client: Client,
    url: String,
}

impl UrlFeed {
    pub fn new(url: impl Into<String>) -> FeedResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| FeedError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn fetch(&self) -> FeedResult<Decimal> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FeedError::Http(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Http(format!("HTTP {status}: {body}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::Http(format!("Failed to read response: {e}")))?;

        let price = parse_price_body(&body)?;
        debug!(url = %self.url, %price, "Fetched feed price");
        Ok(price)
    }
}

impl PriceFeed for UrlFeed {
    fn get_price(&self) -> BoxFuture<'_, FeedResult<Decimal>> {
        Box::pin(self.fetch())
    }

    fn describe(&self) -> String {
        format!("url:{}", self.url)
    }
}

/// Extract a price from a feed response body.
pub fn parse_price_body(body: &str) -> FeedResult<Decimal> {
    let value: Value = serde_json::from_str(body.trim())?;
    price_from_value(&value)
}

fn price_from_value(value: &Value) -> FeedResult<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map_err(|e| FeedError::ParseError(format!("{n}: {e}"))),
        Value::String(s) => {
            Decimal::from_str(s.trim()).map_err(|e| FeedError::ParseError(format!("{s:?}: {e}")))
        }
        Value::Object(map) => match map.get("price") {
            Some(inner) => price_from_value(inner),
            None => Err(FeedError::ParseError("object has no price field".into())),
        },
        other => Err(FeedError::ParseError(format!("unexpected body: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_bare_number() {
        assert_eq!(parse_price_body("0.1234").unwrap(), dec!(0.1234));
        assert_eq!(parse_price_body("42").unwrap(), dec!(42));
    }

    #[test]
    fn test_parse_string_and_object() {
        assert_eq!(parse_price_body("\"1.5\"").unwrap(), dec!(1.5));
        assert_eq!(parse_price_body(r#"{"price": "2.75"}"#).unwrap(), dec!(2.75));
        assert_eq!(parse_price_body(r#"{"price": 3}"#).unwrap(), dec!(3));
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(matches!(
            parse_price_body(r#"{"last": 1}"#),
            Err(FeedError::ParseError(_))
        ));
        assert!(matches!(parse_price_body("[1]"), Err(FeedError::ParseError(_))));
        assert!(matches!(parse_price_body("not json"), Err(FeedError::Json(_))));
    }
}
