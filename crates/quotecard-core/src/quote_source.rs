use crate::{ApiOptions, Error, Result};
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::time::Duration;

const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

#[derive(Debug, Deserialize)]
struct RawQuote {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    author: Option<String>,
}

static HTTP_AGENT: Lazy<ureq::Agent> = Lazy::new(|| {
    ureq::AgentBuilder::new()
        .user_agent(concat!("quotecard/", env!("CARGO_PKG_VERSION")))
        .build()
});

/// Fetches the quote list from `options.url` and picks one entry at random.
pub fn fetch_random_quote(options: &ApiOptions) -> Result<Quote> {
    let url = options.url.trim();
    if url.is_empty() {
        return Err(Error::QuoteSource("quote api url is empty".to_string()));
    }
    log::debug!("fetching quotes from {url}");
    let response = HTTP_AGENT
        .get(url)
        .timeout(Duration::from_millis(options.timeout_ms.max(1)))
        .call();
    let body = match response {
        Ok(resp) => resp
            .into_string()
            .map_err(|err| Error::QuoteSource(format!("read body: {err}")))?,
        Err(ureq::Error::Status(status, _)) => {
            return Err(Error::QuoteSource(format!(
                "unable to fetch quotes: status {status}"
            )));
        }
        Err(err) => {
            return Err(Error::QuoteSource(format!("unable to fetch quotes: {err}")));
        }
    };
    let quotes = parse_quotes(body.as_bytes())?;
    log::debug!("received {} quote(s)", quotes.len());
    pick_quote(&quotes, &mut rand::thread_rng())
}

/// Parses a JSON array of `{ "text", "author" }` objects.
pub fn parse_quotes(bytes: &[u8]) -> Result<Vec<Quote>> {
    let raw: Vec<RawQuote> = serde_json::from_slice(bytes)
        .map_err(|err| Error::QuoteSource(format!("malformed quote list: {err}")))?;
    Ok(raw
        .into_iter()
        .map(|item| Quote {
            text: item.text.unwrap_or_default(),
            author: item
                .author
                .filter(|author| !author.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        })
        .collect())
}

/// Picks one entry uniformly with `rng`.
pub fn pick_quote<R: Rng + ?Sized>(quotes: &[Quote], rng: &mut R) -> Result<Quote> {
    quotes
        .choose(rng)
        .cloned()
        .ok_or_else(|| Error::QuoteSource("quote list is empty".to_string()))
}
