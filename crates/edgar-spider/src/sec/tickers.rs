use crate::error::Result;
use crate::http::{self, HttpClient};
use crate::sec::common::{de_cik, zfill};
use crate::table::Table;
use serde::de::{IgnoredAny, Visitor};
use serde::Deserialize;
use tracing::debug;

const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// One row per ticker symbol registered with the SEC.
///
/// An entity listing multiple symbols appears once per symbol, sharing the
/// same `cik_long`.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistryEntry {
    pub ticker: String,
    pub title: String,
    /// 10-digit zero-padded CIK, as used by the submissions endpoints.
    pub cik: String,
    /// Raw numeric form of the CIK.
    pub cik_long: String,
}

/// Fetch the full list of entities currently registered with the SEC.
///
/// `identity` is sent verbatim as the User-Agent header, declaring the
/// caller to the SEC.
pub async fn list_registry(identity: &str) -> Result<Table<RegistryEntry>> {
    let client = http::build_client(identity)?;
    fetch_registry(&client, COMPANY_TICKERS_URL).await
}

pub(crate) async fn fetch_registry(
    client: &HttpClient,
    url: &str,
) -> Result<Table<RegistryEntry>> {
    debug!("fetching SEC company tickers");
    let tickers: Tickers = http::get_json(client.get(url)).await?;
    Ok(Table::from_rows(tickers.0))
}

// de
// ----------------------------------------------------------------------------

#[derive(Debug)]
struct Tickers(Vec<RegistryEntry>);

#[derive(Clone, Debug, Deserialize)]
struct Ticker {
    #[serde(rename = "cik_str", deserialize_with = "de_cik")]
    cik_long: String,
    ticker: String,
    title: String,
}

impl From<Ticker> for RegistryEntry {
    fn from(ticker: Ticker) -> Self {
        RegistryEntry {
            cik: zfill(&ticker.cik_long),
            ticker: ticker.ticker,
            title: ticker.title,
            cik_long: ticker.cik_long,
        }
    }
}

struct TickerVisitor;

impl<'de> Visitor<'de> for TickerVisitor {
    type Value = Tickers;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("Map of tickers")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        // each entry is in the form of:
        // `0: { "cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc." },
        //  1: { ... },
        //  ...`
        // the keys are an opaque running index, and only the values matter
        let mut tickers: Vec<RegistryEntry> = Vec::new();
        while let Some((_, ticker)) = map.next_entry::<IgnoredAny, Ticker>()? {
            tickers.push(ticker.into());
        }
        Ok(Tickers(tickers))
    }
}

impl<'de> Deserialize<'de> for Tickers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // we want a vector returned, but the deserialize will expect a map,
        // given how the API has been designed
        deserializer.deserialize_map(TickerVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn registry_flattens_the_keyed_map() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/company_tickers.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "0": { "cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc." },
                "1": { "cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP" },
                "2": { "cik_str": 320193, "ticker": "APLE", "title": "Apple Inc." },
            })))
            .mount(&server)
            .await;

        let client = crate::http::build_client("firstname.lastname@organization.com").unwrap();
        let url = format!("{}/files/company_tickers.json", server.uri());
        let registry = fetch_registry(&client, &url).await.unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry[0],
            RegistryEntry {
                ticker: "AAPL".to_string(),
                title: "Apple Inc.".to_string(),
                cik: "0000320193".to_string(),
                cik_long: "320193".to_string(),
            }
        );
        // entities with multiple symbols keep one row per symbol
        assert_eq!(registry[2].cik_long, registry[0].cik_long);
    }

    #[tokio::test]
    async fn identity_is_sent_as_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "jane.doe@example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "0": { "cik_str": 1, "ticker": "A", "title": "A Co" },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = crate::http::build_client("jane.doe@example.com").unwrap();
        let registry = fetch_registry(&client, &server.uri()).await.unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry[0].cik, "0000000001");
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = crate::http::build_client("jane.doe@example.com").unwrap();
        let err = fetch_registry(&client, &server.uri()).await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn http_failure_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = crate::http::build_client("jane.doe@example.com").unwrap();
        let err = fetch_registry(&client, &server.uri()).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
