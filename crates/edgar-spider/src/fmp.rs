//! Historical price data from the [Financial Modeling Prep] API.
//!
//! [Financial Modeling Prep]: https://site.financialmodelingprep.com/developer/docs

use crate::error::{Error, Result};
use crate::http::{self, HttpClient};
use crate::table::Table;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

const HISTORICAL_URL: &str = "https://financialmodelingprep.com/api/v3/historical-price-full";

/// One OHLCV bar per trading date, ascending by date.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceBar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: i64,
}

/// Download historical stock market data for `ticker`.
///
/// `start_date`/`end_date` bound the series; an end date without a start
/// date is rejected before any request is made.
pub async fn fetch_prices(
    apikey: &str,
    ticker: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<Table<PriceBar>> {
    if end_date.is_some() && start_date.is_none() {
        return Err(Error::Usage(
            "please provide a start_date when providing an end_date".to_string(),
        ));
    }

    let client = HttpClient::new();
    fetch_historical(&client, HISTORICAL_URL, apikey, ticker, start_date, end_date).await
}

pub(crate) async fn fetch_historical(
    client: &HttpClient,
    base: &str,
    apikey: &str,
    ticker: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<Table<PriceBar>> {
    debug!("fetching historical prices for {ticker}");

    let mut params = vec![("apikey", apikey.to_string())];
    if let Some(from) = start_date {
        params.push(("from", from.format("%Y-%m-%d").to_string()));
    }
    if let Some(to) = end_date {
        params.push(("to", to.format("%Y-%m-%d").to_string()));
    }

    let response: PriceResponse =
        http::get_json(client.get(format!("{base}/{ticker}")).query(&params)).await?;

    // sort by trading date; the date itself is not retained in the output
    let mut cells = response.historical;
    cells.sort_by(|a, b| a.date.cmp(&b.date));

    Ok(cells
        .into_iter()
        .map(|cell| PriceBar {
            open: cell.open,
            high: cell.high,
            low: cell.low,
            close: cell.close,
            adj_close: cell.adj_close,
            volume: cell.volume,
        })
        .collect())
}

// de
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PriceResponse {
    historical: Vec<PriceCell>,
}

#[derive(Debug, Deserialize)]
struct PriceCell {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(rename = "adjClose")]
    adj_close: f64,
    volume: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn end_date_without_start_date_is_rejected_before_io() {
        let end = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let err = fetch_prices("demo", "ABC", None, Some(end)).await.unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }

    #[tokio::test]
    async fn bars_are_sorted_by_date_and_date_is_dropped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/AAPL"))
            .and(query_param("apikey", "demo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "symbol": "AAPL",
                "historical": [
                    { "date": "2020-01-03", "open": 2.0, "high": 2.5, "low": 1.5,
                      "close": 2.2, "adjClose": 2.1, "volume": 300 },
                    { "date": "2020-01-01", "open": 1.0, "high": 1.5, "low": 0.5,
                      "close": 1.2, "adjClose": 1.1, "volume": 100 },
                    { "date": "2020-01-02", "open": 1.5, "high": 2.0, "low": 1.0,
                      "close": 1.7, "adjClose": 1.6, "volume": 200 },
                ],
            })))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let prices = fetch_historical(&client, &server.uri(), "demo", "AAPL", None, None)
            .await
            .unwrap();

        assert_eq!(prices.len(), 3);
        let volumes: Vec<i64> = prices.iter().map(|bar| bar.volume).collect();
        assert_eq!(volumes, vec![100, 200, 300]);
        assert_eq!(
            prices[0],
            PriceBar {
                open: 1.0,
                high: 1.5,
                low: 0.5,
                close: 1.2,
                adj_close: 1.1,
                volume: 100,
            }
        );
    }

    #[tokio::test]
    async fn date_range_is_forwarded_as_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/MSFT"))
            .and(query_param("apikey", "demo"))
            .and(query_param("from", "2020-01-01"))
            .and(query_param("to", "2020-06-30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "symbol": "MSFT",
                "historical": [],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2020, 6, 30).unwrap();
        let prices = fetch_historical(&client, &server.uri(), "demo", "MSFT", Some(start), Some(end))
            .await
            .unwrap();
        assert!(prices.is_empty());
    }

    #[tokio::test]
    async fn missing_historical_key_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "Error Message": "Invalid API KEY." })),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let err = fetch_historical(&client, &server.uri(), "bad", "AAPL", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
