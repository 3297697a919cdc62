use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use tracing::error;

pub(crate) use reqwest::Client as HttpClient;

/// Build a client declaring the caller via the User-Agent header.
pub(crate) fn build_client(identity: &str) -> Result<HttpClient> {
    let client = reqwest::ClientBuilder::new()
        .user_agent(identity)
        .build()
        .map_err(|err| {
            error!("failed to build http client, error({err})");
            Error::Transport(err)
        })?;
    Ok(client)
}

/// Issue a GET request and deserialize the JSON body.
///
/// Transport failures (including non-2xx statuses) and parse failures stay
/// distinct [`Error`] variants.
pub(crate) async fn get_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
    let body = request
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| {
            error!("failed to fetch data, error({err})");
            Error::Transport(err)
        })?
        .text()
        .await
        .map_err(|err| {
            error!("failed to read response body, error({err})");
            Error::Transport(err)
        })?;

    serde_json::from_str(&body).map_err(|err| {
        error!("failed to parse JSON, error({err})");
        Error::Parse(err)
    })
}
