use crate::error::{Error, Result};
use crate::fs;
use crate::http::{self, HttpClient};
use crate::table::Table;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, trace};

const SUBMISSIONS_URL: &str = "https://data.sec.gov/submissions";

/// Pacing between successive shard fetches; the SEC's informal expectation
/// is at most 10 requests per second.
const SHARD_PACING: Duration = Duration::from_millis(100);

/// A single filing, carrying whatever fields the SEC put on its page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilingRecord {
    fields: BTreeMap<String, Value>,
}

impl FilingRecord {
    /// Field value, if the source page carried the column.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The timestamp the SEC accepted the filing; the ordering key.
    pub fn acceptance_datetime(&self) -> Option<&str> {
        self.get("acceptanceDateTime").and_then(Value::as_str)
    }

    /// The filing's accession identifier.
    pub fn accession_number(&self) -> Option<&str> {
        self.get("accessionNumber").and_then(Value::as_str)
    }

    /// Field names present on this record.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// List all SEC filings for a company, in chronological order.
///
/// The history is assembled either from previously downloaded submission
/// documents in `submission_dir` (the SEC's bulk data download, unzipped)
/// or, given an `identity` string to declare as User-Agent, from the live
/// submissions endpoint. When both are supplied the local directory wins.
/// Supplying neither is an error, raised before any I/O.
///
/// `cik` must be the 10-digit zero-padded identifier.
pub async fn list_filings(
    cik: &str,
    submission_dir: Option<&Path>,
    identity: Option<&str>,
) -> Result<Table<FilingRecord>> {
    if cik.len() != 10 {
        return Err(Error::Usage(format!(
            "cik must be a 10 digit identifier in string format, got {cik:?}"
        )));
    }

    let mut filings = match (submission_dir, identity) {
        (Some(dir), _) => read_filings(cik, dir).await?,
        (None, Some(identity)) => {
            let client = http::build_client(identity)?;
            fetch_filings(&client, SUBMISSIONS_URL, cik).await?
        }
        (None, None) => {
            return Err(Error::Usage(
                "either submission_dir or identity must be specified".to_string(),
            ))
        }
    };

    filings.sort_by(|a, b| a.acceptance_datetime().cmp(&b.acceptance_datetime()));
    Ok(filings)
}

/// Assemble the filing table from local submission documents.
async fn read_filings(cik: &str, dir: &Path) -> Result<Table<FilingRecord>> {
    debug!("reading filing history for CIK{cik}");
    let doc: SubmissionDoc = fs::read_json(&dir.join(format!("CIK{cik}.json"))).await?;

    let mut filings = doc.filings.recent.into_table();
    for shard in doc.filings.files {
        trace!("reading overflow shard {}", shard.name);
        let page: FilingPage = fs::read_json(&dir.join(&shard.name)).await?;
        filings.concat(page.into_table());
    }
    Ok(filings)
}

/// Assemble the filing table from the live submissions endpoint.
pub(crate) async fn fetch_filings(
    client: &HttpClient,
    base: &str,
    cik: &str,
) -> Result<Table<FilingRecord>> {
    debug!("fetching filing history for CIK{cik}");
    let doc: SubmissionDoc =
        http::get_json(client.get(format!("{base}/CIK{cik}.json"))).await?;

    let mut filings = doc.filings.recent.into_table();
    for shard in doc.filings.files {
        // fixed-rate pacing; a failed fetch aborts the whole assembly
        tokio::time::sleep(SHARD_PACING).await;
        trace!("fetching overflow shard {}", shard.name);
        let page: FilingPage =
            http::get_json(client.get(format!("{base}/{}", shard.name))).await?;
        filings.concat(page.into_table());
    }
    Ok(filings)
}

// de
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SubmissionDoc {
    filings: Filings,
}

#[derive(Debug, Deserialize)]
struct Filings {
    recent: FilingPage,
    #[serde(default)]
    files: Vec<ShardFile>,
}

/// Descriptor of an overflow shard document, referenced by name from the
/// primary document.
#[derive(Debug, Deserialize)]
struct ShardFile {
    name: String,
}

/// A record-oriented page of filings; an object of parallel arrays, one per
/// column.
#[derive(Debug)]
struct FilingPage {
    columns: Vec<(String, Vec<Value>)>,
}

impl FilingPage {
    /// Pivot the parallel arrays into one record per row position.
    fn into_table(self) -> Table<FilingRecord> {
        let rows = self.columns.first().map_or(0, |(_, values)| values.len());
        let mut records = vec![FilingRecord::default(); rows];
        for (column, values) in self.columns {
            for (record, value) in records.iter_mut().zip(values) {
                record.fields.insert(column.clone(), value);
            }
        }
        Table::from_rows(records)
    }
}

struct PageVisitor;

impl<'de> Visitor<'de> for PageVisitor {
    type Value = FilingPage;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("map of column name to array of values")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut columns: Vec<(String, Vec<Value>)> = Vec::new();
        while let Some((column, values)) = map.next_entry::<String, Vec<Value>>()? {
            if let Some((_, first)) = columns.first() {
                if first.len() != values.len() {
                    return Err(serde::de::Error::custom(format!(
                        "column {column:?} holds {} values, expected {}",
                        values.len(),
                        first.len()
                    )));
                }
            }
            columns.push((column, values));
        }
        Ok(FilingPage { columns })
    }
}

impl<'de> Deserialize<'de> for FilingPage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(PageVisitor)
    }
}
