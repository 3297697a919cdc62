use crate::error::Result;
use crate::fs;
use crate::sec::common::de_cik_opt;
use crate::sec::tickers::RegistryEntry;
use crate::table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, trace};

/// One profile row per unique `cik_long` in the registry.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityProfile {
    pub cik: Option<String>,
    pub entity_type: Option<String>,
    pub sic: Option<String>,
    pub sic_description: Option<String>,
    pub name: Option<String>,
    /// First ticker symbol listed in the submission document.
    pub tickers: Option<String>,
    /// First exchange listed in the submission document.
    pub exchanges: Option<String>,
    pub fiscal_year_end: Option<String>,
    /// Whether the entity's `cik_long` appears more than once in the
    /// registry.
    pub has_multiple_symbols: bool,
}

/// Shape one profile row per unique entity from locally stored EDGAR
/// submission documents.
///
/// `submission_dir` must hold a `CIK<cik_long>.json` document for every
/// entity in `registry` (the SEC's bulk data download, unzipped); a missing
/// file is fatal. A document that parses but carries no usable record is
/// skipped, and the skip count is reported at `info` level.
///
/// For companies with multiple tickers, only the first occurring ticker row
/// is used.
pub async fn extract_profiles(
    registry: &Table<RegistryEntry>,
    submission_dir: &Path,
    tui: bool,
) -> Result<Table<EntityProfile>> {
    // split the registry into the first row per cik_long, and the set of
    // cik_longs appearing more than once
    let mut seen: HashSet<&str> = HashSet::new();
    let mut duplicated: HashSet<&str> = HashSet::new();
    let mut unique: Vec<&RegistryEntry> = Vec::new();
    for entry in registry {
        if seen.insert(entry.cik_long.as_str()) {
            unique.push(entry);
        } else {
            duplicated.insert(entry.cik_long.as_str());
        }
    }

    debug!("extracting profiles for {} unique entities", unique.len());
    let pb = if tui {
        let pb = ProgressBar::new(unique.len() as u64).with_style(
            ProgressStyle::default_bar()
                .template(
                    "{msg} {spinner:.magenta}\n\
                    [{elapsed_precise:.magenta}] |{bar:40.cyan/blue}| {human_pos}/{human_len} \
                    [Rate: {per_sec:.magenta}, ETA: {eta:.blue}]",
                )
                .expect("failed to set progress bar style")
                .progress_chars("##-"),
        );
        pb.set_message("collecting profiles ...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut profiles = Table::new();
    let mut no_info = 0;
    for entry in unique {
        let path = submission_dir.join(format!("CIK{}.json", entry.cik_long));
        let submission: Submission = fs::read_json(&path).await?;

        match submission.into_profile(duplicated.contains(entry.cik_long.as_str())) {
            Some(profile) => profiles.push(profile),
            None => {
                trace!("no usable profile record for CIK{}", entry.cik_long);
                no_info += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!("company information for {no_info} cik numbers could not be retrieved");

    if tui {
        println!("collecting profiles ... done\n");
    }

    Ok(profiles)
}

// de
// ----------------------------------------------------------------------------

/// The profile fields of an EDGAR submission document; everything else in
/// the document is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Submission {
    #[serde(default, deserialize_with = "de_cik_opt")]
    cik: Option<String>,
    entity_type: Option<String>,
    sic: Option<String>,
    sic_description: Option<String>,
    name: Option<String>,
    // ticker and exchange entries can be null in the wild
    #[serde(default)]
    tickers: Vec<Option<String>>,
    #[serde(default)]
    exchanges: Vec<Option<String>>,
    fiscal_year_end: Option<String>,
}

impl Submission {
    /// Reduce the document to its first extractable profile row, if any.
    ///
    /// Row count is driven by the list-valued fields; a document whose
    /// `tickers` and `exchanges` are both empty holds no usable record.
    fn into_profile(self, has_multiple_symbols: bool) -> Option<EntityProfile> {
        if self.tickers.is_empty() && self.exchanges.is_empty() {
            return None;
        }
        Some(EntityProfile {
            cik: self.cik,
            entity_type: self.entity_type,
            sic: self.sic,
            sic_description: self.sic_description,
            name: self.name,
            tickers: self.tickers.into_iter().next().flatten(),
            exchanges: self.exchanges.into_iter().next().flatten(),
            fiscal_year_end: self.fiscal_year_end,
            has_multiple_symbols,
        })
    }
}
