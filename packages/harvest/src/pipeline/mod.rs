//! The harvest pipeline.
//!
//! One run is a sequential pass over the configured source sites:
//! fetch page → build prompt → call model → normalize the response.
//! Normalization is the core: JSON repair, record filtering, date
//! rewriting, and order-preserving dedup. Every stage is best-effort;
//! a failing site or a mangled response costs records, never the run.

pub mod dates;
pub mod dedup;
pub mod filter;
pub mod repair;

use tracing::{info, warn};

use crate::prompts::format_extract_prompt;
use crate::traits::{fetcher::PageFetcher, model::TextModel};
use crate::types::{
    config::{HarvestConfig, SourceSite},
    record::{EventRecord, RunReport},
};

pub use dates::normalize_date_text;
pub use dedup::{dedup_records, fingerprint, normalize_key, Deduplicator};
pub use filter::{
    fallback_search_url, screen_record, DropReason, FilterDecision, SEARCH_FALLBACK_LABEL,
};
pub use repair::recover_records;

/// Everything a run produces.
#[derive(Debug, Clone, Default)]
pub struct HarvestOutcome {
    /// Cleaned, deduplicated records in first-seen order
    pub records: Vec<EventRecord>,

    /// Per-stage counters and failed sites
    pub report: RunReport,
}

/// Run the full pipeline over the configured source sites.
///
/// Sites are processed strictly in order, one remote call at a time,
/// with `config.pause_between_calls` slept between successive calls.
/// A site whose fetch or model call fails is logged, recorded in the
/// report, and skipped; the run itself never fails.
pub async fn harvest<F, M>(
    sites: &[SourceSite],
    config: &HarvestConfig,
    fetcher: &F,
    model: &M,
) -> HarvestOutcome
where
    F: PageFetcher,
    M: TextModel,
{
    let mut report = RunReport::new();
    report.sites_attempted = sites.len();

    let mut dedup = Deduplicator::new(config.reference.as_ref());
    let mut records: Vec<EventRecord> = Vec::new();
    let mut made_call = false;

    for site in sites {
        pause_between_calls(config, &mut made_call).await;

        let page = match fetcher.fetch(&site.url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(site = %site.url, error = %e, "fetch failed, skipping site");
                report.failed_sites.push(site.url.clone());
                continue;
            }
        };

        let prompt = format_extract_prompt(&config.query, config.period.as_ref(), &page.content);

        pause_between_calls(config, &mut made_call).await;

        let response = match model.generate(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!(site = %site.url, error = %e, "model call failed, skipping site");
                report.failed_sites.push(site.url.clone());
                continue;
            }
        };

        report.sites_succeeded += 1;

        let batch = clean_batch(&response, config, Some(site), &mut dedup, &mut report);
        info!(
            site = %site.url,
            records = batch.len(),
            "site extracted"
        );
        records.extend(batch);
    }

    if config.max_records > 0 && records.len() > config.max_records {
        records.truncate(config.max_records);
    }
    report.records_kept = records.len();

    info!(
        sites_attempted = report.sites_attempted,
        sites_succeeded = report.sites_succeeded,
        records_kept = report.records_kept,
        records_filtered = report.records_filtered,
        records_deduplicated = report.records_deduplicated,
        "harvest complete"
    );

    HarvestOutcome { records, report }
}

/// Normalize one raw model response into cleaned records.
///
/// The pure, single-response form of the pipeline: repair → filter →
/// date rewrite → dedup (against `config.reference` if set). Never
/// fails; unusable input yields an empty list.
pub fn normalize(raw: &str, config: &HarvestConfig) -> Vec<EventRecord> {
    normalize_with_report(raw, config).0
}

/// [`normalize`] variant that also returns the stage counters.
pub fn normalize_with_report(raw: &str, config: &HarvestConfig) -> (Vec<EventRecord>, RunReport) {
    let mut report = RunReport::new();
    let mut dedup = Deduplicator::new(config.reference.as_ref());

    let mut records = clean_batch(raw, config, None, &mut dedup, &mut report);
    if config.max_records > 0 && records.len() > config.max_records {
        records.truncate(config.max_records);
    }
    report.records_kept = records.len();

    (records, report)
}

/// Repair, filter, date-normalize, and dedup one response's records.
fn clean_batch(
    raw: &str,
    config: &HarvestConfig,
    site: Option<&SourceSite>,
    dedup: &mut Deduplicator<'_>,
    report: &mut RunReport,
) -> Vec<EventRecord> {
    let recovered = repair::recover_records(raw);
    report.records_recovered += recovered.len();

    let mut batch = Vec::new();
    for raw_record in recovered {
        let mut event = raw_record.into_event();

        // The page the response came from is the default source.
        if let Some(site) = site {
            if event.source_name.trim().is_empty() {
                event.source_name = site.name.clone();
            }
            if event.source_url.trim().is_empty() {
                event.source_url = site.url.clone();
            }
        }

        let mut event = match filter::screen_record(event, config) {
            FilterDecision::Keep(event) => event,
            FilterDecision::Downgraded(event) => {
                report.records_downgraded += 1;
                event
            }
            FilterDecision::Drop(_) => {
                report.records_filtered += 1;
                continue;
            }
        };

        if config.normalize_dates {
            event.date_info = dates::normalize_date_text(&event.date_info);
        }

        if dedup.admit(&event) {
            batch.push(event);
        } else {
            report.records_deduplicated += 1;
        }
    }
    batch
}

/// Sleep between successive remote calls; the first call is not delayed.
async fn pause_between_calls(config: &HarvestConfig, made_call: &mut bool) {
    if *made_call && !config.pause_between_calls.is_zero() {
        tokio::time::sleep(config.pause_between_calls).await;
    }
    *made_call = true;
}
