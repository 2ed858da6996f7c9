//! Trend search - reference wiring of the harvest pipeline.
//!
//! Fetches a couple of Japanese event-listing pages, extracts upcoming
//! events with Gemini, and prints the cleaned records.
//!
//! ```bash
//! GEMINI_API_KEY=... cargo run --example trend_search
//! ```

use chrono::{Duration as ChronoDuration, Utc};

use harvest::fetchers::HttpFetcher;
use harvest::model::GeminiModel;
use harvest::{harvest, AllowList, DateRange, HarvestConfig, SourceSite};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "harvest=info".into()),
        )
        .init();

    let sites = vec![
        SourceSite::new("Walker+", "https://walkerplus.com/event_list/"),
        SourceSite::new("じゃらん", "https://www.jalan.net/event/"),
    ];

    let today = Utc::now().date_naive();
    let config = HarvestConfig::new("新メニュー・新規オープン・期間限定イベント")
        .with_period(DateRange::new(today, today + ChronoDuration::days(30)))
        .with_allow_list(AllowList::from_sites(&sites))
        .with_max_records(10);

    let fetcher = HttpFetcher::new().with_user_agent("TrendSearch/0.1");
    let model = GeminiModel::from_env()?;

    let outcome = harvest(&sites, &config, &fetcher, &model).await;

    for record in &outcome.records {
        println!(
            "{} | {} | {} | {} ({})",
            record.name, record.place, record.date_info, record.source_name, record.source_url,
        );
    }

    let report = &outcome.report;
    println!(
        "\n{} sites ({} failed), {} records kept / {} recovered",
        report.sites_attempted,
        report.failed_sites.len(),
        report.records_kept,
        report.records_recovered,
    );

    Ok(())
}
