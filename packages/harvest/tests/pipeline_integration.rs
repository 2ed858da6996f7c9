//! Integration tests for the full harvest run.
//!
//! These drive the whole loop with mocks: fetch each configured site,
//! call the model, normalize, and merge across sites.

use std::time::Duration;

use harvest::testing::{MockFetcher, MockModel};
use harvest::{
    harvest, AllowList, FetchedPage, HarvestConfig, ReferenceSet, SourceSite,
    SEARCH_FALLBACK_LABEL,
};

fn sites() -> Vec<SourceSite> {
    vec![
        SourceSite::new("Walker+", "https://walkerplus.com/event_list/"),
        SourceSite::new("じゃらん", "https://www.jalan.net/event/"),
    ]
}

fn config() -> HarvestConfig {
    HarvestConfig::new("期間限定イベント")
        .with_allow_list(AllowList::from_entries(["walkerplus.com", "jalan.net"]))
        .with_pause(Duration::ZERO)
}

fn fetcher_with_both_sites() -> MockFetcher {
    MockFetcher::new()
        .with_page(FetchedPage::new(
            "https://walkerplus.com/event_list/",
            "WALKER-LISTING 夏祭り 花火大会",
        ))
        .with_page(FetchedPage::new(
            "https://www.jalan.net/event/",
            "JALAN-LISTING 夏祭り マルシェ",
        ))
}

#[tokio::test]
async fn test_run_merges_and_dedups_across_sites() {
    let fetcher = fetcher_with_both_sites();
    let model = MockModel::new()
        .with_response_for(
            "WALKER-LISTING",
            r#"```json
[
  {"name": "夏祭り", "place": "上野公園", "date_info": "2025年8月2日",
   "source_url": "https://walkerplus.com/event/1.html"},
  {"name": "花火大会", "place": "隅田川", "date": "2025/8/9",
   "source_url": "https://walkerplus.com/event/2.html"}
]
```"#,
        )
        .with_response_for(
            "JALAN-LISTING",
            r#"[
  {"name": "夏 祭り", "place": "上野公園",
   "source_url": "https://www.jalan.net/event/evt_1/"},
  {"name": "マルシェ", "place": "駅前広場",
   "source_url": "https://www.jalan.net/event/evt_2/"}
]"#,
        );

    let outcome = harvest(&sites(), &config(), &fetcher, &model).await;

    // The second site's 夏祭り copy is a duplicate of the first's
    let names: Vec<&str> = outcome.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["夏祭り", "花火大会", "マルシェ"]);

    // Dates were zero-padded on the way through
    assert_eq!(outcome.records[0].date_info, "2025年08月02日");
    assert_eq!(outcome.records[1].date_info, "2025/08/09");

    let report = &outcome.report;
    assert!(report.is_complete());
    assert_eq!(report.sites_succeeded, 2);
    assert_eq!(report.records_recovered, 4);
    assert_eq!(report.records_deduplicated, 1);
    assert_eq!(report.records_kept, 3);
}

#[tokio::test]
async fn test_failed_site_is_skipped_not_fatal() {
    let fetcher = MockFetcher::new()
        .with_failure("https://walkerplus.com/event_list/")
        .with_page(FetchedPage::new(
            "https://www.jalan.net/event/",
            "JALAN-LISTING",
        ));
    let model = MockModel::new().with_response_for(
        "JALAN-LISTING",
        r#"[{"name": "マルシェ", "place": "駅前広場",
            "source_url": "https://www.jalan.net/event/evt_2/"}]"#,
    );

    let outcome = harvest(&sites(), &config(), &fetcher, &model).await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].name, "マルシェ");
    assert_eq!(
        outcome.report.failed_sites,
        vec!["https://walkerplus.com/event_list/".to_string()],
    );
    assert_eq!(outcome.report.sites_succeeded, 1);
}

#[tokio::test]
async fn test_all_sites_failing_yields_empty_run() {
    let fetcher = MockFetcher::new()
        .with_failure("https://walkerplus.com/event_list/")
        .with_failure("https://www.jalan.net/event/");
    let model = MockModel::new();

    let outcome = harvest(&sites(), &config(), &fetcher, &model).await;

    assert!(outcome.records.is_empty());
    assert!(outcome.report.is_empty_run());
    assert_eq!(outcome.report.failed_sites.len(), 2);
    assert!(model.calls().is_empty());
}

#[tokio::test]
async fn test_model_failure_counts_as_failed_site() {
    let fetcher = fetcher_with_both_sites();
    let model = MockModel::failing();

    let outcome = harvest(&sites(), &config(), &fetcher, &model).await;

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.report.failed_sites.len(), 2);
    assert_eq!(outcome.report.sites_attempted, 2);
    assert_eq!(outcome.report.sites_succeeded, 0);
}

#[tokio::test]
async fn test_untrusted_source_is_downgraded_in_full_run() {
    let fetcher = MockFetcher::new().with_page(FetchedPage::new(
        "https://walkerplus.com/event_list/",
        "WALKER-LISTING",
    ));
    let model = MockModel::new().with_response_for(
        "WALKER-LISTING",
        r#"[{"name": "夏祭り", "place": "上野公園",
            "source_name": "謎のまとめ", "source_url": "https://fabricated.example/p"}]"#,
    );
    let sites = vec![SourceSite::new(
        "Walker+",
        "https://walkerplus.com/event_list/",
    )];

    let outcome = harvest(&sites, &config(), &fetcher, &model).await;

    assert_eq!(outcome.records.len(), 1);
    let record = &outcome.records[0];
    assert_eq!(record.source_name, SEARCH_FALLBACK_LABEL);
    assert!(record.source_url.starts_with("https://www.google.com/search?"));
    assert_eq!(outcome.report.records_downgraded, 1);
}

#[tokio::test]
async fn test_reference_set_suppresses_known_events() {
    let fetcher = MockFetcher::new().with_page(FetchedPage::new(
        "https://walkerplus.com/event_list/",
        "WALKER-LISTING",
    ));
    let model = MockModel::new().with_response_for(
        "WALKER-LISTING",
        r#"[
  {"name": "夏祭り", "place": "上野公園",
   "source_url": "https://walkerplus.com/event/1.html"},
  {"name": "花火大会", "place": "隅田川",
   "source_url": "https://walkerplus.com/event/2.html"}
]"#,
    );
    let sites = vec![SourceSite::new(
        "Walker+",
        "https://walkerplus.com/event_list/",
    )];

    let exported = "name,place\n夏祭り,上野公園\n";
    let config = config().with_reference(ReferenceSet::from_delimited(exported));

    let outcome = harvest(&sites, &config, &fetcher, &model).await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].name, "花火大会");
    assert_eq!(outcome.report.records_deduplicated, 1);
}

#[tokio::test]
async fn test_records_default_to_site_source() {
    let fetcher = MockFetcher::new().with_page(FetchedPage::new(
        "https://walkerplus.com/event_list/",
        "WALKER-LISTING",
    ));
    let model = MockModel::new().with_response_for(
        "WALKER-LISTING",
        r#"[{"name": "夏祭り", "place": "上野公園"}]"#,
    );
    let sites = vec![SourceSite::new(
        "Walker+",
        "https://walkerplus.com/event_list/",
    )];

    let outcome = harvest(&sites, &config(), &fetcher, &model).await;

    assert_eq!(outcome.records[0].source_name, "Walker+");
    assert_eq!(
        outcome.records[0].source_url,
        "https://walkerplus.com/event_list/",
    );
}
