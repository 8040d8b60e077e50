use std::time::Duration;

use covscan_core::{AppConfig, CoverageStatus, ValidationError};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::coverage::KeyCommands;

fn overpass_body() -> serde_json::Value {
    json!({
        "elements": [
            {
                "type": "node", "id": 11, "lat": 41.901, "lon": 12.501,
                "tags": {
                    "name": "Hotel Roma", "tourism": "hotel",
                    "addr:street": "Via Roma", "addr:housenumber": "1",
                    "addr:city": "Roma"
                }
            },
            {
                "type": "node", "id": 12, "lat": 41.902, "lon": 12.502,
                "tags": {
                    "name": "Pensione Po", "tourism": "guest_house",
                    "addr:street": "Via Po", "addr:housenumber": "3",
                    "addr:city": "Roma"
                }
            }
        ]
    })
}

/// First area query succeeds, every later one fails.
async fn mount_overpass_once(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(overpass_body()))
        .up_to_n_times(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(server)
        .await;
}

async fn mount_scraper(server: &MockServer, delay: Duration) {
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "success": true,
                    "data": { "markdown": "Tecnologia disponibile: FTTH" }
                }))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

async fn session(overpass: &MockServer, scraper: &MockServer, dir: &TempDir) -> Session {
    let config = AppConfig {
        log_level: "info".to_owned(),
        overpass_url: format!("{}/api/interpreter", overpass.uri()),
        overpass_timeout_secs: 25,
        overpass_max_retries: 0,
        scraper_base_url: scraper.uri(),
        coverage_url_template: "https://coverage.example/?q={query}".to_owned(),
        credential_path: dir.path().join("api_key"),
        request_timeout_secs: 60,
        user_agent: "covscan-test/0.1".to_owned(),
        scrape_min_interval_ms: 10,
        scrape_wait_for_ms: 0,
        enrich_pause_ms: 0,
    };
    let ctx = AppContext::from_config(config).expect("context");
    let mut session = Session::new(Arc::new(ctx));

    session
        .execute(ShellCommand::Key(KeyCommands::Save {
            key: "fc-test-key".to_owned(),
        }))
        .await
        .expect("save key");
    session
        .execute(ShellCommand::Coords("41.9, 12.5".to_owned()))
        .await
        .expect("coords");
    session
        .execute(ShellCommand::Height("25".to_owned()))
        .await
        .expect("height");
    session
}

fn result_ids(session: &Session) -> Vec<i64> {
    session.results.iter().map(|b| b.id).collect()
}

/// Start a coverage check and wait until its first item is marked as checking.
async fn start_checking(session: &mut Session) {
    session.execute(ShellCommand::Enrich).await.expect("enrich");
    let update = tokio::time::timeout(
        Duration::from_secs(5),
        next_update(&mut session.enrichment),
    )
    .await
    .expect("first update in time");
    session.apply(update);
    assert_eq!(session.results[0].coverage, Some(CoverageState::Checking));
}

#[tokio::test]
async fn new_search_cancels_check_and_failed_query_keeps_results() {
    let overpass = MockServer::start().await;
    let scraper = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_overpass_once(&overpass).await;
    mount_scraper(&scraper, Duration::from_secs(10)).await;

    let mut session = session(&overpass, &scraper, &dir).await;
    session.execute(ShellCommand::Search).await.expect("first search");
    assert_eq!(result_ids(&session), vec![11, 12]);

    start_checking(&mut session).await;

    let err = session.execute(ShellCommand::Search).await.unwrap_err();
    assert!(err.to_string().contains("map-data query failed"));
    assert!(session.enrichment.is_none());
    assert_eq!(session.last_phase, EnrichmentPhase::Cancelled);
    assert_eq!(result_ids(&session), vec![11, 12]);
}

#[tokio::test]
async fn rejected_search_leaves_running_check_alone() {
    let overpass = MockServer::start().await;
    let scraper = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_overpass_once(&overpass).await;
    mount_scraper(&scraper, Duration::from_secs(10)).await;

    let mut session = session(&overpass, &scraper, &dir).await;
    session.execute(ShellCommand::Search).await.expect("first search");
    start_checking(&mut session).await;

    session
        .execute(ShellCommand::Categories(CategorySelection::default()))
        .await
        .expect("categories");
    let err = session.execute(ShellCommand::Search).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::NoCategorySelected)
    );

    let task = session.enrichment.as_ref().expect("check still running");
    assert_ne!(task.phase(), EnrichmentPhase::Cancelled);
    assert_eq!(result_ids(&session), vec![11, 12]);
}

#[tokio::test]
async fn applied_updates_annotate_results_until_completed() {
    let overpass = MockServer::start().await;
    let scraper = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_overpass_once(&overpass).await;
    mount_scraper(&scraper, Duration::ZERO).await;

    let mut session = session(&overpass, &scraper, &dir).await;
    session.execute(ShellCommand::Search).await.expect("search");
    session.execute(ShellCommand::Enrich).await.expect("enrich");

    tokio::time::timeout(Duration::from_secs(10), async {
        while session.enrichment.is_some() {
            let update = next_update(&mut session.enrichment).await;
            session.apply(update);
        }
    })
    .await
    .expect("check finished in time");

    assert_eq!(session.last_phase, EnrichmentPhase::Completed);
    for business in &session.results {
        assert_eq!(
            business.coverage,
            Some(CoverageState::Classified(CoverageStatus::Ftth))
        );
    }
}
