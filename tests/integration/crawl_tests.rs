//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers for the crawled sites
//! and for the job tables, and run full crawls end-to-end.

use serde_json::json;
use shard_crawler::config::Config;
use shard_crawler::crawler::{Crawler, ExtensionPattern};
use shard_crawler::jobs::{shard_index, InMemoryJobTable, JobTable, ShardRouter};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Starts a site whose robots.txt can be fetched
async fn start_site() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .mount(&server)
        .await;
    server
}

async fn mount_page(server: &MockServer, page: &str, body: String, expected_fetches: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected_fetches)
        .mount(server)
        .await;
}

/// Crawler that submits into a single in-memory job table
fn memory_crawler(config: &Config) -> (Arc<InMemoryJobTable>, Crawler) {
    let table = Arc::new(InMemoryJobTable::new("memory://0"));
    let router = ShardRouter::new(vec![table.clone() as Arc<dyn JobTable>], "Crawling", "tester")
        .expect("Failed to build router");
    let crawler = Crawler::with_router(config, router).expect("Failed to build crawler");
    (table, crawler)
}

fn messages(table: &InMemoryJobTable) -> Vec<String> {
    table.jobs().into_iter().map(|job| job.message).collect()
}

#[tokio::test]
async fn test_depth_one_submits_files_and_skips_pages() {
    let site = start_site().await;
    let base = site.uri();

    mount_page(
        &site,
        "/",
        format!(
            r#"<img src="{0}/x.png"> <a href="{0}/page2">next</a> <img src="{0}/x.png">"#,
            base
        ),
        1,
    )
    .await;
    mount_page(&site, "/page2", String::new(), 0).await;

    let (table, crawler) = memory_crawler(&Config::default());
    let seed = format!("{}/", base);
    let report = crawler.crawl(&seed, &ExtensionPattern::default(), 1).await;

    assert_eq!(messages(&table), vec![format!("{}/x.png", base)]);
    assert_eq!(table.jobs()[0].meta_data, seed);
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.files_found, 1);
    assert_eq!(report.submitted, 1);
}

#[tokio::test]
async fn test_depth_two_follows_pages_and_reuses_dedup() {
    let site = start_site().await;
    let base = site.uri();

    mount_page(
        &site,
        "/",
        format!(r#"<a href="{0}/page1">1</a> <img src="{0}/x.png">"#, base),
        1,
    )
    .await;
    mount_page(
        &site,
        "/page1",
        format!(r#"<img src="{0}/x.png"> <img src="{0}/y.gif">"#, base),
        1,
    )
    .await;

    let (table, crawler) = memory_crawler(&Config::default());
    let report = crawler
        .crawl(&format!("{}/", base), &ExtensionPattern::default(), 2)
        .await;

    assert_eq!(
        messages(&table),
        vec![format!("{}/x.png", base), format!("{}/y.gif", base)]
    );
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.submitted, 2);
    assert_eq!(report.already_local, 1);
    assert_eq!(crawler.dedup().len(), 2);
    // One robots.txt fetch for the whole domain
    assert_eq!(crawler.robots().fetch_count(), 1);
}

#[tokio::test]
async fn test_depth_zero_makes_no_requests() {
    let site = MockServer::start().await;

    let (table, crawler) = memory_crawler(&Config::default());
    let report = crawler
        .crawl(&site.uri(), &ExtensionPattern::default(), 0)
        .await;

    assert_eq!(report.pages_fetched, 0);
    assert!(site.received_requests().await.unwrap().is_empty());
    assert!(table.jobs().is_empty());
}

#[tokio::test]
async fn test_unbounded_depth_ends_when_links_run_out() {
    let site = start_site().await;
    let base = site.uri();

    mount_page(&site, "/", format!(r#"<a href="{}/gone">gone</a>"#, base), 1).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&site)
        .await;

    let (_, crawler) = memory_crawler(&Config::default());
    let report = crawler
        .crawl(&format!("{}/", base), &ExtensionPattern::default(), -1)
        .await;

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.fetch_failures, 1);
}

#[tokio::test]
async fn test_dedup_pages_breaks_cycles() {
    let site = start_site().await;
    let base = site.uri();

    mount_page(
        &site,
        "/",
        format!(r#"<a href="{0}/a">a</a> <img src="{0}/x.jpg">"#, base),
        1,
    )
    .await;
    mount_page(&site, "/a", format!(r#"<a href="{0}/">home</a>"#, base), 1).await;

    let mut config = Config::default();
    config.crawler.dedup_pages = true;
    let (table, crawler) = memory_crawler(&config);

    let report = crawler
        .crawl(&format!("{}/", base), &ExtensionPattern::default(), -1)
        .await;

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(messages(&table), vec![format!("{}/x.jpg", base)]);
}

#[tokio::test]
async fn test_unreachable_robots_stops_branch() {
    let site = start_site().await;
    let elsewhere = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&elsewhere)
        .await;
    mount_page(&elsewhere, "/page", String::new(), 0).await;
    mount_page(&elsewhere, "/other", String::new(), 0).await;

    mount_page(
        &site,
        "/",
        format!(
            r#"<a href="{0}/page">p</a> <a href="{0}/other">o</a>"#,
            elsewhere.uri()
        ),
        1,
    )
    .await;

    let (_, crawler) = memory_crawler(&Config::default());
    let report = crawler
        .crawl(&format!("{}/", site.uri()), &ExtensionPattern::default(), 3)
        .await;

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.robots_denials, 2);
    assert_eq!(crawler.robots().fetch_count(), 2);
}

#[tokio::test]
async fn test_custom_extensions() {
    let site = start_site().await;
    let base = site.uri();

    mount_page(
        &site,
        "/",
        format!(r#"{0}/a.png {0}/notes.TXT {0}/b.pdf"#, base),
        1,
    )
    .await;

    let (table, crawler) = memory_crawler(&Config::default());
    let pattern = ExtensionPattern::new("txt|.pdf").expect("Failed to build pattern");
    crawler.crawl(&format!("{}/", base), &pattern, 1).await;

    assert_eq!(
        messages(&table),
        vec![format!("{}/notes.TXT", base), format!("{}/b.pdf", base)]
    );
}

#[tokio::test]
async fn test_rest_job_table_end_to_end() {
    let site = start_site().await;
    let base = site.uri();
    let new_file = format!("{}/new.png", base);
    let known_file = format!("{}/known.png", base);

    mount_page(
        &site,
        "/",
        format!(r#"<img src="{}"> <img src="{}">"#, new_file, known_file),
        2,
    )
    .await;

    let shard = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobTable/workerHandler"))
        .and(query_param("purpose", "Crawling"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&shard)
        .await;
    Mock::given(method("POST"))
        .and(path("/jobTable/workerHandler"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 5}})))
        .expect(1)
        .mount(&shard)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobTable/jobHandler"))
        .and(query_param("message", new_file.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&shard)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobTable/jobHandler"))
        .and(query_param("message", known_file.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": 1}]})))
        .expect(1)
        .mount(&shard)
        .await;
    Mock::given(method("POST"))
        .and(path("/jobTable/jobHandler"))
        .and(body_partial_json(json!({
            "message": new_file,
            "assignedWorker_id": 5,
            "metaData": format!("{}/", base),
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status_code": 200})))
        .expect(1)
        .mount(&shard)
        .await;

    let mut config = Config::default();
    config.job_table.shards = vec![shard.uri()];
    let crawler = Crawler::new(&config).expect("Failed to build crawler");

    let first = crawler
        .crawl(&format!("{}/", base), &ExtensionPattern::default(), 1)
        .await;
    assert_eq!(first.submitted, 1);
    assert_eq!(first.already_remote, 1);

    // A second crawl answers both files from the local cache
    let second = crawler
        .crawl(&format!("{}/", base), &ExtensionPattern::default(), 1)
        .await;
    assert_eq!(second.already_local, 2);
    assert_eq!(second.submitted, 0);
}

#[tokio::test]
async fn test_rejected_job_is_retried_on_next_crawl() {
    let site = start_site().await;
    let base = site.uri();
    mount_page(&site, "/", format!(r#"<img src="{}/x.gif">"#, base), 2).await;

    let (table, crawler) = memory_crawler(&Config::default());
    table.set_create_status(500);

    let first = crawler
        .crawl(&format!("{}/", base), &ExtensionPattern::default(), 1)
        .await;
    assert_eq!(first.failed, 1);
    assert!(crawler.dedup().is_empty());

    table.set_create_status(200);
    let second = crawler
        .crawl(&format!("{}/", base), &ExtensionPattern::default(), 1)
        .await;
    assert_eq!(second.submitted, 1);
    assert_eq!(table.calls().create_job, 2);
}

#[tokio::test]
async fn test_files_are_spread_over_shards_by_hash() {
    let site = start_site().await;
    let base = site.uri();

    let files: Vec<String> = (0..12).map(|i| format!("{}/f{}.png", base, i)).collect();
    let body = files
        .iter()
        .map(|f| format!(r#"<img src="{}">"#, f))
        .collect::<Vec<_>>()
        .join("\n");
    mount_page(&site, "/", body, 1).await;

    let tables: Vec<Arc<InMemoryJobTable>> = (0..3)
        .map(|i| Arc::new(InMemoryJobTable::new(format!("memory://{}", i))))
        .collect();
    let router = ShardRouter::new(
        tables.iter().map(|t| t.clone() as Arc<dyn JobTable>).collect(),
        "Crawling",
        "tester",
    )
    .expect("Failed to build router");
    let crawler = Crawler::with_router(&Config::default(), router).expect("Failed to build crawler");

    let report = crawler
        .crawl(&format!("{}/", base), &ExtensionPattern::default(), 1)
        .await;
    assert_eq!(report.submitted, 12);

    for file in &files {
        let owner = shard_index(file, 3).expect("non-empty pool");
        assert!(messages(&tables[owner]).contains(file));
    }
    let total: usize = tables.iter().map(|t| t.jobs().len()).sum();
    assert_eq!(total, 12);
    // Only shards that received a job registered a worker
    for table in &tables {
        assert_eq!(table.workers().len(), usize::from(!table.jobs().is_empty()));
    }
}
