//! Rate-budget properties observed through the public client surface.

use follow_graph_crawler::api::{FollowsFetcher, HelixClient, Resolver};
use follow_graph_crawler::crawler::{CrawlConfig, Credentials};
use follow_graph_crawler::Direction;
use tokio::time::Instant;

use crate::support::{page_body, user_body, ScriptedTransport};

fn config(workers: usize, rate_limit: u32) -> CrawlConfig {
    CrawlConfig::new(Credentials::new("id", "token", "agent"))
        .with_workers(workers)
        .with_rate_limit(rate_limit)
}

fn client(transport: ScriptedTransport, config: &CrawlConfig) -> HelixClient {
    HelixClient::with_transport(
        Box::new(transport),
        "https://api.example.test/helix",
        config.sleep_time(),
    )
}

#[tokio::test(start_paused = true)]
async fn test_resolution_and_pages_are_each_spaced() {
    // One resolution plus three pages is four spaced requests.
    let config = config(1, 800);
    let sleep = config.sleep_time();

    let transport = ScriptedTransport::new(vec![
        user_body(9),
        page_body(0, 100, 250, Some("c1")),
        page_body(100, 100, 250, Some("c2")),
        page_body(200, 50, 250, None),
    ]);
    let calls = transport.calls();
    let client = client(transport, &config);

    let started = Instant::now();
    let id = Resolver::new(&client).resolve("ninja").await.unwrap().unwrap();
    let edges = FollowsFetcher::new(&client, 100, 1000)
        .fetch_all(id, Direction::Followers)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(id, 9);
    assert_eq!(edges.records.len(), 250);
    assert_eq!(calls.count(), 4);
    assert!(started.elapsed() >= sleep * 4);
}

#[tokio::test(start_paused = true)]
async fn test_five_workers_at_800_per_minute_spacing() {
    // 1.15 * (5 * 60) / 800 = 431.25ms between a worker's requests.
    let config = config(5, 800);
    let sleep = config.sleep_time();
    assert!((sleep.as_secs_f64() - 0.43125).abs() < 1e-9);

    let transport =
        ScriptedTransport::new((0..3).map(|i| page_body(i * 100, 100, 300, None)).collect());
    let client = client(transport, &config);
    let fetcher = FollowsFetcher::new(&client, 100, 1000);

    let started = Instant::now();
    for id in [1, 2, 3] {
        fetcher.fetch_all(id, Direction::Followers).await.unwrap();
    }

    assert!(started.elapsed() >= sleep * 3);
}
