use async_trait::async_trait;
use pagestat::{normalize_url, Analyzer, Dispatcher, Error, HttpAnalyzer, PageResult};
use std::collections::HashMap;
use std::net::TcpListener as StdTcpListener;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Answers after a per-URL delay, recording how many calls overlap.
#[derive(Default)]
struct ScriptedAnalyzer {
    delays: HashMap<String, Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
}

impl ScriptedAnalyzer {
    fn with_delays(delays: &[(&str, u64)]) -> Self {
        Self {
            delays: delays
                .iter()
                .map(|(url, ms)| (url.to_string(), Duration::from_millis(*ms)))
                .collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Analyzer for ScriptedAnalyzer {
    async fn analyze(&self, url: String) -> PageResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if url == "panic" {
            panic!("analyzer blew up");
        }
        let delay = self.delays.get(&url).copied().unwrap_or(Duration::from_millis(10));
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        PageResult {
            url: normalize_url(&url),
            word_count: url.len(),
            status_code: Some(200),
            response_time: Some(delay),
            ..Default::default()
        }
    }
}

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|u| u.to_string()).collect()
}

#[tokio::test]
async fn empty_batch_returns_immediately() {
    let analyzer = Arc::new(ScriptedAnalyzer::default());
    let dispatcher = Dispatcher::default();

    let results = dispatcher.analyze(analyzer.clone(), Vec::new()).await;

    assert!(results.is_empty());
    assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);
    assert_eq!(dispatcher.get_metrics().urls_queued, 0);
}

#[tokio::test]
async fn results_follow_input_order_not_completion_order() {
    let analyzer = Arc::new(ScriptedAnalyzer::with_delays(&[
        ("slow.example", 300),
        ("medium.example", 150),
        ("fast.example", 1),
    ]));
    let dispatcher = Dispatcher::default();

    let results = dispatcher
        .analyze(analyzer, urls(&["slow.example", "medium.example", "fast.example"]))
        .await;

    let got: Vec<_> = results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        got,
        vec!["http://slow.example", "http://medium.example", "http://fast.example"]
    );
}

#[tokio::test]
async fn unbounded_by_default() {
    let analyzer = Arc::new(ScriptedAnalyzer::with_delays(&[
        ("a", 100),
        ("b", 100),
        ("c", 100),
        ("d", 100),
    ]));
    let dispatcher = Dispatcher::default();

    let results = dispatcher.analyze(analyzer.clone(), urls(&["a", "b", "c", "d"])).await;

    assert_eq!(results.len(), 4);
    assert_eq!(analyzer.max_in_flight.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn concurrency_limit_bounds_in_flight_requests() {
    let list = ["a", "b", "c", "d", "e", "f"];
    let delays: Vec<_> = list.iter().map(|u| (*u, 30)).collect();
    let analyzer = Arc::new(ScriptedAnalyzer::with_delays(&delays));
    let dispatcher = Dispatcher::new(NonZeroUsize::new(2), None);

    let results = dispatcher.analyze(analyzer.clone(), urls(&list)).await;

    assert_eq!(results.len(), list.len());
    assert!(analyzer.max_in_flight.load(Ordering::SeqCst) <= 2);
    assert_eq!(analyzer.calls.load(Ordering::SeqCst), list.len());
    for (result, url) in results.iter().zip(list) {
        assert_eq!(result.url, normalize_url(url));
    }
}

#[tokio::test]
async fn zero_concurrency_means_unbounded_and_completes() {
    let analyzer = Arc::new(ScriptedAnalyzer::with_delays(&[("a", 20), ("b", 20)]));
    let dispatcher = Dispatcher::new(NonZeroUsize::new(0), None);

    let results = tokio::time::timeout(
        Duration::from_secs(2),
        dispatcher.analyze(analyzer.clone(), urls(&["a", "b"])),
    )
    .await
    .expect("batch should finish");

    assert_eq!(results.len(), 2);
    assert_eq!(analyzer.max_in_flight.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn limit_of_one_serializes_but_finishes() {
    let list = ["a", "b", "c"];
    let analyzer = Arc::new(ScriptedAnalyzer::with_delays(&[("a", 10), ("b", 10), ("c", 10)]));
    let dispatcher = Dispatcher::new(NonZeroUsize::new(1), None);

    let results = tokio::time::timeout(
        Duration::from_secs(2),
        dispatcher.analyze(analyzer.clone(), urls(&list)),
    )
    .await
    .expect("batch should finish");

    assert_eq!(results.len(), 3);
    assert_eq!(analyzer.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn panicking_task_only_poisons_its_own_slot() {
    let analyzer = Arc::new(ScriptedAnalyzer::default());
    let dispatcher = Dispatcher::default();

    let results = dispatcher
        .analyze(analyzer, urls(&["first.example", "panic", "last.example"]))
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_success());
    assert!(matches!(results[1].error, Some(Error::Task(_))));
    assert_eq!(results[1].url, "http://panic");
    assert_eq!(results[1].word_count, 0);
    assert!(results[2].is_success());

    let metrics = dispatcher.get_metrics();
    assert_eq!(metrics.urls_processed, 3);
    assert_eq!(metrics.requests_failed, 1);
    assert_eq!(metrics.active_tasks, 0);
}

#[tokio::test]
async fn metrics_cover_the_whole_batch() {
    let analyzer = Arc::new(ScriptedAnalyzer::with_delays(&[("a", 20), ("b", 40)]));
    let dispatcher = Dispatcher::default();

    dispatcher.analyze(analyzer, urls(&["a", "b"])).await;

    let metrics = dispatcher.get_metrics();
    assert_eq!(metrics.urls_queued, 2);
    assert_eq!(metrics.urls_processed, 2);
    assert_eq!(metrics.requests_success, 2);
    assert_eq!(metrics.active_tasks, 0);
    assert_eq!(metrics.success_rate, 100.0);
    assert_eq!(metrics.avg_response_time_ms, 30);
}

async fn html_server(body: &str, delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body.to_string(), "text/html")
                .set_delay(delay),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn slow_first_url_still_comes_first_over_http() {
    let slow = html_server("<p>slow page here</p>", Duration::from_millis(400)).await;
    let fast = html_server("<p>fast</p><img src='x.png'>", Duration::ZERO).await;
    let dispatcher = Dispatcher::default();

    let results = dispatcher
        .analyze(Arc::new(HttpAnalyzer::default()), vec![slow.uri(), fast.uri()])
        .await;

    assert_eq!(results[0].url, slow.uri());
    assert_eq!(results[0].word_count, 3);
    assert_eq!(results[1].url, fast.uri());
    assert_eq!(results[1].word_count, 1);
    assert_eq!(results[1].image_count, 1);
    assert!(results[0].response_time.unwrap() >= Duration::from_millis(400));
}

#[tokio::test]
async fn failing_url_does_not_affect_its_neighbour() {
    let good = html_server(
        "<p>one two</p><a href='/a'>three</a><a href='/b'><img src='i.png'></a>",
        Duration::ZERO,
    )
    .await;
    let refused = {
        let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };
    let dispatcher = Dispatcher::default();

    let results = dispatcher
        .analyze(Arc::new(HttpAnalyzer::default()), vec![good.uri(), refused.clone()])
        .await;

    assert_eq!(results.len(), 2);

    assert!(results[0].error.is_none());
    assert_eq!(results[0].word_count, 3);
    assert_eq!(results[0].link_count, 2);
    assert_eq!(results[0].image_count, 1);
    assert_eq!(results[0].status_code, Some(200));

    assert_eq!(results[1].url, refused);
    assert!(matches!(results[1].error, Some(Error::Transport(_))));
    assert_eq!(results[1].word_count, 0);
    assert_eq!(results[1].link_count, 0);
    assert_eq!(results[1].image_count, 0);
}
