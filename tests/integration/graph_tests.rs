//! Search behaviour over in-memory link graphs
//!
//! These tests plug a map-backed `LinkExtractor` into the coordinator so the
//! termination, deduplication and counting rules can be checked without a
//! network.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wikipaths::config::RunConfig;
use wikipaths::crawler::{Coordinator, CrawlOutcome, LinkExtractor};
use wikipaths::output::CrawlObserver;
use wikipaths::ExtractError;

const WIKI: &str = "https://en.wikipedia.org/wiki/";

fn page(name: &str) -> String {
    format!("{}{}", WIKI, name)
}

fn config(source: &str, sink: &str, threads: usize) -> RunConfig {
    RunConfig::builder()
        .source(page(source))
        .sink(page(sink))
        .thread_count(threads)
        .build()
        .expect("valid test configuration")
}

/// Link graph keyed by full page URL; unknown pages have no links
#[derive(Clone, Default)]
struct Graph {
    edges: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
}

impl Graph {
    fn new(edges: Vec<(&str, Vec<&str>)>) -> Self {
        Self {
            edges: edges
                .into_iter()
                .map(|(from, to)| (page(from), to.into_iter().map(page).collect()))
                .collect(),
            failing: HashSet::new(),
        }
    }

    /// Pages whose expansion fails
    fn failing(mut self, pages: &[&str]) -> Self {
        self.failing = pages.iter().map(|p| page(p)).collect();
        self
    }

    /// Deterministic pseudo-random graph over pages N0..N{size}
    fn generated(size: usize, out_degree: usize, seed: u64) -> Self {
        let mut state = seed;
        let mut next = move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) as usize
        };

        let edges = (0..size)
            .map(|from| {
                let links = (0..out_degree)
                    .map(|_| page(&format!("N{}", next() % size)))
                    .collect();
                (page(&format!("N{}", from)), links)
            })
            .collect();

        Self {
            edges,
            failing: HashSet::new(),
        }
    }

    fn links(&self, url: &str) -> Vec<String> {
        self.edges.get(url).cloned().unwrap_or_default()
    }

    /// Single-threaded BFS with the same counting rules as the coordinator
    fn reference_search(&self, source: &str, sink: &str) -> CrawlOutcome {
        let source = page(source);
        let sink = page(sink);
        if source == sink {
            return CrawlOutcome::Found {
                visits: 0,
                path: vec![source],
            };
        }

        let mut parents: HashMap<String, Option<String>> = HashMap::new();
        parents.insert(source.clone(), None);
        let mut queue = VecDeque::from([source]);
        let mut visits = 0;

        while let Some(current) = queue.pop_front() {
            if self.failing.contains(&current) {
                continue;
            }
            for link in self.links(&current) {
                if parents.contains_key(&link) {
                    continue;
                }
                parents.insert(link.clone(), Some(current.clone()));
                if link == sink {
                    let mut path = vec![link];
                    while let Some(Some(parent)) = parents.get(path.last().unwrap()) {
                        path.push(parent.clone());
                    }
                    path.reverse();
                    return CrawlOutcome::Found { visits, path };
                }
                visits += 1;
                queue.push_back(link);
            }
        }

        CrawlOutcome::Exhausted { visits }
    }
}

#[async_trait]
impl LinkExtractor for Graph {
    async fn extract(&self, page_url: &str, _scoping_host: &str) -> Result<Vec<String>, ExtractError> {
        tokio::task::yield_now().await;
        if self.failing.contains(page_url) {
            return Err(ExtractError::Timeout {
                url: page_url.to_string(),
            });
        }
        Ok(self.links(page_url))
    }
}

/// Never answers; only cancellation gets a worker out of it
struct StuckExtractor;

#[async_trait]
impl LinkExtractor for StuckExtractor {
    async fn extract(&self, _page_url: &str, _scoping_host: &str) -> Result<Vec<String>, ExtractError> {
        std::future::pending().await
    }
}

/// Panics on every page except the ones it has links for
struct PanickingGraph(Graph);

#[async_trait]
impl LinkExtractor for PanickingGraph {
    async fn extract(&self, page_url: &str, _scoping_host: &str) -> Result<Vec<String>, ExtractError> {
        match self.0.edges.get(page_url) {
            Some(links) => Ok(links.clone()),
            None => panic!("no page at {}", page_url),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Crawling(String),
    VisitCount(u64),
    SinkFound(u64),
    Failed(String),
    Complete,
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl CrawlObserver for RecordingObserver {
    fn on_crawling(&self, url: &str) {
        self.push(Event::Crawling(url.to_string()));
    }

    fn on_visit_count(&self, count: u64) {
        self.push(Event::VisitCount(count));
    }

    fn on_sink_found(&self, _sink: &str, visits: u64) {
        self.push(Event::SinkFound(visits));
    }

    fn on_extraction_error(&self, url: &str, _error: &ExtractError) {
        self.push(Event::Failed(url.to_string()));
    }

    fn on_run_complete(&self, _outcome: &CrawlOutcome) {
        self.push(Event::Complete);
    }
}

#[tokio::test]
async fn test_sink_one_hop_beyond_first_expansion() {
    let graph = Graph::new(vec![("A", vec!["B", "C"]), ("B", vec!["D"])]);

    let report = Coordinator::new(config("A", "D", 1), Arc::new(graph))
        .run()
        .await
        .unwrap();

    assert_eq!(
        report.outcome,
        CrawlOutcome::Found {
            visits: 2,
            path: vec![page("A"), page("B"), page("D")],
        }
    );
}

#[tokio::test]
async fn test_cycle_without_sink_is_exhausted() {
    let graph = Graph::new(vec![("A", vec!["B"]), ("B", vec!["A"])]);

    let report = Coordinator::new(config("A", "Z", 2), Arc::new(graph))
        .run()
        .await
        .unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Exhausted { visits: 1 });
}

#[tokio::test]
async fn test_source_equal_to_sink() {
    let graph = Graph::new(vec![("A", vec!["B"])]);
    let observer = Arc::new(RecordingObserver::default());

    let report = Coordinator::new(config("A", "A", 3), Arc::new(graph))
        .observe_with(observer.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(
        report.outcome,
        CrawlOutcome::Found {
            visits: 0,
            path: vec![page("A")],
        }
    );
    assert!(!observer
        .events()
        .iter()
        .any(|e| matches!(e, Event::VisitCount(_))));
}

#[tokio::test]
async fn test_single_worker_matches_sequential_bfs() {
    let graph = Graph::generated(300, 4, 7);

    for sink in ["N17", "N150", "N299"] {
        let expected = graph.reference_search("N0", sink);
        let report = Coordinator::new(config("N0", sink, 1), Arc::new(graph.clone()))
            .run()
            .await
            .unwrap();
        assert_eq!(report.outcome, expected, "sink {}", sink);
    }
}

#[tokio::test]
async fn test_exhausted_count_independent_of_worker_count() {
    // No page links to the sink, so every run explores the whole component.
    let graph = Graph::generated(200, 3, 42);
    let expected = graph.reference_search("N0", "Unreachable");
    assert!(matches!(expected, CrawlOutcome::Exhausted { .. }));

    for threads in 1..=10 {
        let report = tokio::time::timeout(
            Duration::from_secs(10),
            Coordinator::new(config("N0", "Unreachable", threads), Arc::new(graph.clone())).run(),
        )
        .await
        .expect("search did not terminate")
        .unwrap();
        assert_eq!(report.outcome, expected, "threads {}", threads);
    }
}

#[tokio::test]
async fn test_every_worker_count_finds_reachable_sink() {
    let graph = Graph::generated(200, 3, 42);
    let CrawlOutcome::Found { path, .. } = graph.reference_search("N0", "N120") else {
        panic!("N120 should be reachable in the generated graph");
    };

    for threads in 1..=10 {
        let report = tokio::time::timeout(
            Duration::from_secs(10),
            Coordinator::new(config("N0", "N120", threads), Arc::new(graph.clone())).run(),
        )
        .await
        .expect("search did not terminate")
        .unwrap();

        let CrawlOutcome::Found { path: found, .. } = report.outcome else {
            panic!("threads {}: expected Found, got {:?}", threads, report.outcome);
        };
        assert_eq!(found.first(), Some(&page("N0")));
        assert_eq!(found.last(), Some(&page("N120")));
        // Workers may race, so only the BFS depth is guaranteed to be
        // no shorter than the shortest path.
        assert!(found.len() >= path.len());
    }
}

#[tokio::test]
async fn test_no_page_expanded_twice() {
    let graph = Graph::generated(150, 5, 3);
    let observer = Arc::new(RecordingObserver::default());

    Coordinator::new(config("N0", "Unreachable", 6), Arc::new(graph))
        .observe_with(observer.clone())
        .run()
        .await
        .unwrap();

    let crawled: Vec<String> = observer
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Event::Crawling(url) => Some(url),
            _ => None,
        })
        .collect();
    let unique: HashSet<&String> = crawled.iter().collect();
    assert_eq!(unique.len(), crawled.len());
    assert!(crawled.contains(&page("N0")));
}

#[tokio::test]
async fn test_no_visit_count_after_sink_found() {
    let graph = Graph::generated(300, 4, 11);
    let observer = Arc::new(RecordingObserver::default());

    let report = Coordinator::new(config("N0", "N200", 4), Arc::new(graph))
        .observe_with(observer.clone())
        .run()
        .await
        .unwrap();
    assert!(report.outcome.is_found());

    let events = observer.events();
    let found_at = events
        .iter()
        .position(|e| matches!(e, Event::SinkFound(_)))
        .expect("sink found event");
    assert!(!events[found_at..]
        .iter()
        .any(|e| matches!(e, Event::VisitCount(_))));
    assert_eq!(events.last(), Some(&Event::Complete));

    // Counts only ever grow
    let counts: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            Event::VisitCount(n) => Some(*n),
            _ => None,
        })
        .collect();
    assert!(counts.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(events[found_at], Event::SinkFound(report.outcome.visits()));
}

#[tokio::test]
async fn test_failed_pages_are_dead_ends() {
    let graph = Graph::new(vec![
        ("A", vec!["B", "C"]),
        ("B", vec!["D"]),
        ("C", vec!["D"]),
    ])
    .failing(&["B"]);
    let observer = Arc::new(RecordingObserver::default());

    let report = Coordinator::new(config("A", "D", 1), Arc::new(graph))
        .observe_with(observer.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(
        report.outcome,
        CrawlOutcome::Found {
            visits: 2,
            path: vec![page("A"), page("C"), page("D")],
        }
    );
    assert_eq!(report.stats.extraction_failures, 1);
    assert!(observer.events().contains(&Event::Failed(page("B"))));
}

#[tokio::test]
async fn test_external_cancellation() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        Coordinator::new(config("A", "B", 4), Arc::new(StuckExtractor)).run_with_cancellation(cancel),
    )
    .await
    .expect("cancellation did not stop the run")
    .unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Cancelled { visits: 0 });
}

#[tokio::test]
async fn test_run_timeout() {
    let config = RunConfig::builder()
        .source(page("A"))
        .sink(page("B"))
        .thread_count(2)
        .run_timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        Coordinator::new(config, Arc::new(StuckExtractor)).run(),
    )
    .await
    .expect("run timeout did not stop the run")
    .unwrap();

    assert_eq!(report.outcome, CrawlOutcome::TimedOut { visits: 0 });
}

#[tokio::test]
async fn test_visit_counter_handle_tracks_run() {
    let graph = Graph::new(vec![("A", vec!["B", "C", "D"]), ("B", vec!["E"])]);
    let coordinator = Coordinator::new(config("A", "Z", 2), Arc::new(graph));
    let counter = coordinator.visit_counter();

    let report = coordinator.run().await.unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Exhausted { visits: 4 });
    assert_eq!(counter.get(), 4);
}

#[tokio::test]
async fn test_panicking_extractor_does_not_stall_search() {
    let graph = Graph::new(vec![("A", vec!["B", "C"]), ("C", vec!["D"])]);

    for threads in [2, 4] {
        let extractor = Arc::new(PanickingGraph(graph.clone()));
        let report = tokio::time::timeout(
            Duration::from_secs(5),
            Coordinator::new(config("A", "Z", threads), extractor).run(),
        )
        .await
        .expect("search stalled after an extractor panic")
        .unwrap();

        // B and D panic and become dead ends
        assert_eq!(report.outcome, CrawlOutcome::Exhausted { visits: 3 });
        assert_eq!(report.stats.extraction_failures, 2);
    }
}
