use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gallery_engine::{
    EngineEvent, FailureKind, FilterSettings, ImageAvailabilityFilter, ProbeError, Prober,
    ProgressSink, Sleeper, TokioSleeper,
};
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, Copy)]
enum Behaviour {
    /// Loads after the given number of milliseconds.
    Loads(u64),
    Fails,
    NeverSettles,
}

struct StubProber {
    behaviours: HashMap<String, Behaviour>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl StubProber {
    fn new(entries: &[(&str, Behaviour)]) -> Arc<Self> {
        Arc::new(Self {
            behaviours: entries
                .iter()
                .map(|(url, behaviour)| (url.to_string(), *behaviour))
                .collect(),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Prober for StubProber {
    async fn probe(&self, url: &str) -> Result<(), ProbeError> {
        self.calls.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        match self.behaviours.get(url).copied().unwrap_or(Behaviour::Fails) {
            Behaviour::Loads(ms) => {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok(())
            }
            Behaviour::Fails => Err(ProbeError::new(FailureKind::HttpStatus(404), "not found")),
            Behaviour::NeverSettles => std::future::pending().await,
        }
    }
}

#[derive(Default)]
struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

#[async_trait::async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn settled_indexes(&self) -> Vec<usize> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::ProbeSettled(result) => Some(result.index),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn strings(urls: &[&str]) -> Vec<String> {
    urls.iter().map(|url| url.to_string()).collect()
}

fn settings(batch_size: usize) -> FilterSettings {
    FilterSettings {
        batch_size,
        ..FilterSettings::default()
    }
}

#[tokio::test(start_paused = true)]
async fn mixed_outcomes_keep_input_order() {
    let prober = StubProber::new(&[
        ("A", Behaviour::Loads(5)),
        ("B", Behaviour::Fails),
        ("C", Behaviour::Loads(5)),
        ("D", Behaviour::NeverSettles),
        ("E", Behaviour::Loads(5)),
    ]);
    let sleeper = Arc::new(RecordingSleeper::default());
    let filter =
        ImageAvailabilityFilter::new(prober.clone(), settings(2)).with_sleeper(sleeper.clone());

    let verified = filter.filter(&strings(&["A", "B", "C", "D", "E"])).await;

    assert_eq!(verified, strings(&["A", "C", "E"]));
    assert_eq!(prober.calls(), strings(&["A", "B", "C", "D", "E"]));
    // Three batches, so two pauses and none after the last.
    assert_eq!(
        *sleeper.slept.lock().unwrap(),
        vec![Duration::from_millis(500); 2]
    );
}

#[tokio::test]
async fn empty_input_issues_no_probes() {
    let prober = StubProber::new(&[]);
    let sleeper = Arc::new(RecordingSleeper::default());
    let filter =
        ImageAvailabilityFilter::new(prober.clone(), settings(5)).with_sleeper(sleeper.clone());

    let report = filter.probe_all(&[], &TestSink::default()).await;

    assert!(report.is_empty_input());
    assert!(!report.all_failed());
    assert!(report.verified().is_empty());
    assert!(prober.calls().is_empty());
    assert!(sleeper.slept.lock().unwrap().is_empty());
}

#[tokio::test]
async fn all_failures_are_reported_as_all_failed() {
    let prober = StubProber::new(&[("x", Behaviour::Fails), ("y", Behaviour::Fails)]);
    let filter = ImageAvailabilityFilter::new(prober, settings(5))
        .with_sleeper(Arc::new(RecordingSleeper::default()));

    let report = filter.probe_all(&strings(&["x", "y"]), &TestSink::default()).await;

    assert!(report.verified().is_empty());
    assert!(report.all_failed());
    assert!(!report.is_empty_input());
}

#[tokio::test(start_paused = true)]
async fn in_flight_probes_never_exceed_batch_size() {
    let urls: Vec<String> = (0..12).map(|i| format!("img-{i}")).collect();
    let entries: Vec<(&str, Behaviour)> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| (url.as_str(), Behaviour::Loads(10 + (i as u64 * 7) % 40)))
        .collect();
    let prober = StubProber::new(&entries);
    let filter = ImageAvailabilityFilter::new(prober.clone(), settings(5));

    let verified = filter.filter(&urls).await;

    assert_eq!(verified, urls);
    assert_eq!(prober.max_in_flight.load(Ordering::SeqCst), 5);
    assert_eq!(prober.in_flight.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn hanging_probe_fails_after_timeout_and_releases_next_batch() {
    let prober = StubProber::new(&[("slow", Behaviour::NeverSettles), ("ok", Behaviour::Loads(10))]);
    let filter = ImageAvailabilityFilter::new(
        prober.clone(),
        FilterSettings {
            batch_size: 1,
            probe_timeout: Duration::from_millis(10_000),
            inter_batch_delay: Duration::from_millis(500),
        },
    )
    .with_sleeper(Arc::new(TokioSleeper));

    let started = tokio::time::Instant::now();
    let verified = filter.filter(&strings(&["slow", "ok"])).await;
    let elapsed = started.elapsed();

    assert_eq!(verified, strings(&["ok"]));
    assert!(elapsed >= Duration::from_millis(10_510), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(10_520), "elapsed {elapsed:?}");
    // The timed-out probe was dropped rather than left running.
    assert_eq!(prober.in_flight.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn completion_order_does_not_change_output_order() {
    let prober = StubProber::new(&[
        ("first", Behaviour::Loads(50)),
        ("second", Behaviour::Loads(10)),
        ("third", Behaviour::Loads(30)),
    ]);
    let filter = ImageAvailabilityFilter::new(prober, settings(3));
    let sink = TestSink::default();

    let report = filter
        .probe_all(&strings(&["first", "second", "third"]), &sink)
        .await;

    assert_eq!(sink.settled_indexes(), vec![1, 2, 0]);
    assert_eq!(report.verified(), strings(&["first", "second", "third"]));
    assert_eq!(
        report.results.iter().map(|r| r.index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[tokio::test(start_paused = true)]
async fn eighteen_candidates_with_ten_loading() {
    let urls: Vec<String> = (0..18).map(|i| format!("https://cdn.example/{i}.jpg")).collect();
    // Ten of the eighteen candidates load.
    let loading: Vec<usize> = vec![0, 1, 2, 4, 6, 8, 10, 12, 14, 16];
    let entries: Vec<(&str, Behaviour)> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            let behaviour = if loading.contains(&i) {
                Behaviour::Loads(20)
            } else {
                Behaviour::Fails
            };
            (url.as_str(), behaviour)
        })
        .collect();
    let prober = StubProber::new(&entries);
    let sleeper = Arc::new(RecordingSleeper::default());
    let filter =
        ImageAvailabilityFilter::new(prober.clone(), settings(5)).with_sleeper(sleeper.clone());

    let verified = filter.filter(&urls).await;

    let expected: Vec<String> = loading.iter().map(|&i| urls[i].clone()).collect();
    assert_eq!(verified, expected);
    assert_eq!(prober.calls().len(), 18);
    assert_eq!(sleeper.slept.lock().unwrap().len(), 3);
}
