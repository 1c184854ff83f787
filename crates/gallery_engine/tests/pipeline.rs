use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use gallery_engine::{
    EngineEvent, EngineHandle, EngineSettings, FeedError, FeedSettings, FilterSettings,
    GalleryPipeline, ProbeSettings, ProgressSink,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn settings(server: &MockServer) -> EngineSettings {
    EngineSettings {
        feed: FeedSettings {
            base_url: format!("{}/", server.uri()),
            ..FeedSettings::default()
        },
        probe: ProbeSettings::default(),
        filter: FilterSettings {
            batch_size: 2,
            probe_timeout: Duration::from_millis(300),
            inter_batch_delay: Duration::from_millis(10),
        },
    }
}

async fn mount_image(server: &MockServer, name: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/{name}")))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_gallery(server: &MockServer) -> Vec<String> {
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" })))
        .mount(server)
        .await;

    let image = || ResponseTemplate::new(200).set_body_raw(b"GIF89a-data".to_vec(), "image/gif");
    mount_image(server, "a.gif", image()).await;
    mount_image(server, "b.gif", ResponseTemplate::new(404)).await;
    mount_image(server, "c.gif", image()).await;
    mount_image(server, "d.gif", image().set_delay(Duration::from_secs(3))).await;
    mount_image(server, "e.gif", image()).await;

    let urls: Vec<String> = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|name| format!("{}/{name}.gif", server.uri()))
        .collect();
    Mock::given(method("GET"))
        .and(path("/insta_feed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "driven34",
            "images": urls,
        })))
        .mount(server)
        .await;
    urls
}

#[tokio::test]
async fn pipeline_keeps_loadable_images_in_feed_order() {
    let server = MockServer::start().await;
    let urls = mount_gallery(&server).await;

    let pipeline = GalleryPipeline::from_settings(settings(&server)).expect("pipeline");
    let sink = TestSink::default();
    let output = pipeline.run(&sink).await.expect("pipeline ok");

    assert_eq!(output.username, "driven34");
    assert_eq!(output.report.candidate_count(), 5);
    assert_eq!(
        output.report.verified(),
        vec![urls[0].clone(), urls[2].clone(), urls[4].clone()]
    );

    let events = sink.events.lock().unwrap();
    assert_eq!(
        events[0],
        EngineEvent::FeedFetched {
            username: "driven34".to_string(),
            candidates: 5
        }
    );
    let settled = events
        .iter()
        .filter(|event| matches!(event, EngineEvent::ProbeSettled(_)))
        .count();
    assert_eq!(settled, 5);
}

#[tokio::test]
async fn unhealthy_server_stops_before_fetching_feed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/insta_feed"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pipeline = GalleryPipeline::from_settings(settings(&server)).expect("pipeline");
    let err = pipeline.run(&TestSink::default()).await.unwrap_err();
    assert!(matches!(err, FeedError::Unhealthy(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_handle_streams_events_until_probes_finish() {
    let server = MockServer::start().await;
    let urls = mount_gallery(&server).await;
    let engine = EngineHandle::new(GalleryPipeline::from_settings(settings(&server)).unwrap());

    engine.load();
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut finished = None;
    let mut settled = 0;
    while Instant::now() < deadline {
        match engine.recv_timeout(Duration::from_millis(50)).ok() {
            Some(EngineEvent::ProbeSettled(_)) => settled += 1,
            Some(EngineEvent::ProbesFinished { verified }) => {
                finished = Some(verified);
                break;
            }
            Some(EngineEvent::LoadFailed(err)) => panic!("load failed: {err}"),
            _ => {}
        }
    }

    assert_eq!(settled, 5);
    assert_eq!(
        finished.expect("probes finished"),
        vec![urls[0].clone(), urls[2].clone(), urls[4].clone()]
    );
}

#[test]
fn engine_timers_fire_and_cancel() {
    let engine = EngineHandle::new(
        GalleryPipeline::from_settings(EngineSettings::default()).expect("pipeline"),
    );

    engine.start_timer(1, Duration::from_millis(20), false);
    assert_eq!(
        engine.recv_timeout(Duration::from_secs(2)).ok(),
        Some(EngineEvent::TimerFired { timer_id: 1 })
    );

    engine.start_timer(2, Duration::from_millis(200), false);
    engine.cancel_timer(2);
    assert_eq!(engine.recv_timeout(Duration::from_millis(400)).ok(), None);
}
