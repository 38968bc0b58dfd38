use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::{Barrier, Mutex};
use tracing_subscriber::fmt::MakeWriter;

use tradedesk_events::{
    DomainEvent, EventBus, EventBusConfig, EventHandler, HandlerResult, handler_fn,
};

#[derive(Debug, Clone)]
struct Tick {
    aggregate_id: String,
    seq: u32,
    occurred_at: DateTime<Utc>,
}

impl Tick {
    fn new(seq: u32) -> Self {
        Self {
            aggregate_id: "clock-1".to_string(),
            seq,
            occurred_at: Utc::now(),
        }
    }
}

impl DomainEvent for Tick {
    fn event_type(&self) -> &str {
        "test.clock.ticked"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    fn aggregate_id(&self) -> String {
        self.aggregate_id.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn counting(name: &str, counter: Arc<AtomicUsize>) -> Arc<dyn EventHandler> {
    handler_fn(name, move |_event| {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    })
}

#[tokio::test]
async fn publish_without_subscribers_resolves() {
    let bus = EventBus::new();
    let report = bus.publish_event(Tick::new(1)).await;
    assert_eq!(report.handlers(), 0);
}

#[tokio::test]
async fn failing_handler_does_not_stop_the_others() {
    let bus = EventBus::new();
    let counter = Arc::new(AtomicUsize::new(0));

    bus.subscribe(
        "test.clock.ticked",
        handler_fn("broken", |_event| async { anyhow::bail!("boom") }),
    )
    .unwrap();
    bus.subscribe("test.clock.ticked", counting("counter", Arc::clone(&counter)))
        .unwrap();

    let report = bus.publish_event(Tick::new(1)).await;

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);
}

struct Panicking;

#[async_trait::async_trait]
impl EventHandler for Panicking {
    async fn handle(&self, _event: Arc<dyn DomainEvent>) -> HandlerResult {
        panic!("handler exploded");
    }
}

#[tokio::test]
async fn panicking_handler_is_isolated() {
    let bus = EventBus::new();
    let counter = Arc::new(AtomicUsize::new(0));

    bus.subscribe("test.clock.ticked", Arc::new(Panicking)).unwrap();
    bus.subscribe("test.clock.ticked", counting("counter", Arc::clone(&counter)))
        .unwrap();

    let report = bus.publish_event(Tick::new(1)).await;

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(report.failed, 1);
}

#[tokio::test]
async fn handlers_run_concurrently() {
    let bus = EventBus::new();
    let barrier = Arc::new(Barrier::new(2));

    // Each handler waits for the other; sequential execution would never finish.
    for name in ["left", "right"] {
        let barrier = Arc::clone(&barrier);
        bus.subscribe(
            "test.clock.ticked",
            handler_fn(name, move |_event| {
                let barrier = Arc::clone(&barrier);
                async move {
                    barrier.wait().await;
                    Ok(())
                }
            }),
        )
        .unwrap();
    }

    let report = tokio::time::timeout(Duration::from_secs(5), bus.publish_event(Tick::new(1)))
        .await
        .expect("handlers were not run concurrently");
    assert_eq!(report.succeeded, 2);
}

#[tokio::test]
async fn handlers_can_downcast_the_payload() {
    let bus = EventBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    bus.subscribe(
        "test.clock.ticked",
        handler_fn("recorder", move |event| {
            let sink = Arc::clone(&sink);
            async move {
                let tick = event
                    .downcast_ref::<Tick>()
                    .ok_or_else(|| anyhow::anyhow!("unexpected payload"))?;
                sink.lock().await.push(tick.seq);
                Ok(())
            }
        }),
    )
    .unwrap();

    bus.publish_all([Tick::new(1), Tick::new(2), Tick::new(3)]).await;

    assert_eq!(*seen.lock().await, vec![1, 2, 3]);
}

#[tokio::test]
async fn unsubscribed_handler_no_longer_receives_events() {
    let bus = EventBus::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let handler = counting("counter", Arc::clone(&counter));

    bus.subscribe("test.clock.ticked", Arc::clone(&handler)).unwrap();
    bus.publish_event(Tick::new(1)).await;
    bus.unsubscribe("test.clock.ticked", &handler).unwrap();
    bus.publish_event(Tick::new(2)).await;

    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

/// Collects JSON log lines written by a scoped subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl CapturedLogs {
    fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(self.clone())
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn records(&self, level: &str, message: &str) -> Vec<Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter_map(|line| serde_json::from_str::<Value>(line).ok())
            .filter(|r| r["level"] == level && r["fields"]["message"] == message)
            .collect()
    }
}

#[tokio::test]
async fn slow_handler_completes_and_is_reported() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let bus = EventBus::with_config(EventBusConfig {
        slow_handler_threshold: Duration::from_millis(1),
    });
    bus.subscribe(
        "test.clock.ticked",
        handler_fn("sleepy", |_event| async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(())
        }),
    )
    .unwrap();

    let report = bus.publish_event(Tick::new(1)).await;
    assert_eq!(report.succeeded, 1);

    let warnings = logs.records("WARN", "slow event handler");
    assert_eq!(warnings.len(), 1);
    let fields = &warnings[0]["fields"];
    assert_eq!(fields["event_type"], "test.clock.ticked");
    assert_eq!(fields["aggregate_id"], "clock-1");
    assert_eq!(fields["handler"], "sleepy");
}

#[tokio::test]
async fn fast_handler_is_not_reported_as_slow() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let bus = EventBus::new();
    let counter = Arc::new(AtomicUsize::new(0));
    bus.subscribe("test.clock.ticked", counting("counter", Arc::clone(&counter)))
        .unwrap();

    bus.publish_event(Tick::new(1)).await;

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(logs.records("WARN", "slow event handler").is_empty());
    assert!(logs.records("ERROR", "event handler failed").is_empty());
}

#[tokio::test]
async fn handler_failure_is_logged_with_context() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let bus = EventBus::new();
    bus.subscribe(
        "test.clock.ticked",
        handler_fn("broken", |_event| async { anyhow::bail!("boom") }),
    )
    .unwrap();

    let report = bus.publish_event(Tick::new(1)).await;
    assert_eq!(report.failed, 1);

    let errors = logs.records("ERROR", "event handler failed");
    assert_eq!(errors.len(), 1);
    let fields = &errors[0]["fields"];
    assert_eq!(fields["event_type"], "test.clock.ticked");
    assert_eq!(fields["aggregate_id"], "clock-1");
    assert_eq!(fields["error"], "boom");
    let timestamp = fields["timestamp"].as_str().unwrap();
    assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn event_types_are_case_sensitive() {
    let bus = EventBus::new();
    let counter = Arc::new(AtomicUsize::new(0));
    bus.subscribe("TEST.CLOCK.TICKED", counting("counter", Arc::clone(&counter)))
        .unwrap();

    bus.publish_event(Tick::new(1)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}
