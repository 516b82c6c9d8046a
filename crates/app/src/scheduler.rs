//! Evaluation scheduler — periodic engine ticks on a tokio task.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::engine::RuleEngine;
use crate::ports::IntentSink;

/// Default evaluation period.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2_000);

/// Drives [`RuleEngine::run_tick`] at a fixed interval.
///
/// `start` and `stop` are idempotent. The first tick fires one full
/// interval after `start`, not immediately.
pub struct Scheduler<S> {
    engine: Arc<RuleEngine<S>>,
    interval: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<S: IntentSink + Send + Sync + 'static> Scheduler<S> {
    #[must_use]
    pub fn new(engine: Arc<RuleEngine<S>>, interval: Duration) -> Self {
        Self {
            engine,
            interval,
            handle: Mutex::new(None),
        }
    }

    /// Begin periodic evaluation. Calling this while already running is
    /// a no-op.
    pub fn start(&self) {
        let mut handle = self
            .handle
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if handle.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }

        tracing::info!(interval_ms = self.interval.as_millis(), "scheduler started");
        let engine = Arc::clone(&self.engine);
        let period = self.interval;
        *handle = Some(tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                ticker.tick().await;
                engine.run_tick().await;
            }
        }));
    }

    /// Stop periodic evaluation. After this returns, no further tick
    /// will run. Calling this while stopped is a no-op.
    pub fn stop(&self) {
        let task = self
            .handle
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
            tracing::info!("scheduler stopped");
        }
    }

    /// Whether the evaluation loop is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl<S> Drop for Scheduler<S> {
    fn drop(&mut self) {
        if let Some(task) = self
            .handle
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pixelhub_domain::rule::{ActionKind, Rule};
    use pixelhub_domain::sensor::SensorValue;
    use pixelhub_domain::template::TemplateCatalog;

    use crate::intent_bus::InProcessIntentBus;
    use crate::rule_store::RuleStore;
    use crate::sensor_store::SensorStore;

    fn tick_rule() -> Rule {
        // No conditions, so the rule matches on every tick once its
        // topic has a stored value.
        Rule::builder()
            .name("Tick counter")
            .sensor_topic("sensors/heartbeat")
            .act(ActionKind::Effect {
                effect: Some("blink".to_string()),
                color: None,
                duration_ms: None,
            })
            .build()
            .unwrap()
    }

    fn setup(
        interval: Duration,
    ) -> (
        Scheduler<Arc<InProcessIntentBus>>,
        tokio::sync::broadcast::Receiver<pixelhub_domain::intent::Intent>,
    ) {
        let bus = Arc::new(InProcessIntentBus::new(64));
        let receiver = bus.subscribe();
        let sensors = Arc::new(SensorStore::new());
        // A rule bound to a topic with no stored value never matches,
        // so every tick needs this reading in place.
        sensors.update(SensorValue::new(
            "sensors/heartbeat",
            "Heartbeat",
            "counter",
            1.0,
        ));
        let engine = Arc::new(RuleEngine::new(
            Arc::new(RuleStore::new()),
            sensors,
            Arc::new(TemplateCatalog::builtin()),
            Arc::clone(&bus),
        ));
        engine.rules().insert(tick_rule());
        (Scheduler::new(engine, interval), receiver)
    }

    fn drain(receiver: &mut tokio::sync::broadcast::Receiver<pixelhub_domain::intent::Intent>) -> usize {
        let mut count = 0;
        while receiver.try_recv().is_ok() {
            count += 1;
        }
        count
    }

    #[tokio::test(start_paused = true)]
    async fn should_tick_once_per_interval() {
        let (scheduler, mut receiver) = setup(Duration::from_millis(100));
        scheduler.start();
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_millis(350)).await;
        tokio::task::yield_now().await;

        assert_eq!(drain(&mut receiver), 3);
        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_tick_before_first_interval_elapses() {
        let (scheduler, mut receiver) = setup(Duration::from_millis(100));
        scheduler.start();

        tokio::time::advance(Duration::from_millis(50)).await;
        tokio::task::yield_now().await;

        assert_eq!(drain(&mut receiver), 0);
        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_tick_after_stop() {
        let (scheduler, mut receiver) = setup(Duration::from_millis(100));
        scheduler.start();
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_millis(150)).await;
        tokio::task::yield_now().await;
        assert_eq!(drain(&mut receiver), 1);

        scheduler.stop();
        assert!(!scheduler.is_running());

        tokio::time::advance(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        assert_eq!(drain(&mut receiver), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn should_ignore_redundant_start_calls() {
        let (scheduler, mut receiver) = setup(Duration::from_millis(100));
        scheduler.start();
        scheduler.start();
        scheduler.start();
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_millis(150)).await;
        tokio::task::yield_now().await;

        // A single loop, not three.
        assert_eq!(drain(&mut receiver), 1);
        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn should_tolerate_redundant_stop_calls() {
        let (scheduler, _receiver) = setup(Duration::from_millis(100));
        scheduler.stop();
        scheduler.start();
        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn should_restart_after_stop() {
        let (scheduler, mut receiver) = setup(Duration::from_millis(100));
        scheduler.start();
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(100)).await;
        tokio::task::yield_now().await;
        scheduler.stop();
        drain(&mut receiver);

        scheduler.start();
        assert!(scheduler.is_running());
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(100)).await;
        tokio::task::yield_now().await;
        assert_eq!(drain(&mut receiver), 1);
        scheduler.stop();
    }
}
