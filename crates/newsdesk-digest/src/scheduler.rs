//! The digest scheduler loop.
//!
//! A two-state machine: `Idle` (waiting for the next fire instant) and
//! `Firing` (running one digest cycle). The loop never exits on its own —
//! cycle failures are logged and the next day's fire is computed;
//! unexpected failures outside the cycle body back off a fixed hour and
//! resume. Shutdown is process shutdown (task abort).

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use newsdesk_core::gateway::MessageGateway;
use newsdesk_store::NewsStore;

use crate::format::{self, DigestEntry};
use crate::schedule::{self, ScheduleError};
use crate::zone::DigestZone;

/// How long the loop waits after a scheduling failure before retrying.
const FAILURE_BACKOFF: Duration = Duration::from_secs(3600);

/// Scheduler configuration, resolved from settings at startup.
#[derive(Clone, Debug)]
pub struct DigestConfig {
    /// Civil zone of the schedule.
    pub zone: DigestZone,
    /// Local fire hour (0–23).
    pub hour: u32,
    /// Local fire minute (0–59).
    pub minute: u32,
    /// Per-recipient delivery timeout during fan-out.
    pub delivery_timeout: Duration,
}

/// Observable scheduler state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the next fire instant.
    Idle,
    /// Executing a digest cycle.
    Firing,
}

/// What one digest cycle did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleReport {
    /// The summarized local calendar day.
    pub date: NaiveDate,
    /// Items found in the window.
    pub item_count: usize,
    /// Successful deliveries.
    pub delivered: usize,
    /// Failed or timed-out deliveries.
    pub failed: usize,
}

/// Recurring daily digest over the store, delivered via the gateway.
pub struct DigestScheduler<G> {
    store: Arc<NewsStore>,
    gateway: Arc<G>,
    config: DigestConfig,
    state: Mutex<SchedulerState>,
}

impl<G: MessageGateway + 'static> DigestScheduler<G> {
    /// Create a scheduler. Nothing runs until [`Self::spawn`] or
    /// [`Self::run`].
    pub fn new(store: Arc<NewsStore>, gateway: Arc<G>, config: DigestConfig) -> Self {
        Self {
            store,
            gateway,
            config,
            state: Mutex::new(SchedulerState::Idle),
        }
    }

    /// Current state, for observability and tests.
    pub fn state(&self) -> SchedulerState {
        *self.state.lock()
    }

    /// Spawn the scheduler loop onto the runtime.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.run().await })
    }

    /// Run the scheduler loop forever.
    pub async fn run(&self) {
        loop {
            if let Err(e) = self.idle_then_fire_once().await {
                // Scheduling arithmetic failed (misconfigured fire time,
                // DST gap). Keep the process alive: back off and resume.
                error!(error = %e, backoff_secs = FAILURE_BACKOFF.as_secs(), "digest loop error");
                tokio::time::sleep(FAILURE_BACKOFF).await;
            }
        }
    }

    /// One `Idle → Firing → Idle` pass.
    async fn idle_then_fire_once(&self) -> Result<(), ScheduleError> {
        let now = Utc::now();
        let fire_at = schedule::next_fire(now, &self.config.zone, self.config.hour, self.config.minute)?;
        let wait = (fire_at - now).to_std().unwrap_or(Duration::ZERO);
        info!(fire_at = %fire_at, wait_secs = wait.as_secs(), "next daily digest scheduled");
        tokio::time::sleep(wait).await;

        *self.state.lock() = SchedulerState::Firing;
        match self.run_cycle(Utc::now()).await {
            Ok(report) => info!(
                date = %report.date,
                items = report.item_count,
                delivered = report.delivered,
                failed = report.failed,
                "daily digest cycle complete"
            ),
            // Cycle failures never propagate past the cycle boundary:
            // the scheduler goes back to Idle and retries tomorrow.
            Err(e) => error!(error = %e, "daily digest cycle failed"),
        }
        *self.state.lock() = SchedulerState::Idle;
        Ok(())
    }

    /// Execute one digest cycle for the day before `now`.
    ///
    /// Public with an explicit `now` so tests (and an operator
    /// re-delivery path) can run a cycle deterministically.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> Result<CycleReport, ScheduleError> {
        let window = schedule::yesterday_window(now, &self.config.zone)?;
        let items = self.store.items_in_range(window.start_utc, window.end_utc);

        if items.is_empty() {
            info!(date = %window.date, "no items in digest window; nothing sent");
            return Ok(CycleReport {
                date: window.date,
                item_count: 0,
                delivered: 0,
                failed: 0,
            });
        }

        let entries: Vec<DigestEntry> = items
            .into_iter()
            .map(|item| DigestEntry {
                local_time: self
                    .config
                    .zone
                    .to_local(item.created_at)
                    .format("%H:%M")
                    .to_string(),
                approvals: self.store.count_approvals(item.id),
                item,
            })
            .collect();
        let message = format::digest_message(window.date, &entries);

        // Sequential fan-out. A blocked or hung recipient must not abort
        // delivery to the rest, so each send is individually bounded and
        // individually logged.
        let mut delivered = 0;
        let mut failed = 0;
        for participant in self.store.all_participants() {
            let send = self.gateway.send_text(&participant.external_id, &message);
            match tokio::time::timeout(self.config.delivery_timeout, send).await {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    warn!(recipient = %participant.external_id, error = %e, "digest delivery failed");
                    failed += 1;
                }
                Err(_) => {
                    warn!(
                        recipient = %participant.external_id,
                        timeout_secs = self.config.delivery_timeout.as_secs(),
                        "digest delivery timed out"
                    );
                    failed += 1;
                }
            }
        }

        Ok(CycleReport {
            date: window.date,
            item_count: entries.len(),
            delivered,
            failed,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use newsdesk_core::gateway::DeliveryError;
    use newsdesk_core::ids::ExternalId;
    use std::collections::HashSet;

    /// Gateway fake: records deliveries, fails configured recipients,
    /// optionally hangs forever for one recipient.
    #[derive(Default)]
    struct FakeGateway {
        sent: Mutex<Vec<(ExternalId, String)>>,
        unreachable: HashSet<String>,
        hang_for: Option<String>,
    }

    #[async_trait]
    impl MessageGateway for FakeGateway {
        async fn send_text(
            &self,
            recipient: &ExternalId,
            text: &str,
        ) -> Result<(), DeliveryError> {
            if self.hang_for.as_deref() == Some(recipient.as_str()) {
                std::future::pending::<()>().await;
            }
            if self.unreachable.contains(recipient.as_str()) {
                return Err(DeliveryError::Unreachable {
                    recipient: recipient.clone(),
                    reason: "blocked".into(),
                });
            }
            self.sent.lock().push((recipient.clone(), text.to_string()));
            Ok(())
        }
    }

    fn config() -> DigestConfig {
        DigestConfig {
            zone: DigestZone::default_offset(),
            hour: 7,
            minute: 30,
            delivery_timeout: Duration::from_secs(5),
        }
    }

    /// Store seeded with items straddling the local-midnight boundary.
    fn seeded_store(dir: &tempfile::TempDir) -> Arc<NewsStore> {
        let store = NewsStore::open(dir.path().join("state.json"));
        let a = store.register_participant(&ExternalId::new("alice")).value;
        let _ = store.register_participant(&ExternalId::new("bob"));

        let at = |y, mo, d, h, mi| Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap();
        let in_window = store
            .submit_item_at("in window", vec!["rust".into()], a, at(2024, 1, 1, 10, 0))
            .unwrap()
            .value;
        let _ = store
            .submit_item_at("after local midnight", vec![], a, at(2024, 1, 1, 23, 59))
            .unwrap();
        let _ = store
            .submit_item_at("next day", vec![], a, at(2024, 1, 2, 0, 1))
            .unwrap();
        let _ = store.record_approval(a, in_window).unwrap();
        Arc::new(store)
    }

    #[tokio::test]
    async fn cycle_summarizes_only_the_local_yesterday() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir);
        let gateway = Arc::new(FakeGateway::default());
        let scheduler = DigestScheduler::new(store, Arc::clone(&gateway), config());

        // "Now" is the morning of Jan 2 local (+03:00).
        let report = scheduler
            .run_cycle(Utc.with_ymd_and_hms(2024, 1, 2, 4, 30, 0).unwrap())
            .await
            .unwrap();

        assert_eq!(report.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(report.item_count, 1, "only the 10:00Z item is in window");
        assert_eq!(report.delivered, 2, "both participants receive the digest");

        let sent = gateway.sent.lock();
        // Same text to everyone; local time is 13:00 for the 10:00Z item.
        assert!(sent.iter().all(|(_, text)| text.contains("News #1 (13:00)")));
        assert!(sent[0].1.contains("👍 1 likes"));
        assert!(!sent[0].1.contains("after local midnight"));
    }

    #[tokio::test]
    async fn empty_window_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(NewsStore::open(dir.path().join("state.json")));
        let _ = store.register_participant(&ExternalId::new("alice"));
        let gateway = Arc::new(FakeGateway::default());
        let scheduler = DigestScheduler::new(store, Arc::clone(&gateway), config());

        let report = scheduler
            .run_cycle(Utc.with_ymd_and_hms(2024, 1, 2, 4, 30, 0).unwrap())
            .await
            .unwrap();

        assert_eq!(report.item_count, 0);
        assert!(gateway.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn fan_out_continues_past_unreachable_recipients() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir);
        let gateway = Arc::new(FakeGateway {
            unreachable: HashSet::from(["alice".to_string()]),
            ..FakeGateway::default()
        });
        let scheduler = DigestScheduler::new(store, Arc::clone(&gateway), config());

        let report = scheduler
            .run_cycle(Utc.with_ymd_and_hms(2024, 1, 2, 4, 30, 0).unwrap())
            .await
            .unwrap();

        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 1);
        let sent = gateway.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, ExternalId::new("bob"));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_delivery_is_bounded_by_the_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir);
        let gateway = Arc::new(FakeGateway {
            hang_for: Some("alice".to_string()),
            ..FakeGateway::default()
        });
        let scheduler = DigestScheduler::new(store, Arc::clone(&gateway), config());

        // Paused clock: the 5 s timeout elapses instantly instead of
        // stalling the test.
        let report = scheduler
            .run_cycle(Utc.with_ymd_and_hms(2024, 1, 2, 4, 30, 0).unwrap())
            .await
            .unwrap();

        assert_eq!(report.failed, 1, "hung recipient counted as failed");
        assert_eq!(report.delivered, 1, "bob still got the digest");
    }

    #[tokio::test(start_paused = true)]
    async fn loop_fires_delivers_and_returns_to_idle() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(NewsStore::open(dir.path().join("state.json")));
        let p = store.register_participant(&ExternalId::new("alice")).value;
        // An item from 24 h ago always lands on yesterday's local day.
        let _ = store
            .submit_item_at(
                "from yesterday",
                vec![],
                p,
                Utc::now() - chrono::Duration::days(1),
            )
            .unwrap();
        let gateway = Arc::new(FakeGateway::default());
        let scheduler = Arc::new(DigestScheduler::new(store, Arc::clone(&gateway), config()));

        let handle = scheduler.spawn();
        tokio::task::yield_now().await;

        // The first fire is at most 24 h out; step the paused clock past
        // it one hour at a time and stop at the first delivery.
        for _ in 0..30 {
            tokio::time::advance(Duration::from_secs(3600)).await;
            tokio::task::yield_now().await;
            if !gateway.sent.lock().is_empty() {
                break;
            }
        }

        {
            let sent = gateway.sent.lock();
            assert_eq!(sent.len(), 1, "one delivery per registered participant");
            assert_eq!(sent[0].0, ExternalId::new("alice"));
            assert!(sent[0].1.contains("from yesterday"));
        }

        // Cycle complete: back to Idle with the next fire computed.
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(!handle.is_finished(), "loop must keep running after a fire");
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn loop_waits_idle_until_fire_time() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(NewsStore::open(dir.path().join("state.json")));
        let gateway = Arc::new(FakeGateway::default());
        let scheduler = Arc::new(DigestScheduler::new(store, gateway, config()));

        let handle = scheduler.spawn();
        tokio::task::yield_now().await;
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(!handle.is_finished(), "loop must keep running");
        handle.abort();
    }
}
