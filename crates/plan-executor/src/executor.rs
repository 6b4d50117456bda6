//! The plan executor.

use std::sync::Arc;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use tubepilot_action_adapters::{ActionAdapters, AdapterError, Notifier, PageProbe};
use tubepilot_checkpoint_store::CheckpointStore;
use tubepilot_core_types::{
    is_video_page_url, Action, Checkpoint, NotificationKind, Plan, PlanStep, Priority, StepOutcome,
};

use crate::config::ExecutorConfig;

/// Result of one executor invocation.
#[derive(Debug, Clone)]
pub struct PlanSummary {
    /// The message handed back to the caller: a single step's raw result,
    /// an aggregate completion line, or the navigation step's description
    /// when execution was suspended.
    pub message: String,
    /// One entry per executed step, success or failure.
    pub outcomes: Vec<StepOutcome>,
    /// True when a checkpoint was persisted and control is expected to
    /// transfer to the resumption loader on the next page activation.
    pub navigation_pending: bool,
}

impl PlanSummary {
    fn finished(message: impl Into<String>, outcomes: Vec<StepOutcome>) -> Self {
        Self {
            message: message.into(),
            outcomes,
            navigation_pending: false,
        }
    }
}

/// Executes plans one step at a time, in list order.
///
/// Steps are never run in parallel: each action may depend on the page state
/// the previous one produced. The executor suspends at the video-ready poll,
/// the inter-step delay, and every adapter call; it has no cancellation
/// mechanism; a started plan runs to completion, to a navigation boundary,
/// or to the end of the step list.
pub struct PlanExecutor {
    adapters: Arc<dyn ActionAdapters>,
    checkpoints: CheckpointStore,
    page: Arc<dyn PageProbe>,
    notifier: Arc<dyn Notifier>,
    config: ExecutorConfig,
}

impl PlanExecutor {
    pub fn new(
        adapters: Arc<dyn ActionAdapters>,
        checkpoints: CheckpointStore,
        page: Arc<dyn PageProbe>,
        notifier: Arc<dyn Notifier>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            adapters,
            checkpoints,
            page,
            notifier,
            config,
        }
    }

    /// Runs a freshly planned sequence from the beginning.
    pub async fn run_plan(&self, plan: &Plan) -> PlanSummary {
        info!(plan = %plan.id, steps = plan.len(), "executing plan");
        self.execute(&plan.steps, 0, None).await
    }

    /// Executes `steps[start_index..]` in strict sequence.
    ///
    /// `prior` is the priority of the step executed before `start_index`:
    /// `None` on a fresh plan, `Some(Priority::Navigation)` when resuming
    /// after a navigation (the step that caused the reload was, by
    /// construction, a navigation step).
    ///
    /// Never returns an error: every failure degrades to a displayed
    /// message, and a malformed call yields an "invalid plan" summary
    /// without attempting any step.
    pub async fn execute(
        &self,
        steps: &[PlanStep],
        start_index: usize,
        prior: Option<Priority>,
    ) -> PlanSummary {
        if steps.is_empty() || start_index >= steps.len() {
            warn!(
                start_index,
                steps = steps.len(),
                "refusing to execute malformed plan"
            );
            return PlanSummary::finished("Invalid action plan", Vec::new());
        }

        let total = steps.len();
        let mut outcomes: Vec<StepOutcome> = Vec::with_capacity(total - start_index);
        let mut previous = prior;

        for (i, step) in steps.iter().enumerate().skip(start_index) {
            debug!(index = i, action = %step.action, tier = ?step.priority, "executing step");

            if total > 1 {
                self.notify(
                    NotificationKind::System,
                    &format!("Step {}/{}: {}", i + 1, total, step.explanation),
                )
                .await;
            }

            // Transitioning from a navigation step to an in-page step: give
            // the freshly loaded video page time to become interactable.
            if previous == Some(Priority::Navigation) && step.priority == Priority::Interaction {
                self.notify(NotificationKind::System, "Waiting for page to fully load...")
                    .await;
                self.wait_for_video_ready().await;
            }

            if step.action.is_navigation() {
                let has_followers = i < total - 1;

                if has_followers {
                    // The navigation tears down this context; the remaining
                    // steps must be durable before the side effect fires.
                    let checkpoint = Checkpoint::new(steps.to_vec(), i + 1);
                    if let Err(err) = self.checkpoints.save(&checkpoint).await {
                        warn!(error = %err, index = i, "checkpoint write failed; skipping navigation");
                        self.record_failure(&mut outcomes, i, &err.to_string()).await;
                        continue;
                    }
                    let notice = match step.action {
                        Action::Play => "Navigating to video... (will continue after page loads)",
                        _ => "Navigating to search results... (will continue after page loads)",
                    };
                    self.notify(NotificationKind::Agent, notice).await;
                }

                match self.dispatch_navigation(step).await {
                    Ok(message) => {
                        // The page is about to go away; hand the result back
                        // and let the resumption loader pick up the rest.
                        outcomes.push(StepOutcome::success(i, message.clone()));
                        info!(index = i, pending = has_followers, "suspended at navigation step");
                        return PlanSummary {
                            message,
                            outcomes,
                            navigation_pending: has_followers,
                        };
                    }
                    Err(err) => {
                        // No navigation happened; a checkpoint left behind
                        // would replay against an unrelated future load.
                        if has_followers {
                            if let Err(clear_err) = self.checkpoints.clear().await {
                                warn!(error = %clear_err, "failed to clear checkpoint after navigation failure");
                            }
                        }
                        self.record_failure(&mut outcomes, i, &err.to_string()).await;
                        continue;
                    }
                }
            }

            match self.dispatch_in_page(step).await {
                Ok(message) => {
                    outcomes.push(StepOutcome::success(i, message.clone()));
                    if total > 1 {
                        self.notify(NotificationKind::Agent, &message).await;
                    }
                }
                Err(err) => {
                    self.record_failure(&mut outcomes, i, &err.to_string()).await;
                    continue;
                }
            }

            if i < total - 1 && step.priority == Priority::Interaction {
                sleep(self.config.inter_step_delay).await;
            }

            previous = Some(step.priority);
        }

        let message = if total == 1 {
            outcomes
                .first()
                .map(|outcome| outcome.message.clone())
                .unwrap_or_else(|| "Invalid action plan".to_string())
        } else {
            format!("Completed {} steps.", outcomes.len())
        };
        PlanSummary::finished(message, outcomes)
    }

    async fn dispatch_navigation(&self, step: &PlanStep) -> Result<String, AdapterError> {
        match step.action {
            Action::Search => self.adapters.search(&step.parameters).await,
            Action::Play => self.adapters.play(&step.parameters).await,
            // is_navigation() gates this path.
            _ => unreachable!("non-navigation action dispatched as navigation"),
        }
    }

    async fn dispatch_in_page(&self, step: &PlanStep) -> Result<String, AdapterError> {
        match step.action {
            Action::Like => self.adapters.like(&step.parameters).await,
            Action::Dislike => self.adapters.dislike(&step.parameters).await,
            Action::Save => self.adapters.save(&step.parameters).await,
            Action::Comment => self.adapters.comment(&step.parameters).await,
            Action::Subscribe => self.adapters.subscribe(&step.parameters).await,
            // Unknown counts as a completed, non-failing step.
            Action::Unknown => Ok(format!(
                "Action \"{}\" is not yet implemented.",
                step.action
            )),
            Action::Search | Action::Play => {
                unreachable!("navigation action dispatched as in-page")
            }
        }
    }

    async fn record_failure(&self, outcomes: &mut Vec<StepOutcome>, index: usize, reason: &str) {
        let outcome = StepOutcome::failure(index, reason);
        self.notify(NotificationKind::Agent, &outcome.message).await;
        outcomes.push(outcome);
    }

    async fn notify(&self, kind: NotificationKind, text: &str) {
        self.notifier.notify(kind, text).await;
    }

    /// Polls until the page is a loaded video page, or the timeout elapses.
    ///
    /// On timeout execution proceeds anyway: the subsequent adapter call may
    /// still fail if the page genuinely is not ready, and that failure is
    /// handled by ordinary per-step failure policy.
    async fn wait_for_video_ready(&self) {
        let deadline = Instant::now() + self.config.ready_timeout;
        loop {
            let url = self.page.current_url().await;
            if is_video_page_url(&url) && self.page.is_loaded().await {
                // Small extra pause so the player finishes initializing.
                sleep(self.config.ready_settle_delay).await;
                return;
            }
            if Instant::now() >= deadline {
                debug!("video-ready wait timed out; continuing");
                return;
            }
            sleep(self.config.ready_poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ResumptionLoader;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tubepilot_checkpoint_store::{KeyValueStore, MemoryStore, StoreError};
    use tubepilot_core_types::{watch_url, StepParameters};

    /// Shared chronological log so tests can assert ordering across the
    /// store, the adapters, and the notifier.
    type EventLog = Arc<Mutex<Vec<String>>>;

    struct SpyStore {
        inner: MemoryStore,
        log: EventLog,
        fail_set: bool,
    }

    #[async_trait]
    impl KeyValueStore for SpyStore {
        async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
            if self.fail_set {
                return Err(StoreError::Backend("disk full".to_string()));
            }
            self.log.lock().push(format!("store.set {key}"));
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.log.lock().push(format!("store.remove {key}"));
            self.inner.remove(key).await
        }
    }

    struct FakePage {
        url: Mutex<String>,
        loaded: Mutex<bool>,
    }

    impl FakePage {
        fn on_video() -> Arc<Self> {
            Arc::new(Self {
                url: Mutex::new(watch_url("kJQP7kiw5Fk")),
                loaded: Mutex::new(true),
            })
        }

    }

    #[async_trait]
    impl PageProbe for FakePage {
        async fn current_url(&self) -> String {
            self.url.lock().clone()
        }

        async fn is_loaded(&self) -> bool {
            *self.loaded.lock()
        }
    }

    struct FakeNotifier {
        log: EventLog,
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn notify(&self, kind: NotificationKind, text: &str) {
            self.log.lock().push(format!("notify.{kind} {text}"));
        }
    }

    /// Adapters that log every invocation and fail on request.
    struct FakeAdapters {
        log: EventLog,
        failures: HashMap<Action, String>,
    }

    impl FakeAdapters {
        fn ok(log: EventLog) -> Arc<Self> {
            Arc::new(Self {
                log,
                failures: HashMap::new(),
            })
        }

        fn failing(log: EventLog, failures: &[(Action, &str)]) -> Arc<Self> {
            Arc::new(Self {
                log,
                failures: failures
                    .iter()
                    .map(|(action, reason)| (*action, reason.to_string()))
                    .collect(),
            })
        }

        fn call(&self, action: Action, message: &str) -> Result<String, AdapterError> {
            self.log.lock().push(format!("adapter.{action}"));
            match self.failures.get(&action) {
                Some(reason) => Err(AdapterError::api(reason.clone())),
                None => Ok(message.to_string()),
            }
        }
    }

    #[async_trait]
    impl ActionAdapters for FakeAdapters {
        async fn search(&self, _p: &StepParameters) -> Result<String, AdapterError> {
            self.call(Action::Search, "Navigating to search results for \"rust\"")
        }

        async fn play(&self, _p: &StepParameters) -> Result<String, AdapterError> {
            self.call(Action::Play, "Playing: \"Despacito\" by Luis Fonsi")
        }

        async fn like(&self, _p: &StepParameters) -> Result<String, AdapterError> {
            self.call(Action::Like, "Video liked successfully!")
        }

        async fn dislike(&self, _p: &StepParameters) -> Result<String, AdapterError> {
            self.call(Action::Dislike, "Video disliked successfully!")
        }

        async fn save(&self, _p: &StepParameters) -> Result<String, AdapterError> {
            self.call(Action::Save, "Video saved to \"Saved Videos\" playlist!")
        }

        async fn comment(&self, _p: &StepParameters) -> Result<String, AdapterError> {
            self.call(Action::Comment, "Comment posted")
        }

        async fn subscribe(&self, _p: &StepParameters) -> Result<String, AdapterError> {
            self.call(Action::Subscribe, "Subscribed to the channel!")
        }
    }

    struct Harness {
        executor: PlanExecutor,
        checkpoints: CheckpointStore,
        log: EventLog,
    }

    fn harness_with(
        adapters: Arc<FakeAdapters>,
        page: Arc<FakePage>,
        log: EventLog,
        fail_checkpoint_writes: bool,
    ) -> Harness {
        let store = Arc::new(SpyStore {
            inner: MemoryStore::new(),
            log: log.clone(),
            fail_set: fail_checkpoint_writes,
        });
        let checkpoints = CheckpointStore::new(store);
        let notifier = Arc::new(FakeNotifier { log: log.clone() });
        let executor = PlanExecutor::new(
            adapters,
            checkpoints.clone(),
            page,
            notifier,
            ExecutorConfig::default(),
        );
        Harness {
            executor,
            checkpoints,
            log,
        }
    }

    fn harness(log: EventLog) -> Harness {
        harness_with(FakeAdapters::ok(log.clone()), FakePage::on_video(), log, false)
    }

    fn play_step() -> PlanStep {
        PlanStep::new(Action::Play, Priority::Navigation)
            .with_parameters(StepParameters::with_query("Despacito"))
            .with_explanation("Playing Despacito")
    }

    fn like_step() -> PlanStep {
        PlanStep::new(Action::Like, Priority::Interaction).with_explanation("Liking the video")
    }

    fn save_step() -> PlanStep {
        PlanStep::new(Action::Save, Priority::Interaction).with_explanation("Saving the video")
    }

    #[tokio::test(start_paused = true)]
    async fn single_step_returns_raw_adapter_result() {
        let log: EventLog = Default::default();
        let h = harness(log);

        let summary = h.executor.execute(&[like_step()], 0, None).await;

        assert_eq!(summary.message, "Video liked successfully!");
        assert_eq!(summary.outcomes.len(), 1);
        assert!(!summary.outcomes[0].failed);
        assert!(!summary.navigation_pending);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_plan_is_rejected_without_dispatch() {
        let log: EventLog = Default::default();
        let h = harness(log.clone());

        let summary = h.executor.execute(&[], 0, None).await;
        assert_eq!(summary.message, "Invalid action plan");
        assert!(summary.outcomes.is_empty());

        let summary = h.executor.execute(&[like_step()], 5, None).await;
        assert_eq!(summary.message, "Invalid action plan");
        assert!(log.lock().iter().all(|e| !e.starts_with("adapter.")));
    }

    #[tokio::test(start_paused = true)]
    async fn checkpoint_is_persisted_before_navigation_fires() {
        let log: EventLog = Default::default();
        let h = harness(log.clone());
        let steps = vec![play_step(), like_step()];

        let summary = h.executor.execute(&steps, 0, None).await;

        // Executor suspends right after the navigation step.
        assert_eq!(summary.message, "Playing: \"Despacito\" by Luis Fonsi");
        assert!(summary.navigation_pending);
        assert_eq!(summary.outcomes.len(), 1);

        // The write precedes the navigation side effect.
        let events = log.lock().clone();
        let set_at = events
            .iter()
            .position(|e| e.starts_with("store.set"))
            .expect("checkpoint written");
        let nav_at = events
            .iter()
            .position(|e| e == "adapter.play_video")
            .expect("navigation dispatched");
        assert!(set_at < nav_at, "events: {events:?}");

        // The like step never ran in this context.
        assert!(!events.iter().any(|e| e == "adapter.like_video"));

        let checkpoint = h.checkpoints.load().await.unwrap().expect("checkpoint");
        assert_eq!(checkpoint.next_index, 1);
        assert_eq!(checkpoint.steps, steps);
    }

    #[tokio::test(start_paused = true)]
    async fn trailing_navigation_step_persists_nothing() {
        let log: EventLog = Default::default();
        let h = harness(log.clone());

        let summary = h.executor.execute(&[like_step(), play_step()], 0, None).await;

        assert!(!summary.navigation_pending);
        assert!(h.checkpoints.load().await.unwrap().is_none());
        assert!(!log.lock().iter().any(|e| e.starts_with("store.set")));
        assert_eq!(summary.message, "Playing: \"Despacito\" by Luis Fonsi");
    }

    #[tokio::test(start_paused = true)]
    async fn resume_executes_only_remaining_steps() {
        let log: EventLog = Default::default();
        let h = harness(log.clone());
        let steps = vec![play_step(), like_step(), save_step()];

        let summary = h
            .executor
            .execute(&steps, 1, Some(Priority::Navigation))
            .await;

        assert_eq!(summary.outcomes.len(), 2);
        assert_eq!(summary.message, "Completed 2 steps.");
        let events = log.lock().clone();
        assert!(!events.iter().any(|e| e == "adapter.play_video"));
        assert!(events.iter().any(|e| e == "adapter.like_video"));
        assert!(events.iter().any(|e| e == "adapter.save_video"));
    }

    #[tokio::test(start_paused = true)]
    async fn readiness_wait_runs_once_on_resumed_transition() {
        let log: EventLog = Default::default();
        let h = harness(log.clone());
        let steps = vec![play_step(), like_step(), save_step()];

        h.executor
            .execute(&steps, 1, Some(Priority::Navigation))
            .await;

        let waits = log
            .lock()
            .iter()
            .filter(|e| e.contains("Waiting for page to fully load"))
            .count();
        assert_eq!(waits, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn readiness_wait_times_out_and_proceeds() {
        let log: EventLog = Default::default();
        // Not a video page and never finishes loading.
        let page = Arc::new(FakePage {
            url: Mutex::new("https://www.youtube.com/results?search_query=x".to_string()),
            loaded: Mutex::new(false),
        });
        let h = harness_with(FakeAdapters::ok(log.clone()), page, log.clone(), false);

        let steps = vec![play_step(), like_step()];
        let summary = h
            .executor
            .execute(&steps, 1, Some(Priority::Navigation))
            .await;

        // The like step still ran after the bounded wait gave up.
        assert!(log.lock().iter().any(|e| e == "adapter.like_video"));
        assert_eq!(summary.outcomes.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn step_failure_does_not_abort_the_plan() {
        let log: EventLog = Default::default();
        let adapters = FakeAdapters::failing(log.clone(), &[(Action::Like, "rate limit")]);
        let h = harness_with(adapters, FakePage::on_video(), log, false);

        let summary = h.executor.execute(&[like_step(), save_step()], 0, None).await;

        assert_eq!(summary.outcomes.len(), 2);
        assert_eq!(summary.outcomes[0].message, "Step 1 failed: rate limit");
        assert!(summary.outcomes[0].failed);
        assert!(!summary.outcomes[1].failed);
        assert_eq!(
            summary.outcomes[1].message,
            "Video saved to \"Saved Videos\" playlist!"
        );
        assert_eq!(summary.message, "Completed 2 steps.");
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_action_completes_without_failing() {
        let log: EventLog = Default::default();
        let h = harness(log.clone());
        let unknown =
            PlanStep::new(Action::Unknown, Priority::Interaction).with_explanation("mystery");

        let summary = h.executor.execute(&[unknown], 0, None).await;

        assert!(!summary.outcomes[0].failed);
        assert_eq!(summary.message, "Action \"unknown\" is not yet implemented.");
        assert!(log.lock().iter().all(|e| !e.starts_with("adapter.")));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_navigation_clears_checkpoint_and_continues() {
        let log: EventLog = Default::default();
        let adapters = FakeAdapters::failing(log.clone(), &[(Action::Play, "quota exceeded")]);
        let h = harness_with(adapters, FakePage::on_video(), log.clone(), false);

        let summary = h.executor.execute(&[play_step(), like_step()], 0, None).await;

        // No navigation happened, so the slot must not linger.
        assert!(h.checkpoints.load().await.unwrap().is_none());
        assert_eq!(summary.outcomes.len(), 2);
        assert_eq!(summary.outcomes[0].message, "Step 1 failed: quota exceeded");
        assert!(log.lock().iter().any(|e| e == "adapter.like_video"));
    }

    #[tokio::test(start_paused = true)]
    async fn checkpoint_write_failure_skips_the_navigation() {
        let log: EventLog = Default::default();
        let h = harness_with(
            FakeAdapters::ok(log.clone()),
            FakePage::on_video(),
            log.clone(),
            true,
        );

        let summary = h.executor.execute(&[play_step(), like_step()], 0, None).await;

        // The navigation adapter must never fire without a durable checkpoint.
        assert!(!log.lock().iter().any(|e| e == "adapter.play_video"));
        assert!(summary.outcomes[0].failed);
        assert_eq!(summary.outcomes.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn despacito_play_then_like_across_reload() {
        let log: EventLog = Default::default();
        let h = harness(log.clone());
        let steps = vec![play_step(), like_step()];

        // Fresh start: checkpoint written, executor returns the play result.
        let first = h.executor.execute(&steps, 0, None).await;
        assert_eq!(first.message, "Playing: \"Despacito\" by Luis Fonsi");
        assert!(first.navigation_pending);
        let checkpoint = h.checkpoints.load().await.unwrap().expect("checkpoint");
        assert_eq!(checkpoint.next_index, 1);

        // Next page load: the loader replays the tail and clears the slot.
        let loader = ResumptionLoader::new(
            Arc::new(h.executor),
            h.checkpoints.clone(),
            Arc::new(FakeNotifier { log: log.clone() }),
            ExecutorConfig::default(),
        );
        let resumed = loader.resume_pending().await.expect("resumption ran");

        assert_eq!(resumed.outcomes.len(), 1);
        assert_eq!(resumed.outcomes[0].message, "Video liked successfully!");
        assert!(h.checkpoints.load().await.unwrap().is_none());

        let events = log.lock().clone();
        assert!(events.iter().any(|e| e.contains("Resuming multi-step command")));
        // Readiness wait fired for the resumed navigation→interaction edge.
        assert!(events.iter().any(|e| e.contains("Waiting for page to fully load")));
    }

    #[tokio::test(start_paused = true)]
    async fn like_failure_then_save_success_matches_expected_results() {
        let log: EventLog = Default::default();
        let adapters = FakeAdapters::failing(log.clone(), &[(Action::Like, "rate limit")]);
        let h = harness_with(adapters, FakePage::on_video(), log, false);

        let summary = h.executor.execute(&[like_step(), save_step()], 0, None).await;

        let messages: Vec<&str> = summary
            .outcomes
            .iter()
            .map(|o| o.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Step 1 failed: rate limit",
                "Video saved to \"Saved Videos\" playlist!"
            ]
        );
        assert_eq!(summary.message, "Completed 2 steps.");
    }
}
