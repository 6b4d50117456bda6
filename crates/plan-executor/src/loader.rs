//! Checkpoint detection and replay on page activation.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{info, warn};

use tubepilot_action_adapters::Notifier;
use tubepilot_checkpoint_store::CheckpointStore;
use tubepilot_core_types::{NotificationKind, Priority};

use crate::config::ExecutorConfig;
use crate::executor::{PlanExecutor, PlanSummary};

/// Re-enters a suspended plan after the navigation that suspended it.
///
/// Must run once per page activation, before any user interaction. The slot
/// is cleared unconditionally after a single resumption attempt, success or
/// failure, so a buggy reload cycle can never replay the same checkpoint
/// forever.
pub struct ResumptionLoader {
    executor: Arc<PlanExecutor>,
    checkpoints: CheckpointStore,
    notifier: Arc<dyn Notifier>,
    config: ExecutorConfig,
}

impl ResumptionLoader {
    pub fn new(
        executor: Arc<PlanExecutor>,
        checkpoints: CheckpointStore,
        notifier: Arc<dyn Notifier>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            executor,
            checkpoints,
            notifier,
            config,
        }
    }

    /// Replays the pending checkpoint, if any.
    ///
    /// Returns `None` on the common no-op path (no checkpoint, or a stale
    /// one that only gets discarded).
    pub async fn resume_pending(&self) -> Option<PlanSummary> {
        let checkpoint = match self.checkpoints.load().await {
            Ok(Some(checkpoint)) => checkpoint,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "failed to read checkpoint slot; skipping resume");
                return None;
            }
        };

        if !checkpoint.is_resumable() {
            warn!(
                next_index = checkpoint.next_index,
                steps = checkpoint.steps.len(),
                "discarding stale checkpoint"
            );
            self.clear_slot().await;
            return None;
        }

        // Let the freshly loaded page settle before touching it. This is
        // independent of (and in addition to) the executor's own
        // video-ready poll on the first priority transition.
        sleep(self.config.resume_delay).await;

        info!(next_index = checkpoint.next_index, "resuming suspended plan");
        self.notifier
            .notify(NotificationKind::System, "Resuming multi-step command...")
            .await;

        let summary = self
            .executor
            .execute(
                &checkpoint.steps,
                checkpoint.next_index,
                Some(Priority::Navigation),
            )
            .await;

        // One resumption attempt per checkpoint, no matter how it went.
        self.clear_slot().await;

        if !summary.navigation_pending {
            self.notifier
                .notify(NotificationKind::Agent, &summary.message)
                .await;
        }

        Some(summary)
    }

    async fn clear_slot(&self) {
        if let Err(err) = self.checkpoints.clear().await {
            warn!(error = %err, "failed to clear checkpoint slot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tubepilot_action_adapters::{ActionAdapters, AdapterError, PageProbe};
    use tubepilot_checkpoint_store::MemoryStore;
    use tubepilot_core_types::{
        watch_url, Action, Checkpoint, PlanStep, StepParameters,
    };

    struct VideoPage;

    #[async_trait]
    impl PageProbe for VideoPage {
        async fn current_url(&self) -> String {
            watch_url("abc123")
        }

        async fn is_loaded(&self) -> bool {
            true
        }
    }

    #[derive(Default)]
    struct CollectingNotifier {
        messages: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for CollectingNotifier {
        async fn notify(&self, _kind: tubepilot_core_types::NotificationKind, text: &str) {
            self.messages.lock().push(text.to_string());
        }
    }

    /// Adapters where only `like` succeeds and everything else errors.
    struct LikeOnlyAdapters {
        calls: Mutex<Vec<Action>>,
        like_fails: bool,
    }

    impl LikeOnlyAdapters {
        fn record(&self, action: Action) {
            self.calls.lock().push(action);
        }
    }

    #[async_trait]
    impl ActionAdapters for LikeOnlyAdapters {
        async fn search(&self, _p: &StepParameters) -> Result<String, AdapterError> {
            self.record(Action::Search);
            Err(AdapterError::api("unexpected search"))
        }

        async fn play(&self, _p: &StepParameters) -> Result<String, AdapterError> {
            self.record(Action::Play);
            Err(AdapterError::api("unexpected play"))
        }

        async fn like(&self, _p: &StepParameters) -> Result<String, AdapterError> {
            self.record(Action::Like);
            if self.like_fails {
                Err(AdapterError::api("backend down"))
            } else {
                Ok("Video liked successfully!".to_string())
            }
        }

        async fn dislike(&self, _p: &StepParameters) -> Result<String, AdapterError> {
            self.record(Action::Dislike);
            Err(AdapterError::api("unexpected dislike"))
        }

        async fn save(&self, _p: &StepParameters) -> Result<String, AdapterError> {
            self.record(Action::Save);
            Err(AdapterError::api("unexpected save"))
        }

        async fn comment(&self, _p: &StepParameters) -> Result<String, AdapterError> {
            self.record(Action::Comment);
            Err(AdapterError::api("unexpected comment"))
        }

        async fn subscribe(&self, _p: &StepParameters) -> Result<String, AdapterError> {
            self.record(Action::Subscribe);
            Err(AdapterError::api("unexpected subscribe"))
        }
    }

    fn loader_with(
        like_fails: bool,
    ) -> (ResumptionLoader, CheckpointStore, Arc<LikeOnlyAdapters>, Arc<CollectingNotifier>) {
        let checkpoints = CheckpointStore::new(Arc::new(MemoryStore::new()));
        let adapters = Arc::new(LikeOnlyAdapters {
            calls: Mutex::new(Vec::new()),
            like_fails,
        });
        let notifier = Arc::new(CollectingNotifier::default());
        let executor = Arc::new(PlanExecutor::new(
            adapters.clone(),
            checkpoints.clone(),
            Arc::new(VideoPage),
            notifier.clone(),
            ExecutorConfig::default(),
        ));
        let loader = ResumptionLoader::new(
            executor,
            checkpoints.clone(),
            notifier.clone(),
            ExecutorConfig::default(),
        );
        (loader, checkpoints, adapters, notifier)
    }

    fn play_like_steps() -> Vec<PlanStep> {
        vec![
            PlanStep::new(Action::Play, Priority::Navigation)
                .with_parameters(StepParameters::with_query("Despacito")),
            PlanStep::new(Action::Like, Priority::Interaction),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn empty_slot_is_a_no_op() {
        let (loader, _checkpoints, adapters, notifier) = loader_with(false);

        assert!(loader.resume_pending().await.is_none());
        assert!(adapters.calls.lock().is_empty());
        assert!(notifier.messages.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn resumes_from_stored_index_and_clears() {
        let (loader, checkpoints, adapters, _notifier) = loader_with(false);
        checkpoints
            .save(&Checkpoint::new(play_like_steps(), 1))
            .await
            .unwrap();

        let summary = loader.resume_pending().await.expect("resumed");

        // Only the like step ran; the play step was never re-executed.
        assert_eq!(adapters.calls.lock().as_slice(), &[Action::Like]);
        assert_eq!(summary.outcomes.len(), 1);
        assert!(checkpoints.load().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn clears_slot_even_when_resumed_step_fails() {
        let (loader, checkpoints, _adapters, _notifier) = loader_with(true);
        checkpoints
            .save(&Checkpoint::new(play_like_steps(), 1))
            .await
            .unwrap();

        let summary = loader.resume_pending().await.expect("resumed");

        assert!(summary.outcomes[0].failed);
        assert!(checkpoints.load().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_index_is_discarded_without_executing() {
        let (loader, checkpoints, adapters, notifier) = loader_with(false);
        checkpoints
            .save(&Checkpoint::new(play_like_steps(), 9))
            .await
            .unwrap();

        assert!(loader.resume_pending().await.is_none());
        assert!(adapters.calls.lock().is_empty());
        assert!(checkpoints.load().await.unwrap().is_none());
        // Not even the "resuming" notice fires for a stale slot.
        assert!(notifier.messages.lock().is_empty());
    }
}
