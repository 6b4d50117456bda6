//! Terminal stand-ins for the page and the notification surface.
//!
//! A real deployment drives an actual browser page; the CLI simulates one
//! so the full plan/checkpoint/resume cycle can run in a single process.
//! A `goto` here is just a location change, but the executor still treats
//! it as a navigation boundary and suspends through the checkpoint slot.

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use tubepilot_action_adapters::{AdapterError, Navigator, Notifier, PageProbe};
use tubepilot_core_types::NotificationKind;

struct SimState {
    url: String,
    loaded: bool,
}

/// Simulated page: a URL and a loaded flag.
pub struct SimBrowser {
    state: Mutex<SimState>,
}

impl SimBrowser {
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(SimState {
                url: start_url.into(),
                loaded: true,
            }),
        }
    }
}

impl Default for SimBrowser {
    fn default() -> Self {
        Self::new("https://www.youtube.com/")
    }
}

#[async_trait]
impl PageProbe for SimBrowser {
    async fn current_url(&self) -> String {
        self.state.lock().url.clone()
    }

    async fn is_loaded(&self) -> bool {
        self.state.lock().loaded
    }
}

#[async_trait]
impl Navigator for SimBrowser {
    async fn goto(&self, url: &str) -> Result<(), AdapterError> {
        debug!(url, "simulated navigation");
        let mut state = self.state.lock();
        state.url = url.to_string();
        state.loaded = true;
        Ok(())
    }
}

/// Notification sink that prints to the terminal.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, kind: NotificationKind, text: &str) {
        println!("[{kind}] {text}");
    }
}
