//! TubePilot session wiring.
//!
//! The library layer glues the workspace crates into one conversational
//! session: a planner turns the user's text into a plan, the executor runs
//! it against the platform adapters, and the resumption loader re-enters
//! plans suspended by a navigation. The binary in `main.rs` adds argument
//! parsing and a simulated page for driving sessions from a terminal.

pub mod session;
pub mod sim;

pub use session::{AgentSession, SessionOutcome};
pub use sim::{ConsoleNotifier, SimBrowser};
