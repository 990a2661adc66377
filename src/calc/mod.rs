pub mod client;
pub mod orchestrator;
pub mod typeset;
pub mod variables;
pub mod wire;

pub use client::{HttpSolver, RemoteError, Solver};
pub use orchestrator::{ResultEntry, ScheduledReveal};
pub use variables::VariableStore;
