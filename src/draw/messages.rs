use crate::calc::client::RemoteError;
use crate::calc::wire::CalculateResponse;
use crate::draw::overlay::OverlayId;

/// Sent from the solver thread back to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    CalculationFinished {
        generation: u64,
        outcome: Result<CalculateResponse, RemoteError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculateOutcome {
    Started,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Reset,
    AlreadyResetting,
}

/// What changed during one `tick`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    CalculationCompleted { entries: usize },
    CalculationFailed { error: RemoteError },
    StaleResultDropped,
    OverlayRevealed { id: OverlayId },
    ResetSettled,
}
