use crate::calc::client::{RemoteError, Solver};
use crate::calc::orchestrator::{apply_response, build_request, ResultEntry};
use crate::calc::typeset::{NoopTypesetter, Typesetter};
use crate::calc::variables::VariableStore;
use crate::calc::wire::CalculateResponse;
use crate::draw::bounds::detect_ink_bounds;
use crate::draw::history::SnapshotHistory;
use crate::draw::input::{normalize, CanvasRect, PointerEvent, StrokeInput};
use crate::draw::messages::{CalculateOutcome, EngineEvent, ResetOutcome, WorkerMessage};
use crate::draw::model::{Color, Point, StrokeStyle};
use crate::draw::overlay::{OverlayBoard, OverlayId};
use crate::draw::raster::RasterSurface;
use crate::draw::render::draw_segment;
use crate::draw::settings::SketchSettings;
use crate::draw::state::BusyFlags;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Work postponed until the current input turn has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredTask {
    StrokeSnapshot,
    Baseline,
}

#[derive(Debug, Clone, PartialEq)]
struct PendingReveal {
    generation: u64,
    due: Instant,
    anchor: Point,
    entry: ResultEntry,
}

/// Owns the raster, history, variable store and overlays of one sketch
/// session. All mutation happens on the caller's thread; the only background
/// work is the solver call, whose result is picked up by [`SketchEngine::tick`].
pub struct SketchEngine {
    settings: SketchSettings,
    surface: RasterSurface,
    input: StrokeInput,
    style: StrokeStyle,
    history: SnapshotHistory,
    variables: VariableStore,
    overlays: OverlayBoard,
    busy: BusyFlags,
    generation: u64,
    deferred: VecDeque<DeferredTask>,
    reveals: Vec<PendingReveal>,
    reset_settles_at: Option<Instant>,
    last_error: Option<RemoteError>,
    solver: Arc<dyn Solver>,
    typesetter: Box<dyn Typesetter>,
    worker_tx: Sender<WorkerMessage>,
    worker_rx: Receiver<WorkerMessage>,
}

impl SketchEngine {
    pub fn new(settings: SketchSettings, size: (u32, u32), solver: Arc<dyn Solver>) -> Self {
        Self::with_typesetter(settings, size, solver, Box::new(NoopTypesetter))
    }

    pub fn with_typesetter(
        mut settings: SketchSettings,
        size: (u32, u32),
        solver: Arc<dyn Solver>,
        mut typesetter: Box<dyn Typesetter>,
    ) -> Self {
        settings.sanitize();
        if let Err(err) = typesetter.load() {
            tracing::warn!(?err, "typesetter failed to load; results stay as markup");
        }
        let (worker_tx, worker_rx) = mpsc::channel();
        let mut engine = Self {
            style: StrokeStyle {
                width: settings.line_width,
                color: settings.stroke_color,
            },
            overlays: OverlayBoard::new(settings.default_overlay_position),
            surface: RasterSurface::new(size.0, size.1),
            input: StrokeInput::default(),
            history: SnapshotHistory::default(),
            variables: VariableStore::default(),
            busy: BusyFlags::default(),
            generation: 0,
            deferred: VecDeque::new(),
            reveals: Vec::new(),
            reset_settles_at: None,
            last_error: None,
            settings,
            solver,
            typesetter,
            worker_tx,
            worker_rx,
        };
        record_snapshot(&mut engine.history, &engine.surface, "baseline");
        engine
    }

    pub fn settings(&self) -> &SketchSettings {
        &self.settings
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn overlays(&self) -> &OverlayBoard {
        &self.overlays
    }

    pub fn color(&self) -> Color {
        self.style.color
    }

    pub fn is_drawing(&self) -> bool {
        self.input.is_drawing()
    }

    pub fn is_calculating(&self) -> bool {
        self.busy.is_calculating()
    }

    pub fn is_resetting(&self) -> bool {
        self.busy.is_resetting()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Due times of reveals that have not fired yet, in scheduled order.
    pub fn pending_reveals(&self) -> Vec<Instant> {
        self.reveals.iter().map(|reveal| reveal.due).collect()
    }

    /// Returns the last remote failure once; it is not kept afterwards.
    pub fn take_last_error(&mut self) -> Option<RemoteError> {
        self.last_error.take()
    }

    pub fn set_color(&mut self, color: Color) {
        self.style.color = color.opaque();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
        tracing::debug!(width, height, "canvas resized");
    }

    /// Replaces the raster with externally supplied pixels as one completed
    /// stroke, so it can be undone like any drawing.
    pub fn import(&mut self, surface: &RasterSurface) {
        self.input.cancel();
        self.surface.replace_with(surface);
        self.deferred.push_back(DeferredTask::StrokeSnapshot);
    }

    pub fn pointer_down(&mut self, event: &PointerEvent, rect: CanvasRect) {
        let Some(point) = normalize(event, rect, self.surface.size()) else {
            return;
        };
        self.input.begin(point);
    }

    pub fn pointer_move(&mut self, event: &PointerEvent, rect: CanvasRect) {
        if !self.input.is_drawing() {
            return;
        }
        let Some(point) = normalize(event, rect, self.surface.size()) else {
            return;
        };
        if let Some((from, to)) = self.input.extend(point) {
            draw_segment(&mut self.surface, from, to, self.style);
        }
    }

    /// Pointer-up, pointer-leave and touch-end all land here. Only the first
    /// end signal of a stroke schedules a snapshot.
    pub fn pointer_up(&mut self) {
        if self.input.end() {
            tracing::trace!("stroke finished");
            self.deferred.push_back(DeferredTask::StrokeSnapshot);
        }
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Runs postponed snapshots. Each task reads the live history cursor when
    /// it executes.
    pub fn run_deferred(&mut self) {
        while let Some(task) = self.deferred.pop_front() {
            match task {
                DeferredTask::StrokeSnapshot => {
                    record_snapshot(&mut self.history, &self.surface, "stroke");
                }
                DeferredTask::Baseline if self.surface.is_blank() => {
                    record_snapshot(&mut self.history, &self.surface, "baseline");
                }
                DeferredTask::Baseline => {
                    // The baseline is always an empty canvas.
                    let (width, height) = self.surface.size();
                    let blank = RasterSurface::new(width, height);
                    record_snapshot(&mut self.history, &blank, "baseline");
                }
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.surface)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.surface)
    }

    /// Clears canvas, history, variables and overlays and cancels any pending
    /// reveal. A calculation still in flight is not aborted, but its result is
    /// dropped when it arrives.
    pub fn reset(&mut self, now: Instant) -> ResetOutcome {
        if !self.busy.try_begin_reset() {
            tracing::debug!("reset ignored, previous reset still settling");
            return ResetOutcome::AlreadyResetting;
        }

        self.generation = self.generation.wrapping_add(1);
        self.input.cancel();
        self.surface.clear();
        self.history.clear();
        self.variables.clear();
        self.overlays.clear();
        self.reveals.clear();
        self.deferred.clear();
        self.deferred.push_back(DeferredTask::Baseline);
        self.reset_settles_at = Some(now + self.settings.reset_settle());
        if let Err(err) = self.typesetter.typeset(&[]) {
            tracing::debug!(?err, "typesetter refresh after reset failed");
        }
        tracing::info!(generation = self.generation, "canvas reset");
        ResetOutcome::Reset
    }

    /// Sends the current sketch and variables to the solver on a worker
    /// thread. Rejected while another calculation is pending.
    pub fn calculate(&mut self) -> Result<CalculateOutcome, RemoteError> {
        if !self.busy.try_begin_calculation() {
            tracing::debug!("calculation already pending");
            return Ok(CalculateOutcome::Busy);
        }

        let request = match build_request(&self.surface, &self.variables) {
            Ok(request) => request,
            Err(err) => {
                self.busy.finish_calculation();
                tracing::warn!(error = %err, "calculation request not sent");
                return Err(err);
            }
        };

        let generation = self.generation;
        let solver = Arc::clone(&self.solver);
        let tx = self.worker_tx.clone();
        let spawned = std::thread::Builder::new()
            .name("sketch-solver".into())
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| solver.solve(&request)))
                    .unwrap_or_else(|_| {
                        Err(RemoteError::Transport("solver panicked".into()))
                    });
                let _ = tx.send(WorkerMessage::CalculationFinished {
                    generation,
                    outcome,
                });
            });

        if let Err(err) = spawned {
            self.busy.finish_calculation();
            tracing::error!(?err, "could not start solver thread");
            return Err(RemoteError::Transport(err.to_string()));
        }

        tracing::info!(
            generation,
            variables = self.variables.len(),
            "calculation started"
        );
        Ok(CalculateOutcome::Started)
    }

    /// Advances the engine to `now`: runs deferred snapshots, applies any
    /// finished calculation, reveals due overlays and settles a reset.
    pub fn tick(&mut self, now: Instant) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        self.run_deferred();

        loop {
            match self.worker_rx.try_recv() {
                Ok(message) => self.handle_worker_message(message, now, &mut events),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        self.reveal_due(now, &mut events);

        if self.reset_settles_at.is_some_and(|at| now >= at) {
            self.reset_settles_at = None;
            self.busy.finish_reset();
            events.push(EngineEvent::ResetSettled);
        }
        events
    }

    /// Blocks up to `timeout` for the pending calculation and applies it as if
    /// it arrived at that instant. Returns the events of that delivery.
    pub fn wait_for_calculation(&mut self, timeout: Duration) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if !self.busy.is_calculating() {
            return events;
        }
        match self.worker_rx.recv_timeout(timeout) {
            Ok(message) => self.handle_worker_message(message, Instant::now(), &mut events),
            Err(RecvTimeoutError::Timeout) => {
                tracing::debug!(?timeout, "calculation still pending");
            }
            Err(RecvTimeoutError::Disconnected) => {}
        }
        events
    }

    fn handle_worker_message(
        &mut self,
        message: WorkerMessage,
        arrived_at: Instant,
        events: &mut Vec<EngineEvent>,
    ) {
        match message {
            WorkerMessage::CalculationFinished {
                generation,
                outcome,
            } => {
                self.busy.finish_calculation();
                if generation != self.generation {
                    tracing::info!(
                        generation,
                        current = self.generation,
                        "calculation finished after reset, result dropped"
                    );
                    events.push(EngineEvent::StaleResultDropped);
                    return;
                }
                match outcome {
                    Ok(response) => {
                        let entries = self.accept_response(response, arrived_at);
                        events.push(EngineEvent::CalculationCompleted { entries });
                    }
                    Err(error) => {
                        tracing::warn!(error = %error, "calculation failed");
                        self.last_error = Some(error.clone());
                        events.push(EngineEvent::CalculationFailed { error });
                    }
                }
            }
        }
    }

    fn accept_response(&mut self, response: CalculateResponse, arrived_at: Instant) -> usize {
        let anchor = detect_ink_bounds(&self.surface).center();
        self.overlays.set_anchor(anchor);
        let scheduled = apply_response(
            response,
            &mut self.variables,
            anchor,
            arrived_at,
            self.settings.reveal_delay(),
        );
        let count = scheduled.len();
        let generation = self.generation;
        self.reveals
            .extend(scheduled.into_iter().map(|reveal| PendingReveal {
                generation,
                due: reveal.due,
                anchor: reveal.anchor,
                entry: reveal.entry,
            }));
        tracing::info!(
            entries = count,
            x = anchor.x,
            y = anchor.y,
            "calculation completed"
        );
        count
    }

    fn reveal_due(&mut self, now: Instant, events: &mut Vec<EngineEvent>) {
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.reveals)
            .into_iter()
            .partition(|reveal| reveal.due <= now);
        self.reveals = pending;

        let mut revealed = false;
        for reveal in due {
            if reveal.generation != self.generation {
                continue;
            }
            let id = self.overlays.place(reveal.anchor, reveal.entry);
            tracing::debug!(id, "overlay revealed");
            events.push(EngineEvent::OverlayRevealed { id });
            revealed = true;
        }

        if revealed {
            if let Err(err) = self.typesetter.typeset(&self.overlays.markup()) {
                tracing::warn!(?err, "typesetting failed");
            }
        }
    }

    pub fn drag_overlay(&mut self, id: OverlayId, position: Point) -> bool {
        self.overlays.drag(id, position)
    }
}

fn record_snapshot(history: &mut SnapshotHistory, surface: &RasterSurface, reason: &'static str) {
    if let Err(err) = history.snapshot(surface) {
        tracing::warn!(?err, reason, "could not snapshot canvas");
    }
}

impl std::fmt::Debug for SketchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SketchEngine")
            .field("size", &self.surface.size())
            .field("history_len", &self.history.len())
            .field("cursor", &self.history.cursor())
            .field("variables", &self.variables)
            .field("overlays", &self.overlays.len())
            .field("busy", &self.busy)
            .field("generation", &self.generation)
            .finish()
    }
}
