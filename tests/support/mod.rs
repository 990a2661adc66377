#![allow(dead_code)]

use sketch_calc::calc::wire::{CalculateRequest, CalculateResponse, ResponseItem};
use sketch_calc::calc::{RemoteError, Solver};
use sketch_calc::draw::input::{CanvasRect, PointerEvent};
use sketch_calc::draw::settings::SketchSettings;
use sketch_calc::draw::SketchEngine;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

pub const SIZE: (u32, u32) = (100, 100);

pub fn full_rect() -> CanvasRect {
    CanvasRect::new(0.0, 0.0, SIZE.0 as f64, SIZE.1 as f64)
}

pub fn item(expr: &str, result: &str, assign: bool) -> ResponseItem {
    ResponseItem {
        expr: expr.into(),
        result: result.into(),
        assign,
    }
}

pub fn response(items: Vec<ResponseItem>) -> CalculateResponse {
    CalculateResponse { data: items }
}

/// Answers every request with the same response and remembers what it saw.
pub struct RecordingSolver {
    response: CalculateResponse,
    pub requests: Mutex<Vec<CalculateRequest>>,
}

impl RecordingSolver {
    pub fn new(response: CalculateResponse) -> Arc<Self> {
        Arc::new(Self {
            response,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<CalculateRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Solver for RecordingSolver {
    fn solve(&self, request: &CalculateRequest) -> Result<CalculateResponse, RemoteError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        Ok(self.response.clone())
    }
}

pub struct FailingSolver(pub RemoteError);

impl Solver for FailingSolver {
    fn solve(&self, _request: &CalculateRequest) -> Result<CalculateResponse, RemoteError> {
        Err(self.0.clone())
    }
}

/// Holds each request until the test releases it through the returned sender.
pub struct GatedSolver {
    gate: Mutex<Receiver<()>>,
    response: CalculateResponse,
    pub calls: AtomicUsize,
}

impl GatedSolver {
    pub fn new(response: CalculateResponse) -> (Arc<Self>, Sender<()>) {
        let (tx, rx) = mpsc::channel();
        let solver = Arc::new(Self {
            gate: Mutex::new(rx),
            response,
            calls: AtomicUsize::new(0),
        });
        (solver, tx)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Solver for GatedSolver {
    fn solve(&self, _request: &CalculateRequest) -> Result<CalculateResponse, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let released = self.gate.lock().expect("gate lock").recv();
        if released.is_err() {
            return Err(RemoteError::Transport("gate dropped".into()));
        }
        Ok(self.response.clone())
    }
}

pub fn engine_with(solver: Arc<dyn Solver>) -> SketchEngine {
    SketchEngine::new(SketchSettings::default(), SIZE, solver)
}

pub fn idle_engine() -> SketchEngine {
    engine_with(RecordingSolver::new(response(vec![])))
}

/// Draws a straight stroke and finishes the input turn.
pub fn draw_stroke(engine: &mut SketchEngine, from: (f64, f64), to: (f64, f64)) {
    engine.pointer_down(&PointerEvent::mouse(from.0, from.1), full_rect());
    engine.pointer_move(&PointerEvent::mouse(to.0, to.1), full_rect());
    engine.pointer_up();
    engine.run_deferred();
}
