pub mod bounds;
pub mod history;
pub mod input;
pub mod messages;
pub mod model;
pub mod overlay;
pub mod raster;
pub mod render;
pub mod service;
pub mod settings;
pub mod settings_store;
pub mod state;

pub use messages::{CalculateOutcome, EngineEvent, ResetOutcome};
pub use service::SketchEngine;
