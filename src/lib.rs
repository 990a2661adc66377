pub mod calc;
pub mod draw;
pub mod logging;
