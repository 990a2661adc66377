use crate::calc::client::RemoteError;
use crate::calc::variables::VariableStore;
use crate::calc::wire::{CalculateRequest, CalculateResponse};
use crate::draw::model::Point;
use crate::draw::raster::RasterSurface;
use std::time::{Duration, Instant};

/// One solved expression as it will be shown on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    pub expression: String,
    pub answer: String,
    /// Inline math markup handed to the typesetter.
    pub display: String,
}

impl ResultEntry {
    pub fn new(expression: impl Into<String>, answer: impl Into<String>) -> Self {
        let expression = expression.into();
        let answer = answer.into();
        let display = format!("\\(\\LARGE{{{expression} = {answer}}}\\)");
        Self {
            expression,
            answer,
            display,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledReveal {
    pub due: Instant,
    pub anchor: Point,
    pub entry: ResultEntry,
}

pub fn build_request(
    surface: &RasterSurface,
    variables: &VariableStore,
) -> Result<CalculateRequest, RemoteError> {
    let image = surface
        .to_data_uri()
        .map_err(|err| RemoteError::Encode(format!("{err:#}")))?;
    Ok(CalculateRequest {
        image,
        variables: variables.get_all(),
    })
}

/// Applies every assignment to `variables` before anything is revealed, then
/// schedules entry `i` at `arrived_at + (i + 1) * delay`, all sharing `anchor`.
pub fn apply_response(
    response: CalculateResponse,
    variables: &mut VariableStore,
    anchor: Point,
    arrived_at: Instant,
    delay: Duration,
) -> Vec<ScheduledReveal> {
    for item in response.data.iter().filter(|item| item.assign) {
        variables.set(item.expr.clone(), item.result.clone());
    }

    response
        .data
        .into_iter()
        .enumerate()
        .map(|(index, item)| ScheduledReveal {
            due: arrived_at + delay.saturating_mul(index as u32 + 1),
            anchor,
            entry: ResultEntry::new(item.expr, item.result),
        })
        .collect()
}
