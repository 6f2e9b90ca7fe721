//! Market/forecast feed port trait.

use crate::domain::error::TickpilotError;
use crate::domain::tick::{ForecastVector, PriceTick};

/// Supplies the observed price stream with its aligned forecast vectors.
///
/// Implementations must return ticks in non-decreasing timestamp order and
/// own their retry/backoff policy; the engine never re-fetches. Hosts in this
/// repository process every returned tick in order; nothing is dropped or
/// coalesced under load.
pub trait FeedPort {
    fn ticks(&self) -> Result<Vec<(PriceTick, ForecastVector)>, TickpilotError>;
}
