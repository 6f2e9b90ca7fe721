//! Event sink port trait.

use crate::domain::event::EngineEvent;

/// Receives structured engine events for logging or display. Sinks only see
/// immutable event data; they never hold a reference into live engine state.
pub trait EventPort {
    fn emit(&mut self, event: &EngineEvent);
}
