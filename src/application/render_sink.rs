// Rendering sink trait - Whatever draws the dashboard
use crate::domain::dashboard::DashboardFrame;
use crate::error::Result;

/// A drawing surface that receives one full frame per tick.
///
/// The session calls `acquire` then `redraw` exactly once per tick, never
/// concurrently. Failures are absorbed by the caller as a missed update.
pub trait RenderSink: Send {
    /// Make sure a drawing context is available for this tick.
    fn acquire(&mut self) -> Result<()>;

    /// Redraw with the full window and indicators of `frame`.
    fn redraw(&mut self, frame: &DashboardFrame) -> Result<()>;

    /// Release the drawing context. Must be safe to call more than once.
    fn dispose(&mut self);
}
