// Stream rendering surface - One attached viewer receives every frame
use crate::application::render_sink::RenderSink;
use crate::domain::dashboard::{DashboardFrame, DashboardSkeleton, StreamMessage};
use crate::error::{DashboardError, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

struct Viewer {
    id: u64,
    tx: mpsc::Sender<StreamMessage>,
}

#[derive(Default)]
struct SlotState {
    viewer: Option<Viewer>,
    created: u64,
    disposed: u64,
}

impl SlotState {
    fn release(&mut self) {
        if let Some(viewer) = self.viewer.take() {
            self.disposed += 1;
            tracing::debug!(viewer = viewer.id, "Released rendering context");
        }
    }
}

/// Holds at most one live viewer context. Shared between the HTTP layer,
/// which attaches viewers, and the session's sink, which draws into them.
#[derive(Clone, Default)]
pub struct SurfaceSlot {
    inner: Arc<Mutex<SlotState>>,
}

impl SurfaceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        // The state stays consistent even if a holder panicked.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create a new viewer context, disposing any live one first. The
    /// skeleton is queued as the first message.
    pub fn attach(&self, skeleton: DashboardSkeleton, buffer: usize) -> mpsc::Receiver<StreamMessage> {
        let mut state = self.lock();
        state.release();

        state.created += 1;
        let id = state.created;

        // Fresh channel with room for at least one message
        let (tx, rx) = mpsc::channel(buffer.max(1));
        if let Err(e) = tx.try_send(StreamMessage::Skeleton(skeleton)) {
            tracing::warn!(viewer = id, "Skeleton not queued for viewer: {}", e);
        }
        state.viewer = Some(Viewer { id, tx });
        tracing::info!(viewer = id, "Viewer attached to dashboard");

        rx
    }

    /// Drop the live viewer context, if any.
    pub fn detach(&self) {
        self.lock().release();
    }

    /// Number of contexts created and not yet disposed (0 or 1).
    pub fn live_contexts(&self) -> u64 {
        let state = self.lock();
        state.created - state.disposed
    }
}

/// `RenderSink` backed by a `SurfaceSlot`.
pub struct StreamSurface {
    slot: SurfaceSlot,
}

impl StreamSurface {
    pub fn new(slot: SurfaceSlot) -> Self {
        Self { slot }
    }
}

impl RenderSink for StreamSurface {
    fn acquire(&mut self) -> Result<()> {
        let mut state = self.slot.lock();
        let closed = match &state.viewer {
            Some(viewer) => viewer.tx.is_closed(),
            None => return Err(DashboardError::SurfaceUnavailable("no viewer attached")),
        };
        if closed {
            state.release();
            return Err(DashboardError::SurfaceUnavailable("viewer disconnected"));
        }
        Ok(())
    }

    fn redraw(&mut self, frame: &DashboardFrame) -> Result<()> {
        let mut state = self.slot.lock();
        let sent = match &state.viewer {
            Some(viewer) => viewer.tx.try_send(StreamMessage::Frame(frame.clone())),
            None => return Err(DashboardError::SurfaceUnavailable("no viewer attached")),
        };

        match sent {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DashboardError::SurfaceBusy(frame.version)),
            Err(TrySendError::Closed(_)) => {
                state.release();
                Err(DashboardError::SurfaceUnavailable("viewer disconnected"))
            }
        }
    }

    fn dispose(&mut self) {
        self.slot.detach();
    }
}

impl Drop for StreamSurface {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::classifier::Classifier;
    use crate::application::publisher::Publisher;
    use crate::domain::reading::Reading;
    use crate::domain::telemetry::LabelStyle;
    use crate::domain::window::RollingWindow;
    use chrono::Utc;

    fn publisher() -> Publisher {
        Publisher::linked("Test".to_string(), LabelStyle::Relative, Classifier::default())
    }

    fn frame() -> DashboardFrame {
        let mut window = RollingWindow::new(4, Utc::now()).unwrap();
        let reading = Reading::new(Utc::now(), 20.0, 30.0);
        window.append(reading);
        publisher().compose(&window, &reading, Utc::now())
    }

    #[test]
    fn test_acquire_without_viewer_is_unavailable() {
        let mut surface = StreamSurface::new(SurfaceSlot::new());
        assert!(matches!(
            surface.acquire(),
            Err(DashboardError::SurfaceUnavailable(_))
        ));
    }

    #[test]
    fn test_viewer_gets_skeleton_then_frames() {
        let slot = SurfaceSlot::new();
        let mut surface = StreamSurface::new(slot.clone());
        let mut rx = slot.attach(publisher().skeleton(1000, 4), 4);

        surface.acquire().unwrap();
        surface.redraw(&frame()).unwrap();

        assert!(matches!(rx.try_recv(), Ok(StreamMessage::Skeleton(_))));
        match rx.try_recv() {
            Ok(StreamMessage::Frame(f)) => assert_eq!(f.version, 1),
            other => panic!("expected frame, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_buffer_still_queues_skeleton() {
        let slot = SurfaceSlot::new();
        let mut rx = slot.attach(publisher().skeleton(1000, 4), 0);
        match rx.try_recv() {
            Ok(StreamMessage::Skeleton(skeleton)) => assert_eq!(skeleton.capacity, 4),
            other => panic!("expected skeleton, got {:?}", other),
        }
        assert_eq!(slot.live_contexts(), 1);
    }

    #[test]
    fn test_second_attach_disposes_first_context() {
        let slot = SurfaceSlot::new();
        let mut first = slot.attach(publisher().skeleton(1000, 4), 4);
        let mut second = slot.attach(publisher().skeleton(1000, 4), 4);
        assert_eq!(slot.live_contexts(), 1);

        let mut surface = StreamSurface::new(slot.clone());
        surface.acquire().unwrap();
        surface.redraw(&frame()).unwrap();

        // first viewer: skeleton, then closed
        assert!(matches!(first.try_recv(), Ok(StreamMessage::Skeleton(_))));
        assert!(matches!(
            first.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
        assert!(matches!(second.try_recv(), Ok(StreamMessage::Skeleton(_))));
        assert!(matches!(second.try_recv(), Ok(StreamMessage::Frame(_))));
    }

    #[test]
    fn test_disconnected_viewer_is_released() {
        let slot = SurfaceSlot::new();
        let rx = slot.attach(publisher().skeleton(1000, 4), 4);
        drop(rx);

        let mut surface = StreamSurface::new(slot.clone());
        assert!(surface.acquire().is_err());
        assert_eq!(slot.live_contexts(), 0);

        // a new viewer makes the next tick succeed
        let _rx = slot.attach(publisher().skeleton(1000, 4), 4);
        assert!(surface.acquire().is_ok());
    }

    #[test]
    fn test_full_buffer_drops_frame() {
        let slot = SurfaceSlot::new();
        // buffer of one is taken by the skeleton
        let _rx = slot.attach(publisher().skeleton(1000, 4), 1);
        let mut surface = StreamSurface::new(slot.clone());

        surface.acquire().unwrap();
        assert!(matches!(
            surface.redraw(&frame()),
            Err(DashboardError::SurfaceBusy(1))
        ));
        assert_eq!(slot.live_contexts(), 1);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let slot = SurfaceSlot::new();
        let _rx = slot.attach(publisher().skeleton(1000, 4), 4);
        let mut surface = StreamSurface::new(slot.clone());

        surface.dispose();
        surface.dispose();
        drop(surface);
        slot.detach();
        assert_eq!(slot.live_contexts(), 0);
    }
}
