// Application state for HTTP handlers
use crate::domain::dashboard::DashboardSkeleton;
use crate::infrastructure::stream_surface::SurfaceSlot;

#[derive(Clone)]
pub struct AppState {
    pub skeleton: DashboardSkeleton,
    pub surface: SurfaceSlot,
    pub viewer_buffer: usize,
}
