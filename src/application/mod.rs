// Application layer - Simulation, classification and publishing
pub mod classifier;
pub mod generator;
pub mod publisher;
pub mod render_sink;
pub mod session;
