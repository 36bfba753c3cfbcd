// Presentation layer - HTTP surface for the single dashboard viewer
pub mod app_state;
pub mod handlers;
