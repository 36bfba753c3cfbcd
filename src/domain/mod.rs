// Domain layer - Plain value types, no I/O
pub mod dashboard;
pub mod reading;
pub mod telemetry;
pub mod window;
