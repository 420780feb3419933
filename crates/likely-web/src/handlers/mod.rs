//! HTTP handlers for all routes.

pub mod baseline;
pub mod score;
pub mod submissions;
pub mod system;
