//! API Routes
//!
//! Route handlers organized by functionality.

pub mod aggregate;
pub mod chart;
pub mod data;
pub mod health;
pub mod metrics;
