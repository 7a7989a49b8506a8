//! Clients for the protected backend API.

mod dashboard;

pub use dashboard::{ApiError, DashboardApi, DashboardMeta, DashboardResponse};
