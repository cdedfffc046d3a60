//! HTTP API module for the pay-run engine.
//!
//! This module provides the REST endpoints the surrounding application
//! consumes: pay period computation, pay run generation, line edits, status
//! transitions, draft deletion, and rate history maintenance.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AddRateEntryRequest, ComputePayPeriodRequest, CreatePayRunRequest, EditPayRunLineRequest,
    TransitionPayRunRequest,
};
pub use response::{ApiError, CreatePayRunResponse, PayRunDetailResponse};
pub use state::AppState;
