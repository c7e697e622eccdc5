//! Route-table error type.

use thiserror::Error;

use bl_core::{RouteId, StopId};

/// Errors produced by `bl-route` while building a topology.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("stop id {0} appears more than once")]
    DuplicateStop(StopId),

    #[error("route {route} has more than one stop with order {order}")]
    DuplicateOrder { route: RouteId, order: u32 },
}

pub type RouteResult<T> = Result<T, RouteError>;
