use thiserror::Error;

use bl_core::CoreError;
use bl_fleet::FleetError;
use bl_route::RouteError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    /// Only raised in [`ReferenceMode::Strict`](crate::ReferenceMode::Strict).
    #[error("{context}: {kind} {id} does not exist")]
    DanglingReference {
        kind:    &'static str,
        id:      u32,
        context: &'static str,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Fleet(#[from] FleetError),
}

pub type SimResult<T> = Result<T, SimError>;
