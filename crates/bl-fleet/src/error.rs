use thiserror::Error;

use bl_core::{BusId, PassengerId};

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("passenger id {0} appears more than once")]
    DuplicatePassenger(PassengerId),

    #[error("bus id {0} appears more than once")]
    DuplicateBus(BusId),
}

pub type FleetResult<T> = Result<T, FleetError>;
