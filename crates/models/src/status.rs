//! Closed status enums stored as upper-case strings.

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    #[default]
    #[sea_orm(string_value = "AVAILABLE")]
    Available,
    #[sea_orm(string_value = "IN_OPERATION")]
    InOperation,
    #[sea_orm(string_value = "MAINTENANCE")]
    Maintenance,
    #[sea_orm(string_value = "OUT_OF_SERVICE")]
    OutOfService,
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VehicleStatus::Available => "AVAILABLE",
            VehicleStatus::InOperation => "IN_OPERATION",
            VehicleStatus::Maintenance => "MAINTENANCE",
            VehicleStatus::OutOfService => "OUT_OF_SERVICE",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    #[default]
    #[sea_orm(string_value = "PLANNING")]
    Planning,
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl OperationStatus {
    /// PLANNING -> ACTIVE -> COMPLETED, with CANCELLED reachable from
    /// PLANNING or ACTIVE. Staying in the current state is always allowed.
    pub fn can_transition_to(self, next: OperationStatus) -> bool {
        use OperationStatus::*;
        self == next
            || matches!(
                (self, next),
                (Planning, Active) | (Active, Completed) | (Planning, Cancelled) | (Active, Cancelled)
            )
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationStatus::Planning => "PLANNING",
            OperationStatus::Active => "ACTIVE",
            OperationStatus::Completed => "COMPLETED",
            OperationStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

macro_rules! parse_status {
    ($ty:ty, $label:literal) => {
        impl FromStr for $ty {
            type Err = ModelError;

            /// Accepts the stored upper-case value only.
            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                <$ty>::iter()
                    .find(|s| s.to_value() == raw)
                    .ok_or_else(|| ModelError::Validation(format!("unknown {} status '{}'", $label, raw)))
            }
        }
    };
}

parse_status!(VehicleStatus, "vehicle");
parse_status!(OperationStatus, "operation");
