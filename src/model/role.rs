use serde::Serialize;
use strum_macros::Display;
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Display, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Warehouse session: registers movements and reads the day board.
    Operator = 1,
    /// Roster changes, metrics, export and clearing records.
    Admin = 2,
}

impl Role {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Operator),
            2 => Some(Role::Admin),
            _ => None,
        }
    }
}
