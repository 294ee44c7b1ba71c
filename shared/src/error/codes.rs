//! Unified error codes for the Misky backend
//!
//! This module defines all error codes used across the server and frontend.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Item errors
//! - 5xxx: Reservation errors
//! - 6xxx: Account errors (profiles, notifications)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Bearer token is malformed or its claims cannot be decoded
    TokenInvalid = 1002,

    // ==================== 2xxx: Permission ====================
    /// Permission denied (caller is not the resource owner)
    PermissionDenied = 2001,
    /// Caller's profile has no recognized role
    RoleUnknown = 2002,

    // ==================== 4xxx: Item ====================
    /// Item not found
    ItemNotFound = 4001,
    /// Item has already been cancelled or completed
    ItemAlreadyClosed = 4002,
    /// Not enough spots available for the requested quantity
    NoSpotsAvailable = 4003,

    // ==================== 5xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 5001,
    /// Reservation has already been cancelled
    ReservationAlreadyCancelled = 5002,
    /// Reservation has already been completed
    ReservationAlreadyCompleted = 5003,
    /// Requested quantity is below the minimum of 1
    QuantityTooSmall = 5004,
    /// Reservation row was written but the item counter update failed
    CounterUpdateFailed = 5005,

    // ==================== 6xxx: Account ====================
    /// Profile not found
    ProfileNotFound = 6001,
    /// Notification not found (absent or not owned by the caller)
    NotificationNotFound = 6101,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Downstream REST API returned an error
    DownstreamError = 9002,
    /// Network error reaching the downstream REST API
    NetworkError = 9003,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleUnknown => "Profile has no recognized role",

            // Item
            ErrorCode::ItemNotFound => "Item not found",
            ErrorCode::ItemAlreadyClosed => "Item has already been cancelled or completed",
            ErrorCode::NoSpotsAvailable => "Not enough spots available",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::ReservationAlreadyCancelled => "Reservation has already been cancelled",
            ErrorCode::ReservationAlreadyCompleted => "Reservation has already been completed",
            ErrorCode::QuantityTooSmall => "Quantity must be at least 1",
            ErrorCode::CounterUpdateFailed => {
                "Reservation created but failed to update item count"
            }

            // Account
            ErrorCode::ProfileNotFound => "Profile not found",
            ErrorCode::NotificationNotFound => "Notification not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DownstreamError => "Downstream service error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleUnknown),

            // Item
            4001 => Ok(ErrorCode::ItemNotFound),
            4002 => Ok(ErrorCode::ItemAlreadyClosed),
            4003 => Ok(ErrorCode::NoSpotsAvailable),

            // Reservation
            5001 => Ok(ErrorCode::ReservationNotFound),
            5002 => Ok(ErrorCode::ReservationAlreadyCancelled),
            5003 => Ok(ErrorCode::ReservationAlreadyCompleted),
            5004 => Ok(ErrorCode::QuantityTooSmall),
            5005 => Ok(ErrorCode::CounterUpdateFailed),

            // Account
            6001 => Ok(ErrorCode::ProfileNotFound),
            6101 => Ok(ErrorCode::NotificationNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DownstreamError),
            9003 => Ok(ErrorCode::NetworkError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.code(), self.message())
    }
}
