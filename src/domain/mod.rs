//! Business logic for the task manager. Services here implement "driving ports" (called by the API
//! layer) and communicate with the outside world only through "driven ports" (implemented by the
//! persistence layer, or by in-memory fakes during tests).

pub mod task;
pub mod user;

/// The ID of the user that owns every task created through the client application
pub const DEFAULT_USER_ID: i32 = 1;
