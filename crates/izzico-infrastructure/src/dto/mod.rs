//! Versioned DTOs for persisted data.

pub mod session_state;

pub use session_state::{
    SESSION_STATE_V1_0_VERSION, SESSION_STATE_V1_1_VERSION, SessionStateDTO, SessionStateV1_0,
    SessionStateV1_1,
};
