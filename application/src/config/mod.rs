//! Application-level configuration.
//!
//! - [`SessionParams`]: conversation view behavior (reroll placement)

pub mod session_params;

pub use session_params::SessionParams;
