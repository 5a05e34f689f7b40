//! Authentication core
//!
//! Password transform, digest, session token generation and the
//! failed-attempt lockout state machine.

pub mod digest;
pub mod lockout;
pub mod token;
pub mod transform;

pub use digest::digest;
pub use lockout::{AttemptState, AttemptTracker, LockoutPolicy};
pub use token::{TokenMode, generate_token};
pub use transform::flip_flop_transform;
