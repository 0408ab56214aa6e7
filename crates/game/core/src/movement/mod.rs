//! Movement vocabulary and per-actor movement data.
//!
//! - [`Direction`] and [`Presentation`] name where an actor goes and how it looks
//! - [`MovementState`] is the per-actor state machine data
//! - [`InputBuffer`] remembers recent presses for a short window
//! - [`events`] holds the notifications the executor emits
mod buffer;
mod direction;
pub mod events;
mod state;
mod status;

pub use buffer::{BufferRejection, BufferedInput, InputBuffer};
pub use direction::{Direction, Presentation};
pub use events::{
    BlockReason, MovementBlocked, MovementCompleted, MovementEvent, MovementListener,
    MovementStarted,
};
pub use state::{MovementState, PendingIntent, Transition};
pub use status::MovementStatus;
