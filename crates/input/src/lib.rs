//! Input: pointer events dispatched to registered handlers that produce
//! high-level actions.
//!
//! # Invariants
//! - Hosts consume [`Action`]s, never raw pointer events.
//! - Handlers hold no game state; a registration is undone with its [`HandlerId`].

pub mod action;
pub mod pointer;

pub use action::Action;
pub use pointer::{HandlerId, PointerButton, PointerDispatcher, PointerEvent, move_to_handler};
