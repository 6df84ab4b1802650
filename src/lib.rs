//! bookrent application library
//!
//! The HTTP modules that expose the rental desk, plus helpers shared between them.

pub mod modules;
pub mod utils;

pub use modules::register_all;
