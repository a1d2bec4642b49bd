//! Request handlers.

pub mod analysis;
pub mod genres;
pub mod health;

pub use analysis::*;
pub use genres::*;
pub use health::*;
