// Copyright (c) 2024 Mike Tsao

//! Wiring the pieces into a running session.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{Session, SessionConfig, SessionConfigBuilder};
}

pub use session::{Session, SessionConfig, SessionConfigBuilder};

mod session;
