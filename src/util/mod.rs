// Copyright (c) 2024 Mike Tsao

//! System utilities.

/// Commonly used imports.
pub mod prelude {
    pub use super::{CrossbeamChannel, LaggedClock, ManualClock, SystemClock};
}

pub use channels::CrossbeamChannel;
pub use clocks::{LaggedClock, ManualClock, SystemClock};

mod channels;
mod clocks;
