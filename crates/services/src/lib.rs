// Copyright (c) 2024 Mike Tsao

//! Services that run in their own threads and talk to a paramflow session
//! over crossbeam channels.

#![deny(missing_docs)]

/// The most commonly used imports.
pub mod prelude {
    pub use super::{BeatService, BeatServiceEvent, BeatServiceInput};
}

pub use beats::{BeatService, BeatServiceEvent, BeatServiceInput};

mod beats;
