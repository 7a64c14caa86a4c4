//! Timegrid layout engine - integration test support.
//!
//! Re-exports the workspace crates so integration tests can use `timegrid_test::` paths.

pub use timegrid_core::{config, constants, store, types};
pub use timegrid_layout::{cache, event, expand, pack, provider};
pub use timegrid_rfc::rfc;

pub mod error {
    pub use timegrid_core::error::CoreError;
    pub use timegrid_layout::error::LayoutError;
    pub use timegrid_rfc::error::RfcError;
}
