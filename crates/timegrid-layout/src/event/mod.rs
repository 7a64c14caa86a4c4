//! Event records as supplied by the host, and the derived forms the engine passes along.

mod filter;
mod model;

pub use filter::{FilteredEvents, filter_events, is_in_window};
pub use model::{
    AllDayLayout, EventDate, EventInstance, EventItem, EventKind, EventLayout, InternalEvent,
    InternalTiming, PackedAllDayEvent, PackedEvent, Resource,
};
