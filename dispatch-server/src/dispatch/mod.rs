//! Delivering trips to vehicles and relaying their positions.
//!
//! The [`ChannelRegistry`] maps each vehicle to its live connection. Trips
//! go to the vehicle's own channel when it is connected and registered,
//! and to every connected channel otherwise. Position reports refresh the
//! registry and are fanned out to all observers.

mod events;
mod registry;
mod session;
mod trip;

pub use events::{CarId, ChannelId, ClientEvent, PositionReport, Registration, ServerEvent};
pub use registry::{ChannelRegistry, Delivery, Outbound};
pub use session::handle_client_event;
pub use trip::{Trip, TripId};
