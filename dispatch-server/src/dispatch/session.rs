//! Per-connection event handling.
//!
//! A channel starts `connected`, becomes bound to a car on `register-car`,
//! stays bound (refreshed) while the car reports positions, and ends on
//! disconnect. A channel may disconnect without ever registering.

use chrono::Utc;
use tracing::debug;

use super::events::{ChannelId, ClientEvent, PositionReport};
use super::registry::ChannelRegistry;

/// Apply one inbound event from `channel` to the registry.
pub fn handle_client_event(registry: &ChannelRegistry, channel: ChannelId, event: ClientEvent) {
    match event {
        ClientEvent::RegisterCar(registration) => {
            if registration.car_id.is_empty() {
                debug!(%channel, "ignoring register-car without a car id");
                return;
            }
            registry.register(registration.car_id, channel);
        }
        ClientEvent::CarPosition(report) => relay_position(registry, channel, report),
    }
}

/// Refresh the reporting car's binding and relay the report to everyone.
///
/// Reports without a timestamp are stamped with the server's clock.
fn relay_position(registry: &ChannelRegistry, channel: ChannelId, mut report: PositionReport) {
    match &report.car_id {
        Some(car) if !car.is_empty() => registry.refresh(car.clone(), channel),
        Some(_) => debug!(%channel, "position without a car id, not refreshing"),
        None => {}
    }
    report
        .ts
        .get_or_insert_with(|| Utc::now().timestamp_millis());

    let recipients = registry.fan_out_position(report);
    debug!(%channel, recipients, "relayed car position");
}
