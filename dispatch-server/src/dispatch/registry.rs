//! Vehicle → channel registry.
//!
//! Tracks every connected channel and which vehicle, if any, each one
//! speaks for. Dispatch goes to the vehicle's own channel when it has one
//! and to every connected channel otherwise.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::events::{CarId, ChannelId, PositionReport, ServerEvent};

/// Receiving end of a channel's outbound queue.
pub type Outbound = mpsc::UnboundedReceiver<ServerEvent>;

/// Where a dispatched event went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Sent only to the vehicle's registered channel.
    Targeted(ChannelId),
    /// No live registration; sent to every connected channel.
    Broadcast { recipients: usize },
}

#[derive(Debug, Default)]
struct Inner {
    channels: HashMap<ChannelId, mpsc::UnboundedSender<ServerEvent>>,
    cars: HashMap<CarId, ChannelId>,
}

impl Inner {
    fn broadcast(&self, event: &ServerEvent) -> usize {
        for (&channel, sender) in &self.channels {
            send(channel, sender, event.clone());
        }
        self.channels.len()
    }
}

/// Fire-and-forget send. A closed receiver means the connection is going
/// away and its disconnect will clean up.
fn send(channel: ChannelId, sender: &mpsc::UnboundedSender<ServerEvent>, event: ServerEvent) {
    let name = event.name();
    if sender.send(event).is_err() {
        debug!(%channel, event = name, "dropped event for closing channel");
    }
}

/// Concurrent-safe registry of live channels and vehicle registrations.
///
/// One mutex guards the whole map. It is never held across an await, and
/// sends go to unbounded queues, so no operation blocks.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    next_id: AtomicU64,
    inner: Mutex<Inner>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every mutation is a single insert or remove, so a poisoned map is
        // still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a channel for a new connection.
    ///
    /// Returns its id and the queue of events to write to it.
    pub fn connect(&self) -> (ChannelId, Outbound) {
        let channel = ChannelId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().channels.insert(channel, tx);
        (channel, rx)
    }

    /// Bind `car_id` to `channel`, replacing any earlier binding.
    pub fn register(&self, car_id: CarId, channel: ChannelId) {
        let previous = self.lock().cars.insert(car_id.clone(), channel);
        match previous {
            Some(old) if old != channel => {
                info!(car = %car_id, %channel, previous = %old, "car moved to new channel");
            }
            Some(_) => {}
            None => info!(car = %car_id, %channel, "car registered"),
        }
    }

    /// Keep a car's binding current when it reports a position.
    ///
    /// Same effect as [`register`](Self::register).
    pub fn refresh(&self, car_id: CarId, channel: ChannelId) {
        self.register(car_id, channel);
    }

    /// Drop every registration bound to `channel`.
    ///
    /// Returns the cars that were unregistered. The channel itself stays
    /// connected.
    pub fn unregister(&self, channel: ChannelId) -> Vec<CarId> {
        let mut inner = self.lock();
        let removed: Vec<CarId> = inner
            .cars
            .iter()
            .filter(|&(_, &bound)| bound == channel)
            .map(|(car, _)| car.clone())
            .collect();
        for car in &removed {
            inner.cars.remove(car);
        }
        drop(inner);

        for car in &removed {
            info!(car = %car, %channel, "car unregistered");
        }
        removed
    }

    /// Close a channel: unregister its cars and stop delivering to it.
    pub fn disconnect(&self, channel: ChannelId) -> Vec<CarId> {
        let removed = self.unregister(channel);
        self.lock().channels.remove(&channel);
        removed
    }

    /// Send `event` to `car_id`'s channel, or to everyone if the car has no
    /// live channel (or none was named).
    pub fn dispatch(&self, car_id: Option<&CarId>, event: ServerEvent) -> Delivery {
        let inner = self.lock();

        if let Some(car) = car_id {
            if let Some(&channel) = inner.cars.get(car)
                && let Some(sender) = inner.channels.get(&channel)
            {
                send(channel, sender, event);
                return Delivery::Targeted(channel);
            }
            debug!(car = %car, event = event.name(), "no live channel for car, broadcasting");
        }

        Delivery::Broadcast {
            recipients: inner.broadcast(&event),
        }
    }

    /// Relay a position report to every connected channel.
    ///
    /// Returns the number of channels it was sent to.
    pub fn fan_out_position(&self, report: PositionReport) -> usize {
        self.lock()
            .broadcast(&ServerEvent::UpdateMobileMap(report))
    }

    /// The channel currently bound to `car_id`.
    pub fn channel_for(&self, car_id: &CarId) -> Option<ChannelId> {
        self.lock().cars.get(car_id).copied()
    }

    pub fn connected_count(&self) -> usize {
        self.lock().channels.len()
    }

    pub fn registered_count(&self) -> usize {
        self.lock().cars.len()
    }
}
