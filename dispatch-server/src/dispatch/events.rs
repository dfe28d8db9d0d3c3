//! Wire messages exchanged with vehicles and observers.
//!
//! Every WebSocket text frame carries one event as
//! `{"event": "<name>", "data": <payload>}`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::trip::Trip;

/// Fleet identifier of a vehicle (e.g. `"001"`).
///
/// Devices may send the id as a string or an integer; `7` and `"7"` name
/// the same car.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CarId(String);

impl CarId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty id, which never names a car.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for CarId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => CarId(s),
            RawId::Number(n) => CarId(n.to_string()),
        })
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle of one live connection, allocated by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChannelId(pub(crate) u64);

impl ChannelId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chan-{}", self.0)
    }
}

/// Payload of `register-car`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub car_id: CarId,
}

/// Payload of `car-position` and `update-mobile-map`.
///
/// Fields the server does not interpret are kept in `extra` and relayed
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_id: Option<CarId>,
    pub lat: f64,
    pub lng: f64,
    /// Unix milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Events a connected device sends to the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Bind the sending channel to a vehicle.
    RegisterCar(Registration),
    /// A vehicle reports where it is.
    CarPosition(PositionReport),
}

/// Events the server pushes to connected devices.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// A planned trip for a vehicle to drive.
    SubGoals(Trip),
    /// A vehicle moved; sent to every observer.
    UpdateMobileMap(PositionReport),
}

impl ServerEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::SubGoals(_) => "sub-goals",
            ServerEvent::UpdateMobileMap(_) => "update-mobile-map",
        }
    }
}
