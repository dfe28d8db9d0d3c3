//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::dispatch::{CarId, Delivery, TripId};
use crate::map::PlaceRef;

/// Request to plan a trip and send it to a car.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    /// Where the trip starts: a place name or `{lat, lng}`
    pub start: Option<PlaceRef>,

    /// Where the trip ends
    pub destination: Option<PlaceRef>,

    /// Car to send the trip to; all channels get it if absent or unknown
    pub car_id: Option<CarId>,
}

impl TripRequest {
    /// Both endpoints, if present and not blank.
    pub fn endpoints(&self) -> Option<(&PlaceRef, &PlaceRef)> {
        let start = self.start.as_ref().filter(|p| !p.is_blank())?;
        let destination = self.destination.as_ref().filter(|p| !p.is_blank())?;
        Some((start, destination))
    }
}

/// Response for an accepted trip.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    /// Human-readable status
    pub message: String,

    /// Generated trip id
    pub trip_id: TripId,

    /// How the trip was delivered
    pub delivery: DeliveryResult,
}

/// How a trip was delivered.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum DeliveryResult {
    /// Sent to the car's own channel
    Targeted { channel: u64 },
    /// Sent to every connected channel
    Broadcast { recipients: usize },
}

impl From<Delivery> for DeliveryResult {
    fn from(delivery: Delivery) -> Self {
        match delivery {
            Delivery::Targeted(channel) => DeliveryResult::Targeted {
                channel: channel.get(),
            },
            Delivery::Broadcast { recipients } => DeliveryResult::Broadcast { recipients },
        }
    }
}

/// Summary of the loaded map and live connections.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSummary {
    pub nodes: usize,
    pub edges: usize,
    pub places: usize,
    pub heuristic: String,
    pub connected_channels: usize,
    pub registered_cars: usize,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Pose;
    use serde_json::json;

    #[test]
    fn parse_full_request() {
        let req: TripRequest = serde_json::from_value(json!({
            "start": "gate",
            "destination": {"lat": 1.0, "lng": 2.0},
            "carId": "001"
        }))
        .unwrap();

        assert_eq!(
            req.endpoints(),
            Some((
                &PlaceRef::place("gate"),
                &PlaceRef::Coordinate(Pose::new(1.0, 2.0))
            ))
        );
        assert_eq!(req.car_id, Some(CarId::new("001")));
    }

    #[test]
    fn missing_or_blank_endpoints() {
        let req: TripRequest = serde_json::from_value(json!({"start": "gate"})).unwrap();
        assert!(req.endpoints().is_none());

        let req: TripRequest =
            serde_json::from_value(json!({"start": "", "destination": "lab"})).unwrap();
        assert!(req.endpoints().is_none());
    }

    #[test]
    fn delivery_serialization() {
        assert_eq!(
            serde_json::to_value(DeliveryResult::Targeted { channel: 3 }).unwrap(),
            json!({"mode": "targeted", "channel": 3})
        );
        assert_eq!(
            serde_json::to_value(DeliveryResult::Broadcast { recipients: 2 }).unwrap(),
            json!({"mode": "broadcast", "recipients": 2})
        );
    }
}
