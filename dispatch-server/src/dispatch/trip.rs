//! Planned trips.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::Serialize;

use crate::map::{PlaceRef, Pose};

/// Per-process counter keeping ids unique within one second.
static TRIP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Identifier handed back to the requester and sent to the vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TripId(String);

impl TripId {
    /// Generate a fresh id of the form `trip-YYYYMMDDHHMMSS-N`.
    pub fn generate() -> Self {
        let seq = TRIP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("trip-{}-{seq}", Utc::now().format("%Y%m%d%H%M%S")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A planned route for one request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    trip_id: TripId,
    start: PlaceRef,
    destination: PlaceRef,
    poses: Vec<Pose>,
}

impl Trip {
    /// Build a trip with a freshly generated id.
    pub fn new(start: PlaceRef, destination: PlaceRef, poses: Vec<Pose>) -> Self {
        Self {
            trip_id: TripId::generate(),
            start,
            destination,
            poses,
        }
    }

    /// Build a trip with a known id.
    pub fn with_id(
        trip_id: impl Into<String>,
        start: PlaceRef,
        destination: PlaceRef,
        poses: Vec<Pose>,
    ) -> Self {
        Self {
            trip_id: TripId(trip_id.into()),
            start,
            destination,
            poses,
        }
    }

    pub fn trip_id(&self) -> &TripId {
        &self.trip_id
    }

    pub fn start(&self) -> &PlaceRef {
        &self.start
    }

    pub fn destination(&self) -> &PlaceRef {
        &self.destination
    }

    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }
}
