//! Route dispatch server.
//!
//! Plans a route across a road-network graph with A* and delivers it to a
//! vehicle over a persistent WebSocket channel, while relaying vehicle
//! positions to every connected observer.

pub mod config;
pub mod dispatch;
pub mod map;
pub mod planner;
pub mod web;
