//! Meta Marketing (Graph) API integration — remote ads client, objective
//! mapping, and the four-step launch sequencer.

pub mod graph;
pub mod launch;
pub mod objective;

pub use graph::{AdSetParams, AdsApi, CreativeParams, GraphClient};
pub use launch::LaunchSequencer;
pub use objective::{delivery_spec, map_to_outcome_objective, DeliverySpec};
