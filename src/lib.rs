pub mod config;
pub mod engine;
pub mod error;
pub mod net;
pub mod queue;
pub mod sim;
pub mod stats;

pub use config::{EpisodeConfig, PathConfig, ScenarioConfig, TrafficClassConfig};
pub use engine::{run_episode, run_episode_with_clock};
pub use error::{ConfigError, EpisodeError, WorkerFault};
pub use net::RoutingPolicy;
pub use stats::Report;

#[cfg(test)]
mod test;
