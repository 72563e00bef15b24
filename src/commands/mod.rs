pub mod compute_envs;
pub mod launch;
pub mod pipelines;

pub use compute_envs::{ComputeEnvsArgs, ComputeEnvsCommand};
pub use launch::{LaunchArgs, LaunchCommand};
pub use pipelines::{PipelinesArgs, PipelinesCommand};
