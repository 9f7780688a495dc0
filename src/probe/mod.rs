mod tcp;
mod types;

pub use tcp::{probe, Prober, TcpProber};
pub use types::{ProbeAttempt, ProbeOutcome, ProbeTarget, ReachabilityResult};
