use crate::probe::ReachabilityResult;
use serde::{Serialize, Serializer};

/// Composite status snapshot served by `/status`.
///
/// Recomputed on every request. `container_status` is absent when the
/// runtime could not be queried at all, in which case `container_error`
/// carries the reason and `health` is left out as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub container_status: Option<String>,
    pub health: Option<String>,
    pub container_error: Option<String>,
    pub minecraft_online: bool,
    pub mc_target: Option<String>,
    pub mc_last_error: Option<String>,
}

#[derive(Serialize)]
struct StatusReportWire<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    container_status: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    health: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    container_error: Option<&'a str>,
    minecraft_online: bool,
    mc_target: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mc_last_error: Option<&'a str>,
}

impl Serialize for StatusReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // health is reported (possibly as null) only when the runtime answered
        let health = match self.container_error {
            Some(_) => None,
            None => Some(self.health.as_deref()),
        };

        StatusReportWire {
            container_status: self.container_status.as_deref(),
            health,
            container_error: self.container_error.as_deref(),
            minecraft_online: self.minecraft_online,
            mc_target: self.mc_target.as_deref(),
            mc_last_error: self.mc_last_error.as_deref(),
        }
        .serialize(serializer)
    }
}

impl StatusReport {
    pub(crate) fn new(container: ContainerFields, reachability: ReachabilityResult) -> Self {
        Self {
            container_status: container.status,
            health: container.health,
            container_error: container.error,
            minecraft_online: reachability.online,
            mc_target: reachability.winning_target,
            mc_last_error: reachability.diagnostic_summary,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ContainerFields {
    pub status: Option<String>,
    pub health: Option<String>,
    pub error: Option<String>,
}
