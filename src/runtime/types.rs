use std::fmt;

/// Lifecycle state as reported by the container runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleStatus {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    NotFound,
    Unknown,
    /// Any state string the runtime reports that is not listed above
    Other(String),
}

impl LifecycleStatus {
    pub fn from_runtime(raw: &str) -> Self {
        match raw.trim() {
            "" => Self::Unknown,
            "created" => Self::Created,
            "running" => Self::Running,
            "paused" => Self::Paused,
            "restarting" => Self::Restarting,
            "removing" => Self::Removing,
            "exited" => Self::Exited,
            "dead" => Self::Dead,
            "not_found" => Self::NotFound,
            "unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Restarting => "restarting",
            Self::Removing => "removing",
            Self::Exited => "exited",
            Self::Dead => "dead",
            Self::NotFound => "not_found",
            Self::Unknown => "unknown",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for LifecycleStatus {
    fn from(raw: &str) -> Self {
        Self::from_runtime(raw)
    }
}

/// One network the container is attached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkAttachment {
    pub network: String,
    pub ip_address: Option<String>,
}

impl NetworkAttachment {
    pub fn new<S: Into<String>>(network: S, ip_address: Option<&str>) -> Self {
        Self {
            network: network.into(),
            ip_address: ip_address.map(str::to_string),
        }
    }

    /// Address, if the runtime assigned a non-empty one
    pub fn address(&self) -> Option<&str> {
        self.ip_address.as_deref().filter(|ip| !ip.is_empty())
    }
}

/// Point-in-time view of a container returned by an inspect call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSnapshot {
    pub id: String,
    pub name: String,
    pub status: LifecycleStatus,
    pub health: Option<String>,
    /// Attached networks, in the order the runtime enumerated them
    pub networks: Vec<NetworkAttachment>,
}
