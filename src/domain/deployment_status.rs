use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeploymentStatus {
    #[default]
    Draft,
    Deployed,
    Paused,
}

impl DeploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::Draft => "DRAFT",
            DeploymentStatus::Deployed => "DEPLOYED",
            DeploymentStatus::Paused => "PAUSED",
        }
    }

    pub fn accepts_chat(&self) -> bool {
        !matches!(self, DeploymentStatus::Paused)
    }
}

impl FromStr for DeploymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(DeploymentStatus::Draft),
            "DEPLOYED" => Ok(DeploymentStatus::Deployed),
            "PAUSED" => Ok(DeploymentStatus::Paused),
            _ => Err(format!("Invalid deployment status: {}", s)),
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
