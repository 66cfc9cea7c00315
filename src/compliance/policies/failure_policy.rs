use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// FailurePolicy - what a batch submission does after one item fails
///
/// Neither policy recalls items that were already dispatched: a dispatched
/// unit of work and its Task record stay in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and keep dispatching the remaining items
    #[default]
    Continue,
    /// Dispatch nothing after the first failure
    Stop,
}

impl FailurePolicy {
    /// Whether items may be dispatched concurrently under this policy
    pub fn allows_concurrency(self) -> bool {
        matches!(self, FailurePolicy::Continue)
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Continue => write!(f, "continue"),
            FailurePolicy::Stop => write!(f, "stop"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "continue" => Ok(FailurePolicy::Continue),
            "stop" => Ok(FailurePolicy::Stop),
            _ => Err(format!(
                "Invalid failure policy: {}. Valid values are: continue, stop",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_continue() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::Continue);
        assert!(FailurePolicy::Continue.allows_concurrency());
        assert!(!FailurePolicy::Stop.allows_concurrency());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("STOP".parse::<FailurePolicy>().unwrap(), FailurePolicy::Stop);
        assert!("abort".parse::<FailurePolicy>().is_err());
    }
}
