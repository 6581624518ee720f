use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How many approvals a request needs before it is granted.
///
/// Eligible responders are the active members of the group other than the
/// requester.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalPolicy {
    /// More than half of the eligible responders.
    #[default]
    Majority,
    /// Every eligible responder.
    Unanimous,
    /// The first approval wins.
    AnyOne,
    /// A fixed count, capped at the number of eligible responders.
    AtLeast(usize),
}

impl ApprovalPolicy {
    pub fn required_approvals(self, eligible: usize) -> usize {
        if eligible == 0 {
            return 0;
        }
        match self {
            ApprovalPolicy::Majority => eligible / 2 + 1,
            ApprovalPolicy::Unanimous => eligible,
            ApprovalPolicy::AnyOne => 1,
            ApprovalPolicy::AtLeast(n) => n.clamp(1, eligible),
        }
    }
}

impl fmt::Display for ApprovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalPolicy::Majority => f.write_str("majority"),
            ApprovalPolicy::Unanimous => f.write_str("unanimous"),
            ApprovalPolicy::AnyOne => f.write_str("any_one"),
            ApprovalPolicy::AtLeast(n) => write!(f, "at_least:{n}"),
        }
    }
}

impl FromStr for ApprovalPolicy {
    type Err = String;

    /// Accepts `majority`, `unanimous`, `any_one` and `at_least:N`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "majority" => Ok(ApprovalPolicy::Majority),
            "unanimous" => Ok(ApprovalPolicy::Unanimous),
            "any_one" => Ok(ApprovalPolicy::AnyOne),
            other => {
                let n = other
                    .strip_prefix("at_least:")
                    .ok_or_else(|| format!("unknown approval policy: {other}"))?;
                let n: usize = n
                    .parse()
                    .map_err(|_| format!("invalid approval count: {n}"))?;
                if n == 0 {
                    return Err("approval count must be at least 1".into());
                }
                Ok(ApprovalPolicy::AtLeast(n))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn majority_of_three_is_two() {
        assert_eq!(ApprovalPolicy::Majority.required_approvals(3), 2);
        assert_eq!(ApprovalPolicy::Majority.required_approvals(4), 3);
        assert_eq!(ApprovalPolicy::Majority.required_approvals(1), 1);
    }

    #[test]
    fn at_least_is_capped_by_eligible() {
        assert_eq!(ApprovalPolicy::AtLeast(5).required_approvals(2), 2);
        assert_eq!(ApprovalPolicy::AtLeast(2).required_approvals(4), 2);
    }

    #[test]
    fn nobody_eligible_needs_nothing() {
        assert_eq!(ApprovalPolicy::Unanimous.required_approvals(0), 0);
    }

    #[test]
    fn parses_from_config_strings() {
        assert_eq!("majority".parse(), Ok(ApprovalPolicy::Majority));
        assert_eq!("any_one".parse(), Ok(ApprovalPolicy::AnyOne));
        assert_eq!("at_least:2".parse(), Ok(ApprovalPolicy::AtLeast(2)));
        assert!("at_least:0".parse::<ApprovalPolicy>().is_err());
        assert!("quorum".parse::<ApprovalPolicy>().is_err());
        assert_eq!(ApprovalPolicy::AtLeast(3).to_string(), "at_least:3");
    }
}
