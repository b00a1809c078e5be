//! Run configuration: the serializable knobs that drive an enumeration run,
//! independent of how they were gathered (CLI flags, a saved JSON config, or
//! test code constructing one directly).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which orchestration profile(s) to run (§4.8).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Kk,
    Kn,
    Nk,
    Nn,
    All,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Kk => "kk",
            Profile::Kn => "kn",
            Profile::Nk => "nk",
            Profile::Nn => "nn",
            Profile::All => "all",
        }
    }
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kk" => Ok(Profile::Kk),
            "kn" => Ok(Profile::Kn),
            "nk" => Ok(Profile::Nk),
            "nn" => Ok(Profile::Nn),
            "all" => Ok(Profile::All),
            other => Err(format!("unknown profile: {other}")),
        }
    }
}

/// Default 3-round weight budget, matching the reference parameter set for
/// a full enumeration run.
pub const DEFAULT_T3: u32 = 35;
/// Default 2-round weight budget used when a run also reports intermediate
/// bare/mixed states.
pub const DEFAULT_T1: u32 = 11;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    /// Total weight budget for a 3-round trail core.
    pub t3: u32,
    /// Weight budget for the 2-round half enumerated independently.
    pub t1: u32,
    /// Weight multiplier applied to the `A`-side (reverse) half-cost.
    pub alpha: u32,
    /// Weight multiplier applied to the `D`-side (direct) half-cost.
    pub beta: u32,
    pub output_dir: PathBuf,
    pub profile: Profile,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            t3: DEFAULT_T3,
            t1: DEFAULT_T1,
            alpha: 1,
            beta: 1,
            output_dir: PathBuf::from("."),
            profile: Profile::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_round_trips_through_its_string_form() {
        for p in [Profile::Kk, Profile::Kn, Profile::Nk, Profile::Nn, Profile::All] {
            assert_eq!(p.as_str().parse::<Profile>().unwrap(), p);
        }
    }

    #[test]
    fn default_config_matches_reference_budgets() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.t3, DEFAULT_T3);
        assert_eq!(cfg.t1, DEFAULT_T1);
    }

    #[test]
    fn config_serializes_as_json() {
        let cfg = RunConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.t3, cfg.t3);
        assert_eq!(back.profile, cfg.profile);
    }
}
