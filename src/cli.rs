//! Command-line interface for the trail core enumerator.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Profile, RunConfig, DEFAULT_T1, DEFAULT_T3};

#[derive(Parser)]
#[command(name = "troika-trail-cores")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Weight-bounded enumeration of Troika differential trail cores")]
pub struct Cli {
    /// Weight budget for a full 3-round trail core.
    #[arg(long, default_value_t = DEFAULT_T3)]
    pub t3: u32,

    /// Weight budget for the independently-enumerated 2-round half.
    #[arg(long, default_value_t = DEFAULT_T1)]
    pub t1: u32,

    /// Weight multiplier on the reverse (`A`-side) half-cost.
    #[arg(long, default_value_t = 1)]
    pub alpha: u32,

    /// Weight multiplier on the direct (`D`-side) half-cost.
    #[arg(long, default_value_t = 1)]
    pub beta: u32,

    /// Directory trail record files are written to.
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Which orchestration profile(s) to run.
    #[arg(long, default_value = "all")]
    pub profile: Profile,

    /// Increase log verbosity (`-v` debug, `-vv` trace); default is info.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl clap::ValueEnum for Profile {
    fn value_variants<'a>() -> &'a [Self] {
        &[Profile::Kk, Profile::Kn, Profile::Nk, Profile::Nn, Profile::All]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Cli {
    pub fn to_run_config(&self) -> RunConfig {
        RunConfig {
            t3: self.t3,
            t1: self.t1,
            alpha: self.alpha,
            beta: self.beta,
            output_dir: self.output_dir.clone(),
            profile: self.profile,
        }
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

/// The output filename for a given profile and weight budget, e.g.
/// `trails-kk-t3_35-t1_11.txt`. Pure and independent of any filesystem
/// state so it can be unit-tested directly.
pub fn trail_file_name(profile: Profile, t3: u32, t1: u32) -> PathBuf {
    PathBuf::from(format!("trails-{}-t3_{t3}-t1_{t1}.txt", profile.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_file_name_embeds_profile_and_budgets() {
        let name = trail_file_name(Profile::Kn, 35, 11);
        assert_eq!(name, PathBuf::from("trails-kn-t3_35-t1_11.txt"));
    }

    #[test]
    fn trail_file_name_differs_across_profiles() {
        let a = trail_file_name(Profile::Kk, 35, 11);
        let b = trail_file_name(Profile::Nn, 35, 11);
        assert_ne!(a, b);
    }

    #[test]
    fn cli_parses_default_arguments() {
        let cli = Cli::parse_from(["troika-trail-cores"]);
        assert_eq!(cli.t3, DEFAULT_T3);
        assert_eq!(cli.t1, DEFAULT_T1);
        assert_eq!(cli.profile, Profile::All);
    }

    #[test]
    fn cli_parses_explicit_profile_and_budgets() {
        let cli = Cli::parse_from(["troika-trail-cores", "--t3", "20", "--profile", "kk", "-vv"]);
        assert_eq!(cli.t3, 20);
        assert_eq!(cli.profile, Profile::Kk);
        assert_eq!(cli.log_level(), tracing::Level::TRACE);
    }
}
