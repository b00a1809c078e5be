use std::fs::{self, File};
use std::io::BufWriter;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use troika_trail_cores::cli::{trail_file_name, Cli};
use troika_trail_cores::config::Profile;
use troika_trail_cores::orchestrate;
use troika_trail_cores::trail::{save_trail, weight_histogram, TrailCore};
use troika_trail_cores::weight::Weight;

fn install_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_profile(profile: Profile, alpha: u32, beta: u32, t3: Weight) -> Vec<TrailCore> {
    match profile {
        Profile::Kk => orchestrate::kk(alpha, beta, t3),
        Profile::Kn => orchestrate::kn(alpha, beta, t3),
        Profile::Nk => orchestrate::nk(alpha, beta, t3),
        Profile::Nn => orchestrate::nn(alpha, beta, t3),
        Profile::All => {
            let mut out = orchestrate::kk(alpha, beta, t3);
            out.extend(orchestrate::kn(alpha, beta, t3));
            out.extend(orchestrate::nk(alpha, beta, t3));
            out.extend(orchestrate::nn(alpha, beta, t3));
            out
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    install_logging(&cli);

    let config = cli.to_run_config();
    let t3 = Weight::new(config.t3 as i64, 0);

    tracing::info!(profile = %config.profile, t3 = config.t3, t1 = config.t1, "starting trail core enumeration");

    let trails = run_profile(config.profile, config.alpha, config.beta, t3);
    let canonical: Vec<TrailCore> = {
        let mut seen = std::collections::BTreeSet::new();
        let mut out = Vec::new();
        for trail in trails {
            if trail.check().is_err() {
                tracing::warn!("dropping a trail core that failed invariant checking");
                continue;
            }
            let canonical = trail.make_canonical();
            let key: Vec<(u32, u32)> =
                canonical.states.iter().flat_map(|s| s.lanes.iter().map(|l| (l.lane_1, l.lane_2))).collect();
            if seen.insert(key) {
                out.push(canonical);
            }
        }
        out
    };

    tracing::info!(count = canonical.len(), "enumeration complete");

    fs::create_dir_all(&config.output_dir)?;
    let record_path = config.output_dir.join(trail_file_name(config.profile, config.t3, config.t1));
    let mut writer = BufWriter::new(File::create(&record_path)?);
    for trail in &canonical {
        save_trail(&mut writer, trail)?;
    }

    let report_path = record_path.with_extension("txt");
    fs::write(&report_path, weight_histogram(&canonical))?;

    tracing::info!(records = %record_path.display(), report = %report_path.display(), "wrote trail records");
    Ok(())
}
