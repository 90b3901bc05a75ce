use env_logger::Builder;
use log::{LevelFilter, error, info, warn};
use std::path::PathBuf;

use ns3_trace_analyzer::{Figure, FigureData, Pipeline, TraceConfig};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn main() -> anyhow::Result<()> {
    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("ns3_trace_analyzer"), LevelFilter::Debug)
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = if config_path.exists() {
        TraceConfig::load(&config_path)?
    } else {
        warn!("No config file at {}, using default trace locations", config_path.display());
        TraceConfig::default()
    };

    info!("Reading traces from {}", config.trace_dir.display());
    let pipeline = Pipeline::new(config);

    let mut failed = 0;
    for figure in Figure::ALL {
        match pipeline.prepare(figure) {
            Ok(data) => {
                info!("{}: {} series, {} rows", figure.title(), data.series_count(), data.row_count());
                if let FigureData::Series(comparison) = &data {
                    for (tag, table) in comparison.series() {
                        info!("  {}: {} rows", tag, table.len());
                    }
                }
            }
            Err(e) => {
                // Skip this figure only; the others do not depend on it.
                error!("{}: {}", figure.title(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} figures could not be prepared", failed, Figure::ALL.len());
    }
    Ok(())
}
