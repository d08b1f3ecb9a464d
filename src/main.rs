use std::fs::File;
use std::io::Write;
use std::process::ExitCode;

use log::{error, info};
use pathfinding_visualizer::config::VisualizerConfig;
use pathfinding_visualizer::visualizer::terminal::TerminalFrontend;
use pathfinding_visualizer::visualizer::Visualizer;
use pathfinding_visualizer::{PathingGrid, VisualizerError};

fn init_logging(config: &VisualizerConfig) -> Result<(), VisualizerError> {
    let env = env_logger::Env::default().default_filter_or(config.log_level.as_str());
    let mut builder = env_logger::Builder::from_env(env);
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{} {}] {}",
            record.level(),
            record.target(),
            record.args()
        )
    });
    if let Some(path) = &config.log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn run(config: VisualizerConfig) -> Result<(), VisualizerError> {
    info!(
        "Starting with a {0}x{0} grid at {1} steps per second",
        config.rows, config.steps_per_second
    );
    let grid = PathingGrid::new(config.rows)?;
    let frontend = TerminalFrontend::open(config.rows)?;
    Visualizer::new(frontend, grid, config).run()
}

fn main() -> ExitCode {
    let config = match VisualizerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("pathfinding-visualizer: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logging(&config) {
        eprintln!("pathfinding-visualizer: cannot open log file: {e}");
        return ExitCode::FAILURE;
    }
    // The terminal is restored when `run` returns, so errors are printed after it.
    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("pathfinding-visualizer: {e}");
            ExitCode::FAILURE
        }
    }
}
