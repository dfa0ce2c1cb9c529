use std::path::PathBuf;
use std::process::ExitCode;

use exfuz::logging::init_logging;
use exfuz::search::spawn_loader;
use exfuz::{
    CandidateSearch, Candidates, EnvConfig, LoadStatus, ProcessSurface, Screen, ScreenSettings,
};

const USAGE: &str = "usage: exfuz FILE...";

fn main() -> ExitCode {
    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    }

    match run(paths) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("exfuz: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(paths: Vec<PathBuf>) -> exfuz::Result<()> {
    let config = EnvConfig::from_env()?;
    init_logging(&config)?;
    tracing::info!(sources = paths.len(), "starting");

    let status = LoadStatus::new(paths.len());
    let candidates = Candidates::new();
    let loader = spawn_loader(paths, candidates.clone(), status.progress());

    #[allow(unused_mut)]
    let mut surface = ProcessSurface::open_tty()?.with_drain_ms(config.escape_drain_ms);

    #[cfg(unix)]
    let _signals = {
        let restore = surface.capture_mode()?;
        exfuz::platform::install_panic_hook(move || restore.restore());
        exfuz::platform::install_signal_handlers(move |signal| {
            restore.restore();
            std::process::exit(128 + signal);
        })?
    };

    let search = CandidateSearch::new(candidates).with_max_results(config.max_results);
    let mut screen = Screen::new(surface, status, search)
        .with_settings(ScreenSettings::from(&config))
        .with_key_overrides(&config.keys);
    screen.run()?;
    tracing::info!(query = screen.query().text(), "finished");

    // A still-running loader is abandoned with the process.
    if loader.is_finished() {
        if let Ok(lines) = loader.join() {
            tracing::debug!(lines, "loader finished");
        }
    }
    Ok(())
}
