use anyhow::{Context, Result};
use asset_tracker::core::Position;
use asset_tracker::geolocation::{GeolocationProvider, MockGeolocation, SimulatedGeolocation};
use asset_tracker::map::{render_page, MapSurface, RecordingMap};
use asset_tracker::tracker::{DriftGenerator, SceneFormatter, TrackerView};
use asset_tracker::utils::ConfigurationManager;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// How long to wait for outstanding locates once stdin closes
const DRAIN_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GeolocationMode {
    /// Answer with a jittered reading near the home location
    Simulated,
    /// Refuse the permission prompt
    Denied,
    /// Host exposes no geolocation capability
    Unavailable,
}

#[derive(Parser, Debug)]
#[command(name = "asset-tracker", version, about = "Simulated IoT asset tracker map")]
struct Cli {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Behaviour of the simulated host geolocation
    #[arg(long, value_enum, default_value_t = GeolocationMode::Simulated)]
    geolocation: GeolocationMode,

    /// Page rewritten after every state change
    #[arg(long, default_value = "tracker.html")]
    output: PathBuf,

    /// Print scenes as JSON on `show`
    #[arg(long)]
    json: bool,

    /// Simulated user latitude (defaults near the device seed)
    #[arg(long, allow_hyphen_values = true)]
    home_lat: Option<f64>,

    /// Simulated user longitude (defaults near the device seed)
    #[arg(long, allow_hyphen_values = true)]
    home_lon: Option<f64>,

    /// Seed for reproducible drift
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Refresh,
    Locate,
    Show,
    Render(Option<PathBuf>),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Result<Command, String>> {
    let mut parts = line.split_whitespace();
    let name = parts.next()?;
    let command = match name {
        "refresh" | "r" => Ok(Command::Refresh),
        "locate" | "l" => Ok(Command::Locate),
        "show" | "s" => Ok(Command::Show),
        "render" => Ok(Command::Render(parts.next().map(PathBuf::from))),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command '{}', try 'help'", other)),
    };
    Some(command)
}

fn print_help() {
    println!("Commands:");
    println!("  refresh        ping the tracker (simulated drift)");
    println!("  locate         show my location");
    println!("  show           print the current scene");
    println!("  render [path]  write the map page");
    println!("  quit           exit");
}

fn write_page<G, M>(view: &TrackerView<G, M>, path: &Path) -> Result<()>
where
    G: GeolocationProvider,
    M: MapSurface,
{
    let page = render_page(&view.render(), view.config().page_reload_secs)?;
    std::fs::write(path, page).with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "page written");
    Ok(())
}

/// Write the page, logging a failure instead of ending the session
fn refresh_page<G, M>(view: &TrackerView<G, M>, path: &Path) -> bool
where
    G: GeolocationProvider,
    M: MapSurface,
{
    match write_page(view, path) {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(path = %path.display(), error = %format!("{:#}", error), "page write failed");
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // logging setup
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut manager = match &cli.config {
        Some(path) => ConfigurationManager::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ConfigurationManager::new(),
    };
    manager.apply_env_overrides()?;
    let config = manager.into_config();

    let home = Position::new(
        cli.home_lat.unwrap_or(config.seed_position.lat + 0.004),
        cli.home_lon.unwrap_or(config.seed_position.lon - 0.003),
    );
    let host: Box<dyn GeolocationProvider> = match cli.geolocation {
        GeolocationMode::Simulated => Box::new(SimulatedGeolocation::new(home)),
        GeolocationMode::Denied => Box::new(SimulatedGeolocation::new(home).denying_permission()),
        GeolocationMode::Unavailable => Box::new(MockGeolocation::unavailable()),
    };

    let map = RecordingMap::new(config.seed_position, config.zoom);
    let drift = match cli.seed {
        Some(seed) => DriftGenerator::seeded(config.drift_half_width_deg, seed),
        None => DriftGenerator::new(config.drift_half_width_deg),
    }
    .with_clamping(config.clamp_to_valid_range);
    let mut view = TrackerView::new(config, host, map)?.with_drift(drift);

    let formatter = if cli.json {
        SceneFormatter::json()
    } else {
        SceneFormatter::text()
    };

    refresh_page(&view, &cli.output);
    println!("{} | map page: {}", view.status().message, cli.output.display());
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match parse_command(&line) {
                    Some(Ok(command)) => command,
                    Some(Err(message)) => {
                        eprintln!("{}", message);
                        continue;
                    }
                    None => continue,
                };

                match command {
                    Command::Refresh => {
                        view.refresh_tracker();
                        let device = view.device_position();
                        println!("{} ({:.5}, {:.5})", view.status().message, device.lat, device.lon);
                        refresh_page(&view, &cli.output);
                    }
                    Command::Locate => {
                        view.locate_user();
                        println!("{}", view.status().message);
                        refresh_page(&view, &cli.output);
                    }
                    Command::Show => println!("{}", formatter.format(&view.render())?),
                    Command::Render(path) => {
                        let path = path.unwrap_or_else(|| cli.output.clone());
                        if refresh_page(&view, &path) {
                            println!("wrote {}", path.display());
                        }
                    }
                    Command::Help => print_help(),
                    Command::Quit => return Ok(()),
                }
            }
            Some(event) = view.next_event() => {
                view.handle_event(event);
                println!("{}", view.status().message);
                refresh_page(&view, &cli.output);
            }
        }
    }

    // stdin closed: let outstanding locates land before exiting
    while view.pending_locates() > 0 {
        match tokio::time::timeout(DRAIN_TIMEOUT, view.process_next()).await {
            Ok(_) => {
                println!("{}", view.status().message);
                refresh_page(&view, &cli.output);
            }
            Err(_) => {
                tracing::warn!(pending = view.pending_locates(), "host did not answer, giving up");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("refresh"), Some(Ok(Command::Refresh)));
        assert_eq!(parse_command("  l "), Some(Ok(Command::Locate)));
        assert_eq!(
            parse_command("render out.html"),
            Some(Ok(Command::Render(Some(PathBuf::from("out.html")))))
        );
        assert_eq!(parse_command("render"), Some(Ok(Command::Render(None))));
        assert_eq!(parse_command(""), None);
        assert!(matches!(parse_command("fly"), Some(Err(_))));
    }

    #[test]
    fn test_failed_page_write_is_not_fatal() {
        let config = ConfigurationManager::new().into_config();
        let map = RecordingMap::new(config.seed_position, config.zoom);
        let view = TrackerView::new(config, MockGeolocation::new(), map).unwrap();

        let missing = std::env::temp_dir()
            .join(format!("tracker_missing_{}", std::process::id()))
            .join("page.html");
        assert!(write_page(&view, &missing).is_err());
        assert!(!refresh_page(&view, &missing));

        let written = std::env::temp_dir().join(format!("tracker_page_{}.html", std::process::id()));
        assert!(refresh_page(&view, &written));
        assert!(std::fs::read_to_string(&written).unwrap().contains("leaflet"));
        let _ = std::fs::remove_file(written);
    }

    #[test]
    fn test_cli_parses_mode() {
        let cli = Cli::parse_from(["asset-tracker", "--geolocation", "denied", "--home-lat", "-33.86"]);
        assert_eq!(cli.geolocation, GeolocationMode::Denied);
        assert_eq!(cli.home_lat, Some(-33.86));
        assert_eq!(cli.output, PathBuf::from("tracker.html"));
    }
}
