use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use serde_json::json;
use tracing::{debug, info};

use umbra::cli::{Cli, Command, OutputFormat, get_log_path};
use umbra::config::Config;
use umbra::eclipse::{PHASE_COUNT, PHASES, Phase, Progress, Ticker, Visuals};
use umbra::narrative::{self, NarrativeFetcher, NarrativeTable};
use umbra::showcase::Showcase;
use umbra::tui;

/// Map a level name to a tracing level, warning on stderr for unknown names
fn parse_level(s: &str) -> tracing::Level {
    match s.to_uppercase().as_str() {
        "TRACE" => tracing::Level::TRACE,
        "DEBUG" => tracing::Level::DEBUG,
        "INFO" => tracing::Level::INFO,
        "WARN" | "WARNING" => tracing::Level::WARN,
        "ERROR" => tracing::Level::ERROR,
        _ => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
            tracing::Level::INFO
        }
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = cli_log_level
        .or(config_log_level)
        .map(parse_level)
        .unwrap_or(tracing::Level::INFO);

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    info!(model = %config.llm.model, "Umbra loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None => {
            debug!("main: no command, defaulting to play");
            cmd_play(&config, false, false).await
        }
        Some(Command::Play { paused, offline }) => {
            debug!(paused, offline, "main: matched Play command");
            cmd_play(&config, paused, offline).await
        }
        Some(Command::Inspect { progress, format }) => {
            debug!(progress, %format, "main: matched Inspect command");
            cmd_inspect(&config, progress, format)
        }
        Some(Command::Phases { format }) => {
            debug!(%format, "main: matched Phases command");
            cmd_phases(format)
        }
        Some(Command::Narrate { format }) => {
            debug!(%format, "main: matched Narrate command");
            cmd_narrate(&config, format).await
        }
    }
}

/// Run the full-screen animation
async fn cmd_play(config: &Config, paused: bool, offline: bool) -> Result<()> {
    debug!(paused, offline, "cmd_play: called");
    let mut showcase = Showcase::new(config.driver_settings());
    if paused || config.animation.start_paused {
        showcase.driver_mut().pause();
    }

    if offline {
        info!("Offline, using built-in captions");
    } else {
        match NarrativeFetcher::from_config(config) {
            Ok(fetcher) => showcase.spawn_narrative(fetcher),
            Err(e) => narrative::fetch::report(&e),
        }
    }

    let frame_period = Ticker::period_for_fps(config.animation.fps);
    tui::run(showcase, frame_period, offline).await
}

/// Print phase and visuals for one progress value
fn cmd_inspect(config: &Config, value: f64, format: OutputFormat) -> Result<()> {
    debug!(value, "cmd_inspect: called");
    let progress = Progress::new(value);
    let phase = Phase::from_progress(progress);
    let visuals = Visuals::from_progress(progress);
    let multiplier = config.dilation.multiplier(progress);

    match format {
        OutputFormat::Json => {
            let out = json!({
                "progress": progress,
                "phase": phase,
                "phase_index": phase.index(),
                "multiplier": multiplier,
                "visuals": visuals,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("{} {}", "Progress:".bold(), progress);
            println!("{} {} ({})", "Phase:".bold(), phase.label().yellow(), phase.index() + 1);
            println!("{} ×{:.2}", "Speed:".bold(), multiplier);
            println!();
            println!("  shadow offset   {:+.4}", visuals.shadow_offset);
            println!("  coverage        {:.1}%", visuals.coverage * 100.0);
            println!("  sky light       {:.3}", visuals.sky_light);
            println!("  corona opacity  {:.3}", visuals.corona_opacity);
            println!("  glow intensity  {:.3}", visuals.glow_intensity);
            println!("  blur radius     {:.2}", visuals.blur_radius);
            let mut flags = Vec::new();
            if visuals.is_near {
                flags.push("near".cyan().to_string());
            }
            if visuals.is_totality {
                flags.push("totality".magenta().bold().to_string());
            }
            if !flags.is_empty() {
                println!("  {}", flags.join(" "));
            }
        }
    }
    Ok(())
}

/// List the phases with their progress ranges
fn cmd_phases(format: OutputFormat) -> Result<()> {
    debug!("cmd_phases: called");
    let width = 1.0 / PHASE_COUNT as f64;

    match format {
        OutputFormat::Json => {
            let phases: Vec<_> = PHASES
                .iter()
                .map(|phase| {
                    let start = phase.index() as f64 * width;
                    json!({
                        "index": phase.index(),
                        "key": phase.key(),
                        "label": phase.label(),
                        "start": start,
                        "end": start + width,
                        "jump_target": phase.jump_target(),
                        "caption": narrative::builtin_entry(*phase),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&phases)?);
        }
        OutputFormat::Text => {
            println!("{}", "Eclipse phases".bold());
            for phase in PHASES {
                let start = phase.index() as f64 * width;
                println!(
                    "  {} {:<16} [{:.3}, {:.3})  jump → {}",
                    (phase.index() + 1).to_string().cyan(),
                    phase.label(),
                    start,
                    start + width,
                    phase.jump_target()
                );
                println!("      {}", narrative::builtin_entry(phase).sentence.dimmed());
            }
        }
    }
    Ok(())
}

/// Fetch captions once and print them
async fn cmd_narrate(config: &Config, format: OutputFormat) -> Result<()> {
    debug!("cmd_narrate: called");
    let table = narrative::fetch::load_narrative(config).await;
    print_narrative(&table, format)
}

fn print_narrative(table: &NarrativeTable, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(table)?);
        }
        OutputFormat::Text => {
            println!("{} {}", "Captions:".bold(), table.source().to_string().cyan());
            for (phase, entry) in table.entries() {
                let marker = if table.fallbacks().contains(&phase) {
                    " (built-in)".dimmed().to_string()
                } else {
                    String::new()
                };
                println!();
                println!("{}{}", phase.label().yellow().bold(), marker);
                println!("  {}", entry.sentence);
                println!("  {}", entry.moods().join(" · ").italic());
                println!("  {}", entry.reflection.dimmed());
            }
        }
    }
    Ok(())
}
