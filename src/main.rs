// Copyright (c) 2026 rezky_nightky

mod bolt;
mod cell;
mod config;
mod display;
mod error;
mod frame;
mod glyphs;
mod logging;
mod palette;
mod rain;
mod runtime;
mod sim;
mod storm;
mod terminal;

use std::env;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{color_enabled_stdout, default_params_usage_for_help, print_list_colors, Args};
use crate::display::Display;
use crate::error::Error;
use crate::palette::build_palette;
use crate::runtime::ColorMode;
use crate::sim::Simulation;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn build_info() -> &'static str {
    env!("RAINSTORM_BUILD")
}

fn git_sha() -> &'static str {
    env!("RAINSTORM_GIT_SHA")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn detect_color_mode() -> ColorMode {
    if env::var_os("NO_COLOR").is_some() {
        return ColorMode::Mono;
    }
    ColorMode::Color16
}

fn check_environment() -> Result<(), Error> {
    if !std::io::stdout().is_terminal() {
        return Err(Error::NotATerminal);
    }
    let term = env::var("TERM").unwrap_or_default();
    if term == "dumb" {
        return Err(Error::UnsupportedTerminal(term));
    }
    Ok(())
}

fn install_stop_handlers(stop: &Arc<AtomicBool>) {
    #[cfg(unix)]
    {
        match Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            Ok(mut signals) => {
                let stop = Arc::clone(stop);
                thread::spawn(move || {
                    for sig in signals.forever() {
                        tracing::debug!(signal = sig, "stop requested");
                        stop.store(true, Ordering::Relaxed);
                    }
                });
            }
            Err(e) => eprintln!("failed to install signal handlers: {}", e),
        }
    }

    #[cfg(windows)]
    {
        let stop = Arc::clone(stop);
        if let Err(e) = ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed)) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    check_environment()?;

    let palette = build_palette(args.rain_color, args.lightning_color, detect_color_mode());
    let stop = Arc::new(AtomicBool::new(false));
    install_stop_handlers(&stop);

    let mut term = Terminal::new()?;
    let (rows, cols) = term.dimensions()?;
    info!(
        rows,
        cols,
        rain = args.rain_color.name(),
        lightning = args.lightning_color.name(),
        "starting"
    );

    let mut sim = Simulation::new(rows, cols, palette, StdRng::from_os_rng());
    sim::run(&mut term, &mut sim, &stop)?;
    info!(mode = sim.mode().label(), "stopped");
    Ok(())
}

fn main() -> ExitCode {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }
    cmd.build();

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_colors {
        print_list_colors();
        return ExitCode::SUCCESS;
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        if !git_sha().is_empty() {
            println!("Commit: {}", git_sha());
        }
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return ExitCode::SUCCESS;
    }

    match logging::init_from_env() {
        Ok(Some(path)) => info!(path = %path, "logging enabled"),
        Ok(None) => {}
        Err(e) => eprintln!("failed to open {}: {}", logging::LOG_PATH_ENV, e),
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_environment() => {
            eprintln!("Error: {}", e);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "aborted");
            eprintln!("{}", e);
            eprintln!("The terminal may not support full-screen drawing; try resizing it or another emulator.");
            ExitCode::FAILURE
        }
    }
}
