// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;

use clap::Parser;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  rainstorm --rain-color cyan --lightning-color yellow\n\nKEYS:\n  t, T     Toggle thunderstorm\n  q, Esc   Quit";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_help(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));

        let is_heading =
            !line.starts_with(' ') && line.ends_with(':') && line == line.to_ascii_uppercase();

        if is_heading {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
            out.push_str(nl);
            continue;
        }

        if let Some(rest) = line.strip_prefix("  rainstorm") {
            out.push_str("  \x1b[1;34mrainstorm\x1b[0m");
            out.push_str(rest);
            out.push_str(nl);
            continue;
        }

        out.push_str(line);
        out.push_str(nl);
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_help(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    #[value(name = "black")]
    Black,
    #[value(name = "red")]
    Red,
    #[value(name = "green")]
    Green,
    #[value(name = "yellow")]
    Yellow,
    #[value(name = "blue")]
    Blue,
    #[value(name = "magenta")]
    Magenta,
    #[value(name = "cyan")]
    Cyan,
    #[value(name = "white")]
    White,
}

impl NamedColor {
    pub const ALL: [NamedColor; 8] = [
        NamedColor::Black,
        NamedColor::Red,
        NamedColor::Green,
        NamedColor::Yellow,
        NamedColor::Blue,
        NamedColor::Magenta,
        NamedColor::Cyan,
        NamedColor::White,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NamedColor::Black => "black",
            NamedColor::Red => "red",
            NamedColor::Green => "green",
            NamedColor::Yellow => "yellow",
            NamedColor::Blue => "blue",
            NamedColor::Magenta => "magenta",
            NamedColor::Cyan => "cyan",
            NamedColor::White => "white",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rainstorm",
    version,
    disable_version_flag = true,
    about = "Simulates rain and thunderstorms in the terminal"
)]
pub struct Args {
    #[arg(
        long = "rain-color",
        default_value_t = NamedColor::Cyan,
        value_enum,
        ignore_case = true,
        help_heading = "APPEARANCE",
        help = "Color for the rain (see --list-colors)"
    )]
    pub rain_color: NamedColor,

    #[arg(
        long = "lightning-color",
        default_value_t = NamedColor::Yellow,
        value_enum,
        ignore_case = true,
        help_heading = "APPEARANCE",
        help = "Color for the lightning (see --list-colors)"
    )]
    pub lightning_color: NamedColor,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List available colors and exit"
    )]
    pub list_colors: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

pub fn print_list_colors() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE COLORS:\x1b[0m");
        println!("\x1b[2mNOTE: Use with --rain-color or --lightning-color.\x1b[0m");
    } else {
        println!("AVAILABLE COLORS:");
        println!("NOTE: Use with --rain-color or --lightning-color.");
    }
    println!();
    for c in NamedColor::ALL {
        let mark = match c {
            NamedColor::Cyan => "  (rain default)",
            NamedColor::Yellow => "  (lightning default)",
            _ => "",
        };
        println!("{}{}", c.name(), mark);
    }
}
