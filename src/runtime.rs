// Copyright (c) 2026 rezky_nightky

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Calm,
    Storm,
}

impl Mode {
    pub fn is_storm(self) -> bool {
        self == Mode::Storm
    }

    pub fn toggled(self) -> Mode {
        match self {
            Mode::Calm => Mode::Storm,
            Mode::Storm => Mode::Calm,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Calm => "calm",
            Mode::Storm => "storm",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
}
