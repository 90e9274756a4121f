use std::str::FromStr;

use crate::error::BackdropError;
use crate::surface::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub particle: Rgb,
    pub line: Rgb,
}

impl Theme {
    pub fn palette(self) -> Palette {
        match self {
            Self::Light => Palette {
                background: Rgb::new(255, 255, 255),
                particle: Rgb::new(55, 105, 224),
                line: Rgb::new(55, 105, 224),
            },
            // hsl(222, 47%, 11%)
            Self::Dark => Palette {
                background: Rgb::new(15, 23, 42),
                particle: Rgb::new(98, 140, 242),
                line: Rgb::new(98, 140, 242),
            },
        }
    }

    pub fn selector(self) -> u8 {
        match self {
            Self::Light => 0,
            Self::Dark => 1,
        }
    }
}

impl TryFrom<u8> for Theme {
    type Error = BackdropError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        match selector {
            0 => Ok(Self::Light),
            1 => Ok(Self::Dark),
            other => Err(BackdropError::UnknownTheme(other)),
        }
    }
}

impl FromStr for Theme {
    type Err = BackdropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(BackdropError::UnknownThemeName(s.to_string())),
        }
    }
}
