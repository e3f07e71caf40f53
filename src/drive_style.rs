use serde::Deserialize;
use std::fmt;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DriveStyle {
    /// Each stick drives one side.
    #[default]
    Tank,
    /// One stick for forward/backward, one axis for turning.
    Arcade,
}

impl DriveStyle {
    pub fn other(self) -> Self {
        match self {
            DriveStyle::Tank => DriveStyle::Arcade,
            DriveStyle::Arcade => DriveStyle::Tank,
        }
    }
}

impl fmt::Display for DriveStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveStyle::Tank => write!(f, "tank"),
            DriveStyle::Arcade => write!(f, "arcade"),
        }
    }
}

/// Which manual drive style is installed as the idle behaviour of the drive train.
#[derive(Debug, Default, Clone)]
pub struct DriveStyleSelector {
    style: DriveStyle,
}

impl DriveStyleSelector {
    pub fn new(style: DriveStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> DriveStyle {
        self.style
    }

    pub fn toggle(&mut self) -> DriveStyle {
        self.style = self.style.other();
        self.style
    }

    pub fn set_style(&mut self, style: DriveStyle) -> DriveStyle {
        self.style = style;
        self.style
    }
}
