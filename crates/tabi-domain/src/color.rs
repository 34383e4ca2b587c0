//! Theme colors, named presets, and the accent palette.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ThemeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "ThemeColor::opaque")]
    pub a: u8,
}

impl ThemeColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    fn opaque() -> u8 {
        255
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

pub const ORANGE: ThemeColor = ThemeColor::rgb(255, 149, 0);
pub const BLUE: ThemeColor = ThemeColor::rgb(0, 122, 255);
pub const GREEN: ThemeColor = ThemeColor::rgb(52, 199, 89);
pub const GRAY: ThemeColor = ThemeColor::rgb(142, 142, 147);
pub const BROWN: ThemeColor = ThemeColor::rgb(162, 132, 94);
pub const PURPLE: ThemeColor = ThemeColor::rgb(175, 82, 222);
pub const PINK: ThemeColor = ThemeColor::rgb(255, 45, 85);
pub const RED: ThemeColor = ThemeColor::rgb(255, 59, 48);
pub const YELLOW: ThemeColor = ThemeColor::rgb(255, 204, 0);
pub const MINT: ThemeColor = ThemeColor::rgb(0, 199, 190);
pub const CYAN: ThemeColor = ThemeColor::rgb(50, 173, 230);
pub const INDIGO: ThemeColor = ThemeColor::rgb(88, 86, 214);

/// Used whenever neither a stored color nor a known theme name is available.
pub const DEFAULT_THEME_COLOR: ThemeColor = ORANGE;
pub const DEFAULT_THEME_NAME: &str = "Default";
pub const DEFAULT_THEME_ICON: &str = "sparkles";

/// A named theme with its icon and accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreset {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: ThemeColor,
}

pub const THEME_PRESETS: [ThemePreset; 8] = [
    ThemePreset { name: "Default", icon: "sparkles", color: ORANGE },
    ThemePreset { name: "Sea", icon: "water.waves", color: BLUE },
    ThemePreset { name: "Mountain", icon: "mountain.2", color: GREEN },
    ThemePreset { name: "City", icon: "building.2", color: GRAY },
    ThemePreset { name: "Cafe", icon: "cup.and.saucer", color: BROWN },
    ThemePreset { name: "Festival", icon: "music.note", color: PURPLE },
    ThemePreset { name: "Cherry Blossom", icon: "leaf", color: PINK },
    ThemePreset { name: "Autumn", icon: "leaf.fill", color: ORANGE },
];

impl ThemePreset {
    /// Exact, case-sensitive lookup by theme name.
    pub fn find(name: &str) -> Option<&'static ThemePreset> {
        THEME_PRESETS.iter().find(|preset| preset.name == name)
    }

    /// Case-insensitive lookup used when parsing user input.
    pub fn find_loose(name: &str) -> Option<&'static ThemePreset> {
        let needle = name.trim();
        THEME_PRESETS
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(needle))
    }
}

pub fn icon_for_theme(name: &str) -> &'static str {
    ThemePreset::find(name)
        .map(|preset| preset.icon)
        .unwrap_or(DEFAULT_THEME_ICON)
}

/// Bright accent colors offered when picking a custom theme color.
pub const VITAMIN_PALETTE: [ThemeColor; 11] = [
    ORANGE, YELLOW, PINK, RED, GREEN, MINT, BLUE, CYAN, INDIGO, PURPLE, BROWN,
];
