use crate::gui::menu::button::{ButtonId, ButtonSize, Visibility};
use crate::gui::menu::geometry::GeometryConfig;
use crate::gui::menu::{DEFAULT_BUTTON_SPACING, DEFAULT_RADIUS, SubmenuError};
use crate::gui::theme::HexColor;
use crate::gui::units::Insets;
use derive_more::{AsRef, Deref, Display, From, Into};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::path::PathBuf;
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionDirection {
    #[default]
    #[strum(serialize = "Up", serialize = "u", serialize = "0")]
    Up,
    #[strum(serialize = "Down", serialize = "d", serialize = "1")]
    Down,
    #[strum(serialize = "Left", serialize = "l", serialize = "2")]
    Left,
    #[strum(serialize = "Right", serialize = "r", serialize = "3")]
    Right,
    #[strum(to_string = "Round", serialize = "circle", serialize = "4")]
    Round,
    #[strum(to_string = "Fan", serialize = "arc", serialize = "5")]
    Fan,
}

impl ExpansionDirection {
    pub fn as_index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::iter().nth(idx)
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }
}

impl TryFrom<u8> for ExpansionDirection {
    type Error = SubmenuError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_index(code as usize).ok_or(SubmenuError::InvalidDirection(code))
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlignment {
    #[strum(serialize = "Left", serialize = "l")]
    Left,
    #[strum(to_string = "Center", serialize = "centre", serialize = "c")]
    Center,
    #[default]
    #[strum(serialize = "Right", serialize = "r")]
    Right,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    #[strum(serialize = "Top", serialize = "t")]
    Top,
    #[strum(to_string = "Center", serialize = "centre", serialize = "c")]
    Center,
    #[default]
    #[strum(serialize = "Bottom", serialize = "b")]
    Bottom,
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct SubmenuGroup(String);

crate::impl_string_newtype!(SubmenuGroup);

/// Style of a single submenu. Loaded once; changing it means building a new value.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SubmenuStyle {
    pub enable_overlay: bool,
    pub expand_direction: ExpansionDirection,
    pub submenu_group: Option<SubmenuGroup>,
    pub radius: i32,
    /// Degrees trimmed from both ends of a round or fan arc.
    pub angle_overflow: f64,
    pub button_spacing: i32,
    pub submenu_icon: Option<PathBuf>,
    pub padding: Insets,
}

impl Default for SubmenuStyle {
    fn default() -> Self {
        Self {
            enable_overlay: false,
            expand_direction: ExpansionDirection::Up,
            submenu_group: None,
            radius: DEFAULT_RADIUS,
            angle_overflow: 0.0,
            button_spacing: DEFAULT_BUTTON_SPACING,
            submenu_icon: None,
            padding: Insets::default(),
        }
    }
}

impl SubmenuStyle {
    pub fn geometry(&self) -> GeometryConfig {
        GeometryConfig {
            direction: self.expand_direction,
            spacing: self.button_spacing,
            radius: self.radius,
            angle_overflow: self.angle_overflow,
            padding: self.padding,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MenuConfig {
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub trigger_size: ButtonSize,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ButtonStyle {
    pub id: ButtonId,
    #[serde(default)]
    pub size: ButtonSize,
    pub color_normal: Option<HexColor>,
    pub color_pressed: Option<HexColor>,
    pub color_disabled: Option<HexColor>,
    pub icon: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub stroke_visible: bool,
    #[serde(default)]
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub submenu: SubmenuStyle,
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub buttons: Vec<ButtonStyle>,
}

impl Config {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let s = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;

        Ok(s.try_deserialize()?)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "fabmenu", "fabmenu").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("FABMENU").separator("__"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Falling back to default configuration: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");
