use std::time::Duration;

pub mod animation;
pub mod button;
pub mod context;
pub mod geometry;
pub mod model;
#[cfg(feature = "preview")]
pub mod view;

pub use animation::{Easing, EntranceAnimation, EntranceLatch};
pub use button::{ButtonId, ButtonLayers, ButtonSize, FloatingActionButton, Icon, Visibility};
pub use context::MenuContext;
pub use geometry::{GeometryConfig, LayoutGeometry};
pub use model::{LayoutPass, Submenu, SubmenuError, SubmenuState};
#[cfg(feature = "preview")]
pub use view::{draw, render_png};

pub const DEFAULT_RADIUS: i32 = 100; // orbit radius for round/fan
pub const DEFAULT_BUTTON_SPACING: i32 = 16;
pub const FAB_SIZE_NORMAL: f64 = 56.0;
pub const FAB_SIZE_MINI: f64 = 40.0;
pub const FAB_ICON_SIZE: f64 = 24.0;
pub const FAB_STROKE_WIDTH: f64 = 1.0;
pub const SHADOW_RADIUS: f64 = 3.0;
pub const SHADOW_OFFSET: f64 = 1.0;
pub const OUTER_STROKE_OPACITY: f64 = 0.02;
pub const ENTRANCE_DURATION: Duration = Duration::from_millis(1000);
