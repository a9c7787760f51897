use super::{
    FAB_ICON_SIZE, FAB_SIZE_MINI, FAB_SIZE_NORMAL, FAB_STROKE_WIDTH, OUTER_STROKE_OPACITY,
    SHADOW_OFFSET, SHADOW_RADIUS, SubmenuError,
};
use crate::config::ButtonStyle;
use crate::gui::theme::{self, Color};
use crate::gui::units::Size;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::path::{Path, PathBuf};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ButtonId(String);

crate::impl_string_newtype!(ButtonId);

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
pub enum ButtonSize {
    #[default]
    #[strum(serialize = "Normal", serialize = "0")]
    Normal,
    #[strum(serialize = "Mini", serialize = "1")]
    Mini,
}

impl ButtonSize {
    pub fn circle_diameter(&self) -> f64 {
        match self {
            Self::Normal => FAB_SIZE_NORMAL,
            Self::Mini => FAB_SIZE_MINI,
        }
    }
}

impl TryFrom<i32> for ButtonSize {
    type Error = SubmenuError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Normal),
            1 => Ok(Self::Mini),
            other => Err(SubmenuError::InvalidButtonSize(other)),
        }
    }
}

/// Gone buttons take no space and get no placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Gone,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonColors {
    pub normal: Color,
    pub pressed: Color,
    pub disabled: Color,
}

impl Default for ButtonColors {
    fn default() -> Self {
        Self {
            normal: theme::transparent(),
            pressed: theme::transparent(),
            disabled: theme::darker_gray(),
        }
    }
}

/// Resolved icon of a button or submenu. Anything that cannot be loaded draws nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Icon {
    #[default]
    Transparent,
    Image(PathBuf),
}

impl Icon {
    pub fn resolve(path: Option<&Path>) -> Self {
        match path {
            Some(p) if p.exists() => Self::Image(p.to_path_buf()),
            Some(p) => {
                log::warn!("Icon {} not found, drawing transparent", p.display());
                Self::Transparent
            }
            None => Self::Transparent,
        }
    }
}

/// A floating action button as the submenu sees it: identity, size class and visuals.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingActionButton {
    id: ButtonId,
    size: ButtonSize,
    colors: ButtonColors,
    icon: Option<PathBuf>,
    default_icon: Option<PathBuf>,
    stroke_visible: bool,
    visibility: Visibility,
}

impl FloatingActionButton {
    pub fn new(id: ButtonId) -> Self {
        Self {
            id,
            size: ButtonSize::default(),
            colors: ButtonColors::default(),
            icon: None,
            default_icon: None,
            stroke_visible: true,
            visibility: Visibility::Visible,
        }
    }

    pub fn from_style(style: &ButtonStyle) -> Self {
        let defaults = ButtonColors::default();
        let colors = ButtonColors {
            normal: style.color_normal.map_or(defaults.normal, Color::from),
            pressed: style.color_pressed.map_or(defaults.pressed, Color::from),
            disabled: style.color_disabled.map_or(defaults.disabled, Color::from),
        };

        let mut button = Self::new(style.id.clone())
            .with_size(style.size)
            .with_colors(colors)
            .with_stroke_visible(style.stroke_visible);
        if let Some(icon) = &style.icon {
            button = button.with_icon(icon.clone());
        }
        button.visibility = style.visibility;
        button
    }

    pub fn with_size(mut self, size: ButtonSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_colors(mut self, colors: ButtonColors) -> Self {
        self.colors = colors;
        self
    }

    /// Sets both the current icon and the one `set_icon_to_default` restores.
    pub fn with_icon(mut self, icon: impl Into<PathBuf>) -> Self {
        let icon = icon.into();
        self.default_icon = Some(icon.clone());
        self.icon = Some(icon);
        self
    }

    pub fn with_stroke_visible(mut self, visible: bool) -> Self {
        self.stroke_visible = visible;
        self
    }

    pub fn id(&self) -> &ButtonId {
        &self.id
    }

    pub fn size(&self) -> ButtonSize {
        self.size
    }

    pub fn colors(&self) -> &ButtonColors {
        &self.colors
    }

    pub fn stroke_visible(&self) -> bool {
        self.stroke_visible
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_gone(&self) -> bool {
        self.visibility == Visibility::Gone
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    // The setters below report whether the visuals need to be recomposed.

    pub fn set_size(&mut self, size: ButtonSize) -> bool {
        replace_if_changed(&mut self.size, size)
    }

    pub fn set_size_code(&mut self, code: i32) -> Result<bool, SubmenuError> {
        Ok(self.set_size(ButtonSize::try_from(code)?))
    }

    pub fn set_background_color_normal(&mut self, color: Color) -> bool {
        replace_if_changed(&mut self.colors.normal, color)
    }

    pub fn set_background_color_pressed(&mut self, color: Color) -> bool {
        replace_if_changed(&mut self.colors.pressed, color)
    }

    pub fn set_background_color_disabled(&mut self, color: Color) -> bool {
        replace_if_changed(&mut self.colors.disabled, color)
    }

    pub fn set_icon(&mut self, icon: Option<PathBuf>) -> bool {
        replace_if_changed(&mut self.icon, icon)
    }

    pub fn set_icon_to_default(&mut self) -> bool {
        let default = self.default_icon.clone();
        self.set_icon(default)
    }

    pub fn icon_path(&self) -> Option<&Path> {
        self.icon.as_deref()
    }

    pub fn icon(&self) -> Icon {
        Icon::resolve(self.icon.as_deref())
    }

    pub fn circle_size(&self) -> f64 {
        self.size.circle_diameter()
    }

    /// Side of the square the button occupies, shadow included.
    pub fn drawable_size(&self) -> i32 {
        (self.circle_size() + 2.0 * SHADOW_RADIUS) as i32
    }

    pub fn measured_size(&self) -> Size {
        Size::square(self.drawable_size())
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Normal,
    Pressed,
    Disabled,
}

/// Distance of a layer from each edge of the button's drawable square.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayerInsets {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl LayerInsets {
    fn inset_by(&self, amount: f64) -> Self {
        Self {
            left: self.left + amount,
            top: self.top + amount,
            right: self.right + amount,
            bottom: self.bottom + amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeGradient {
    pub width: f64,
    /// Vertical gradient stops from the top of the circle to the bottom.
    pub stops: [(f64, Color); 5],
}

impl StrokeGradient {
    fn for_color(color: Color, width: f64) -> Self {
        let top = theme::lighten(color);
        let bottom = theme::darken(color);
        Self {
            width,
            stops: [
                (0.0, top),
                (0.2, theme::half_transparent(top)),
                (0.5, color),
                (0.8, theme::half_transparent(bottom)),
                (1.0, bottom),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleLayer {
    pub color: Color,
    pub alpha: f64,
    /// Fill and stroke are painted as one group at `alpha`.
    pub translucent_group: bool,
    pub inner_stroke: Option<StrokeGradient>,
    pub inner_stroke_inset: f64,
}

impl CircleLayer {
    fn new(color: Color, stroke_visible: bool) -> Self {
        let opaque = theme::opaque(color);
        Self {
            color: opaque,
            alpha: color.alpha,
            translucent_group: color.alpha < 1.0 && stroke_visible,
            inner_stroke: stroke_visible.then(|| StrokeGradient::for_color(opaque, FAB_STROKE_WIDTH)),
            inner_stroke_inset: (FAB_STROKE_WIDTH / 2.0).trunc(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillStates {
    pub normal: CircleLayer,
    pub pressed: CircleLayer,
    pub disabled: CircleLayer,
}

impl FillStates {
    pub fn for_state(&self, state: ButtonState) -> &CircleLayer {
        match state {
            ButtonState::Normal => &self.normal,
            ButtonState::Pressed => &self.pressed,
            ButtonState::Disabled => &self.disabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OuterStroke {
    pub width: f64,
    pub color: Color,
}

/// Layered drawing recipe of a button: state fill, outer stroke, icon.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonLayers {
    pub fill: FillStates,
    pub fill_inset: LayerInsets,
    pub outer_stroke: OuterStroke,
    pub outer_stroke_inset: LayerInsets,
    pub icon: Icon,
    pub icon_inset: LayerInsets,
}

impl ButtonLayers {
    pub fn compose(button: &FloatingActionButton) -> Self {
        let stroke = button.stroke_visible;
        let fill = FillStates {
            normal: CircleLayer::new(button.colors.normal, stroke),
            pressed: CircleLayer::new(button.colors.pressed, stroke),
            disabled: CircleLayer::new(button.colors.disabled, stroke),
        };

        let fill_inset = LayerInsets {
            left: SHADOW_RADIUS,
            top: SHADOW_RADIUS - SHADOW_OFFSET,
            right: SHADOW_RADIUS,
            bottom: SHADOW_RADIUS + SHADOW_OFFSET,
        };
        let icon_offset = ((button.circle_size() - FAB_ICON_SIZE) / 2.0).trunc();

        let mut outer = theme::black();
        outer.alpha = theme::opacity_to_alpha(OUTER_STROKE_OPACITY) as f64 / 255.0;

        Self {
            fill,
            fill_inset,
            outer_stroke: OuterStroke {
                width: FAB_STROKE_WIDTH,
                color: outer,
            },
            outer_stroke_inset: fill_inset.inset_by(-FAB_STROKE_WIDTH / 2.0),
            icon: button.icon(),
            icon_inset: fill_inset.inset_by(icon_offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Srgba;

    fn button() -> FloatingActionButton {
        FloatingActionButton::new(ButtonId::new("share"))
    }

    #[test]
    fn test_measured_size_includes_shadow() {
        assert_eq!(button().measured_size(), Size::square(62));
        assert_eq!(
            button().with_size(ButtonSize::Mini).measured_size(),
            Size::square(46)
        );
    }

    #[test]
    fn test_invalid_size_code_is_rejected() {
        let mut b = button();
        assert!(matches!(
            b.set_size_code(7),
            Err(SubmenuError::InvalidButtonSize(7))
        ));
        assert_eq!(b.size(), ButtonSize::Normal);
        assert!(b.set_size_code(1).unwrap());
        assert!(!b.set_size_code(1).unwrap());
        assert_eq!(b.size(), ButtonSize::Mini);
    }

    #[test]
    fn test_setters_report_changes() {
        let mut b = button();
        let red = Srgba::new(1.0, 0.0, 0.0, 1.0);
        assert!(b.set_background_color_normal(red));
        assert!(!b.set_background_color_normal(red));
        assert!(b.set_background_color_pressed(red));
        assert!(!b.set_background_color_disabled(theme::darker_gray()));
    }

    #[test]
    fn test_icon_default_restore_and_fallback() {
        let mut b = button().with_icon("/definitely/not/here.png");
        assert_eq!(b.icon(), Icon::Transparent);
        assert!(b.set_icon(None));
        assert_eq!(b.icon_path(), None);
        assert!(b.set_icon_to_default());
        assert_eq!(b.icon_path(), Some(Path::new("/definitely/not/here.png")));
    }

    #[test]
    fn test_layer_insets() {
        let layers = ButtonLayers::compose(&button());
        assert_eq!(
            layers.fill_inset,
            LayerInsets {
                left: 3.0,
                top: 2.0,
                right: 3.0,
                bottom: 4.0
            }
        );
        assert_eq!(layers.outer_stroke_inset.left, 2.5);
        // (56 - 24) / 2 = 16
        assert_eq!(layers.icon_inset.top, 18.0);
        assert_eq!(layers.outer_stroke.color.alpha, 5.0 / 255.0);
    }

    #[test]
    fn test_translucent_fill_groups_only_with_stroke() {
        let color = Srgba::new(0.0, 0.5, 1.0, 0.5);
        let colors = ButtonColors {
            normal: color,
            ..ButtonColors::default()
        };

        let layers = ButtonLayers::compose(&button().with_colors(colors));
        let normal = layers.fill.for_state(ButtonState::Normal);
        assert!(normal.translucent_group);
        assert_eq!(normal.alpha, 0.5);
        assert_eq!(normal.color.alpha, 1.0);
        let stops = &normal.inner_stroke.as_ref().unwrap().stops;
        assert_eq!(stops[2].1, normal.color);
        assert_eq!(stops[1].1.alpha, 0.5);

        let flat = ButtonLayers::compose(&button().with_colors(colors).with_stroke_visible(false));
        let normal = flat.fill.for_state(ButtonState::Normal);
        assert!(!normal.translucent_group);
        assert!(normal.inner_stroke.is_none());
    }
}
