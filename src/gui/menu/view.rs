use super::button::{ButtonLayers, ButtonState, CircleLayer, LayerInsets};
use super::geometry::LayoutGeometry;
use super::model::Submenu;
use crate::gui::theme::Color;
use crate::gui::units::Rect;
use cairo::{Context, Format, ImageSurface, LinearGradient};
use std::f64::consts::PI;
use std::path::Path;
use thiserror::Error;

const SHADOW_ALPHA: f64 = 0.25;
const OVERLAY_ALPHA: f64 = 0.4;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[error("Failed to write PNG: {0}")]
    Png(#[from] cairo::IoError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Ellipse inscribed in `rect` after removing `insets`.
struct Oval {
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
}

impl Oval {
    fn inset(rect: Rect, insets: &LayerInsets) -> Self {
        let left = rect.left as f64 + insets.left;
        let top = rect.top as f64 + insets.top;
        let width = rect.width as f64 - insets.left - insets.right;
        let height = rect.height as f64 - insets.top - insets.bottom;
        Self {
            cx: left + width / 2.0,
            cy: top + height / 2.0,
            rx: width / 2.0,
            ry: height / 2.0,
        }
    }

    fn trace(&self, cr: &Context) -> Result<(), cairo::Error> {
        if self.rx <= 0.0 || self.ry <= 0.0 {
            cr.new_path();
            return Ok(());
        }
        cr.save()?;
        cr.translate(self.cx, self.cy);
        cr.scale(self.rx, self.ry);
        cr.new_path();
        cr.arc(0.0, 0.0, 1.0, 0.0, 2.0 * PI);
        cr.restore()
    }
}

fn set_color(cr: &Context, color: Color) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

struct ButtonRenderer<'a> {
    layers: &'a ButtonLayers,
    rect: Rect,
    state: ButtonState,
}

impl<'a> ButtonRenderer<'a> {
    fn new(layers: &'a ButtonLayers, rect: Rect, state: ButtonState) -> Self {
        Self {
            layers,
            rect,
            state,
        }
    }

    fn draw(&self, cr: &Context) -> Result<(), cairo::Error> {
        self.draw_shadow(cr)?;

        let fill = self.layers.fill.for_state(self.state);
        if fill.translucent_group {
            cr.push_group();
            self.draw_fill(cr, fill)?;
            cr.pop_group_to_source()?;
            cr.paint_with_alpha(fill.alpha)?;
        } else {
            self.draw_fill(cr, fill)?;
        }

        self.draw_outer_stroke(cr)
    }

    fn draw_shadow(&self, cr: &Context) -> Result<(), cairo::Error> {
        Oval::inset(self.rect, &LayerInsets::default()).trace(cr)?;
        cr.set_source_rgba(0.0, 0.0, 0.0, SHADOW_ALPHA);
        cr.fill()
    }

    fn draw_fill(&self, cr: &Context, fill: &CircleLayer) -> Result<(), cairo::Error> {
        let oval = Oval::inset(self.rect, &self.layers.fill_inset);
        oval.trace(cr)?;
        let alpha = if fill.translucent_group { 1.0 } else { fill.alpha };
        cr.set_source_rgba(fill.color.red, fill.color.green, fill.color.blue, alpha);
        cr.fill()?;

        if let Some(stroke) = &fill.inner_stroke {
            let inset = fill.inner_stroke_inset;
            let insets = &self.layers.fill_inset;
            let inner = Oval::inset(
                self.rect,
                &LayerInsets {
                    left: insets.left + inset,
                    top: insets.top + inset,
                    right: insets.right + inset,
                    bottom: insets.bottom + inset,
                },
            );
            let gradient =
                LinearGradient::new(inner.cx, inner.cy - inner.ry, inner.cx, inner.cy + inner.ry);
            for (offset, color) in &stroke.stops {
                let (r, g, b, a) = color.into_components();
                gradient.add_color_stop_rgba(*offset, r, g, b, a);
            }
            inner.trace(cr)?;
            cr.set_line_width(stroke.width);
            cr.set_source(&gradient)?;
            cr.stroke()?;
        }
        Ok(())
    }

    fn draw_outer_stroke(&self, cr: &Context) -> Result<(), cairo::Error> {
        let outer = &self.layers.outer_stroke;
        Oval::inset(self.rect, &self.layers.outer_stroke_inset).trace(cr)?;
        set_color(cr, outer.color);
        cr.set_line_width(outer.width);
        cr.stroke()
    }
}

/// Draws every placed button of `submenu`. Collapsed submenus draw nothing.
pub fn draw(cr: &Context, submenu: &Submenu, geometry: &LayoutGeometry) -> Result<(), cairo::Error> {
    if !submenu.is_drawable() {
        return Ok(());
    }

    if submenu.is_enable_overlay() {
        cr.set_source_rgba(0.0, 0.0, 0.0, OVERLAY_ALPHA);
        cr.paint()?;
    }

    for (i, rect) in geometry.visible() {
        let Some(button) = submenu.buttons().get(i) else {
            continue;
        };
        let layers = ButtonLayers::compose(button);
        ButtonRenderer::new(&layers, rect, ButtonState::Normal).draw(cr)?;
    }
    Ok(())
}

pub fn render_png(
    path: &Path,
    submenu: &Submenu,
    geometry: &LayoutGeometry,
) -> Result<(), PreviewError> {
    let size = geometry.size;
    let surface = ImageSurface::create(Format::ARgb32, size.width.max(1), size.height.max(1))?;
    {
        let cr = Context::new(&surface)?;
        draw(&cr, submenu, geometry)?;
    }

    let mut file = fs_err::File::create(path)?;
    surface.write_to_png(&mut file)?;
    log::info!("Wrote preview to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExpansionDirection, HorizontalAlignment, SubmenuStyle, VerticalAlignment};
    use crate::gui::menu::{ButtonId, FloatingActionButton, MenuContext};

    fn submenu() -> Submenu {
        let style = SubmenuStyle {
            expand_direction: ExpansionDirection::Fan,
            ..SubmenuStyle::default()
        };
        let mut submenu = Submenu::new(style);
        submenu.add_buttons((0..3).map(|i| FloatingActionButton::new(ButtonId::new(format!("b{i}")))));
        let trigger = FloatingActionButton::new(ButtonId::new("trigger"));
        submenu
            .attach(MenuContext::for_trigger(
                HorizontalAlignment::Center,
                VerticalAlignment::Bottom,
                &trigger,
            ))
            .unwrap();
        submenu
    }

    #[test]
    fn test_render_png_writes_file() {
        let mut submenu = submenu();
        submenu.expand();
        let pass = submenu.layout().unwrap();

        let path = std::env::temp_dir().join("fabmenu-preview-test.png");
        render_png(&path, &submenu, &pass.geometry).unwrap();
        let written = fs_err::metadata(&path).unwrap();
        assert!(written.len() > 0);
        let _ = fs_err::remove_file(&path);
    }

    #[test]
    fn test_collapsed_submenu_draws_nothing() {
        let mut submenu = submenu();
        let pass = submenu.layout().unwrap();
        let surface = ImageSurface::create(Format::ARgb32, 8, 8).unwrap();
        let cr = Context::new(&surface).unwrap();
        assert!(draw(&cr, &submenu, &pass.geometry).is_ok());
    }
}
