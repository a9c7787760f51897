use super::animation::{self, EntranceAnimation, EntranceLatch};
use super::button::{FloatingActionButton, Icon};
use super::context::MenuContext;
use super::geometry::{self, LayoutGeometry};
use crate::config::{
    ExpansionDirection, HorizontalAlignment, SubmenuGroup, SubmenuStyle, VerticalAlignment,
};
use crate::events::SubmenuListener;
use crate::gui::units::{Rect, Size};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmenuError {
    #[error(
        "Menu aligned {horizontal}/{vertical} cannot host a submenu expanding {direction}"
    )]
    IncompatibleDirection {
        direction: ExpansionDirection,
        horizontal: HorizontalAlignment,
        vertical: VerticalAlignment,
    },
    #[error("Unknown expand direction code {0}")]
    InvalidDirection(u8),
    #[error("Unknown button size code {0}, expected 0 (normal) or 1 (mini)")]
    InvalidButtonSize(i32),
    #[error("Submenu is not attached to a menu")]
    Detached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmenuState {
    #[default]
    Collapsed,
    Expanded,
}

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPass {
    pub geometry: LayoutGeometry,
    /// Non-empty only on the first pass of an expansion.
    pub animations: Vec<EntranceAnimation>,
}

pub struct Submenu {
    style: SubmenuStyle,
    icon: Icon,
    buttons: Vec<FloatingActionButton>,
    parent: Option<MenuContext>,
    state: SubmenuState,
    latch: EntranceLatch,
    placements: Vec<Option<Rect>>,
    listener: Option<Box<dyn SubmenuListener>>,
}

impl fmt::Debug for Submenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submenu")
            .field("style", &self.style)
            .field("buttons", &self.buttons.len())
            .field("parent", &self.parent)
            .field("state", &self.state)
            .field("latch", &self.latch)
            .finish_non_exhaustive()
    }
}

impl Submenu {
    pub fn new(style: SubmenuStyle) -> Self {
        let icon = Icon::resolve(style.submenu_icon.as_deref());
        Self {
            style,
            icon,
            buttons: Vec::new(),
            parent: None,
            state: SubmenuState::Collapsed,
            latch: EntranceLatch::default(),
            placements: Vec::new(),
            listener: None,
        }
    }

    /// Binds the submenu to its parent menu, rejecting directions the parent's
    /// alignment cannot display.
    pub fn attach(&mut self, parent: MenuContext) -> Result<(), SubmenuError> {
        parent.check_direction(self.style.expand_direction)?;
        log::debug!(
            "Attached {} submenu to menu aligned {}/{}",
            self.style.expand_direction,
            parent.horizontal_alignment,
            parent.vertical_alignment
        );
        self.parent = Some(parent);
        Ok(())
    }

    pub fn parent(&self) -> Option<&MenuContext> {
        self.parent.as_ref()
    }

    /// Swaps in a new style. The next `layout` call recomputes everything.
    pub fn restyle(&mut self, style: SubmenuStyle) -> Result<(), SubmenuError> {
        if let Some(parent) = &self.parent {
            parent.check_direction(style.expand_direction)?;
        }
        self.icon = Icon::resolve(style.submenu_icon.as_deref());
        self.style = style;
        self.placements.clear();
        Ok(())
    }

    pub fn style(&self) -> &SubmenuStyle {
        &self.style
    }

    /// Appends a button; placement follows insertion order.
    pub fn add_button(&mut self, button: FloatingActionButton) -> bool {
        log::trace!("Adding button {}", button.id());
        self.buttons.push(button);
        true
    }

    pub fn add_buttons(&mut self, buttons: impl IntoIterator<Item = FloatingActionButton>) {
        for button in buttons {
            self.add_button(button);
        }
    }

    pub fn remove_button(&mut self, button: &FloatingActionButton) -> bool {
        match self.buttons.iter().position(|b| b == button) {
            Some(idx) => {
                self.buttons.remove(idx);
                if idx < self.placements.len() {
                    self.placements.remove(idx);
                }
                true
            }
            None => false,
        }
    }

    pub fn buttons(&self) -> &[FloatingActionButton] {
        &self.buttons
    }

    pub fn button_mut(&mut self, index: usize) -> Option<&mut FloatingActionButton> {
        self.buttons.get_mut(index)
    }

    pub fn toggle(&mut self) {
        match self.state {
            SubmenuState::Collapsed => self.expand(),
            SubmenuState::Expanded => self.collapse(),
        }
    }

    pub fn expand(&mut self) {
        if self.state == SubmenuState::Expanded {
            log::trace!("expand ignored, submenu already expanded");
            return;
        }
        self.state = SubmenuState::Expanded;
        log::debug!("Submenu expanded");

        if let Some(listener) = self.listener.as_mut() {
            listener.on_menu_expanded();
        }
    }

    /// Collapsing also cancels any entrance animation still in flight.
    pub fn collapse(&mut self) {
        if self.state == SubmenuState::Collapsed {
            log::trace!("collapse ignored, submenu already collapsed");
            return;
        }
        self.state = SubmenuState::Collapsed;
        self.latch.rearm();
        log::debug!("Submenu collapsed");

        if let Some(listener) = self.listener.as_mut() {
            listener.on_menu_collapsed();
        }
    }

    /// Expands even if the recorded state claims the submenu is already open.
    pub fn show(&mut self) {
        self.state = SubmenuState::Collapsed;
        self.expand();
    }

    /// Collapses even if the recorded state claims the submenu is already closed.
    pub fn hide(&mut self) {
        self.state = SubmenuState::Expanded;
        self.collapse();
    }

    pub fn state(&self) -> SubmenuState {
        self.state
    }

    pub fn is_expanded(&self) -> bool {
        self.state == SubmenuState::Expanded
    }

    /// Only an expanded submenu is drawn or hit-tested.
    pub fn is_drawable(&self) -> bool {
        self.is_expanded()
    }

    pub fn is_animation_launched(&self) -> bool {
        self.latch.is_launched()
    }

    pub fn submenu_group(&self) -> Option<&SubmenuGroup> {
        self.style.submenu_group.as_ref()
    }

    pub fn expand_direction(&self) -> ExpansionDirection {
        self.style.expand_direction
    }

    pub fn is_enable_overlay(&self) -> bool {
        self.style.enable_overlay
    }

    pub fn submenu_icon(&self) -> &Icon {
        &self.icon
    }

    pub fn set_update_listener(&mut self, listener: impl SubmenuListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_update_listener(&mut self) {
        self.listener = None;
    }

    /// Measures and places every button. The first pass after an expansion
    /// also plans the entrance animation of every visible button.
    pub fn layout(&mut self) -> Result<LayoutPass, SubmenuError> {
        let parent = self.parent.ok_or(SubmenuError::Detached)?;

        let sizes: Vec<Option<Size>> = self
            .buttons
            .iter()
            .map(|b| (!b.is_gone()).then(|| b.measured_size()))
            .collect();
        let geometry = geometry::layout(&self.style.geometry(), &parent, &sizes);
        self.placements = geometry.placements.clone();

        let animations = match self.state {
            SubmenuState::Expanded => self
                .latch
                .try_launch()
                .map(|cycle| {
                    animation::plan_entrance(parent.pivot, &geometry, &self.buttons, cycle)
                })
                .unwrap_or_default(),
            SubmenuState::Collapsed => Vec::new(),
        };

        log::debug!(
            "Laid out {} buttons in {}x{} ({} animations)",
            geometry.visible().count(),
            geometry.size.width,
            geometry.size.height,
            animations.len()
        );

        Ok(LayoutPass {
            geometry,
            animations,
        })
    }

    /// Commits the resting position of a finished entrance animation.
    ///
    /// Returns `None` when the animation belongs to an earlier expansion, or
    /// when the button it was planned for is no longer at its index.
    pub fn complete_entrance(&mut self, animation: &EntranceAnimation) -> Option<Rect> {
        if !self.is_expanded() || !self.latch.is_current(animation.cycle) {
            log::debug!(
                "Ignoring stale entrance animation for button {} (cycle {})",
                animation.index,
                animation.cycle
            );
            return None;
        }

        let owner = self.buttons.get(animation.index).map(FloatingActionButton::id);
        if owner != Some(&animation.button) {
            log::debug!(
                "Ignoring entrance animation for button {}, slot {} now holds {:?}",
                animation.button,
                animation.index,
                owner
            );
            return None;
        }

        let slot = self.placements.get_mut(animation.index)?;
        let rect = animation.resting_rect();
        *slot = Some(rect);
        Some(rect)
    }

    /// Last committed placement of the button at `index`.
    pub fn placement(&self, index: usize) -> Option<Rect> {
        self.placements.get(index).copied().flatten()
    }
}
