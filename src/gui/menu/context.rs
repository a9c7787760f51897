use super::{FloatingActionButton, SubmenuError};
use crate::config::{ExpansionDirection, HorizontalAlignment, VerticalAlignment};
use crate::gui::units::{Point, Size};

/// Read-only view of the parent menu a submenu is attached to.
///
/// `pivot` is the centre of the parent's trigger button, expressed in the submenu's
/// own coordinate space. Every entrance animation starts there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuContext {
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub trigger_size: Size,
    pub pivot: Point,
}

impl MenuContext {
    pub fn new(
        horizontal_alignment: HorizontalAlignment,
        vertical_alignment: VerticalAlignment,
        trigger_size: Size,
    ) -> Self {
        Self {
            horizontal_alignment,
            vertical_alignment,
            trigger_size,
            pivot: Point::default(),
        }
    }

    pub fn for_trigger(
        horizontal_alignment: HorizontalAlignment,
        vertical_alignment: VerticalAlignment,
        trigger: &FloatingActionButton,
    ) -> Self {
        Self::new(
            horizontal_alignment,
            vertical_alignment,
            trigger.measured_size(),
        )
    }

    pub fn with_pivot(mut self, pivot: Point) -> Self {
        self.pivot = pivot;
        self
    }

    /// A menu pinned to an edge cannot host a submenu that expands past that edge.
    pub fn check_direction(&self, direction: ExpansionDirection) -> Result<(), SubmenuError> {
        let blocked = match (direction, self.vertical_alignment, self.horizontal_alignment) {
            (ExpansionDirection::Up, VerticalAlignment::Top, _) => true,
            (ExpansionDirection::Down, VerticalAlignment::Bottom, _) => true,
            (ExpansionDirection::Left, _, HorizontalAlignment::Left) => true,
            (ExpansionDirection::Right, _, HorizontalAlignment::Right) => true,
            _ => false,
        };

        if blocked {
            return Err(SubmenuError::IncompatibleDirection {
                direction,
                horizontal: self.horizontal_alignment,
                vertical: self.vertical_alignment,
            });
        }
        Ok(())
    }

    /// Whether the submenu only occupies one side of the trigger on each axis.
    pub fn is_edge_aligned(&self) -> (bool, bool) {
        (
            self.horizontal_alignment != HorizontalAlignment::Center,
            self.vertical_alignment != VerticalAlignment::Center,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn context(h: HorizontalAlignment, v: VerticalAlignment) -> MenuContext {
        MenuContext::new(h, v, Size::square(62))
    }

    #[test]
    fn test_top_aligned_menu_rejects_expand_up() {
        let ctx = context(HorizontalAlignment::Center, VerticalAlignment::Top);
        assert!(matches!(
            ctx.check_direction(ExpansionDirection::Up),
            Err(SubmenuError::IncompatibleDirection {
                direction: ExpansionDirection::Up,
                ..
            })
        ));
        assert!(ctx.check_direction(ExpansionDirection::Down).is_ok());
    }

    #[test]
    fn test_compatibility_table() {
        let forbidden = [
            (ExpansionDirection::Up, VerticalAlignment::Top, None),
            (ExpansionDirection::Down, VerticalAlignment::Bottom, None),
            (
                ExpansionDirection::Left,
                VerticalAlignment::Center,
                Some(HorizontalAlignment::Left),
            ),
            (
                ExpansionDirection::Right,
                VerticalAlignment::Center,
                Some(HorizontalAlignment::Right),
            ),
        ];

        for (direction, v, h) in forbidden {
            let h = h.unwrap_or(HorizontalAlignment::Center);
            assert!(context(h, v).check_direction(direction).is_err());
        }

        // A fully centred menu accepts everything.
        let centred = context(HorizontalAlignment::Center, VerticalAlignment::Center);
        for direction in ExpansionDirection::iter() {
            assert!(centred.check_direction(direction).is_ok());
        }
    }
}
