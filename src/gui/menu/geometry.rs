use super::MenuContext;
use crate::config::{ExpansionDirection, HorizontalAlignment};
use crate::gui::units::{Insets, Point, Rect, Size};
use serde::Serialize;

/// The subset of a submenu style that drives placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryConfig {
    pub direction: ExpansionDirection,
    pub spacing: i32,
    pub radius: i32,
    pub angle_overflow: f64,
    pub padding: Insets,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutGeometry {
    pub size: Size,
    /// One entry per child, `None` for gone children.
    pub placements: Vec<Option<Rect>>,
}

impl LayoutGeometry {
    pub fn visible(&self) -> impl Iterator<Item = (usize, Rect)> + '_ {
        self.placements
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.map(|r| (i, r)))
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }
}

/// Measures and places `children` (`None` = gone) for one layout pass.
pub fn layout(
    config: &GeometryConfig,
    context: &MenuContext,
    children: &[Option<Size>],
) -> LayoutGeometry {
    let visible: Vec<Size> = children.iter().flatten().copied().collect();

    let content = measure(config, context, &visible);
    let padding = config.padding;
    let size = Size::new(
        content.width + padding.horizontal(),
        content.height + padding.vertical(),
    );
    let area = Rect::new(padding.left, padding.top, content.width, content.height);

    let mut rects = arrange(config, context, area, &visible).into_iter();
    let placements = children
        .iter()
        .map(|child| child.and_then(|_| rects.next()))
        .collect();

    LayoutGeometry { size, placements }
}

/// Content size needed by the visible children, padding excluded.
pub fn measure(config: &GeometryConfig, context: &MenuContext, children: &[Size]) -> Size {
    if children.is_empty() {
        return Size::ZERO;
    }

    let gaps = config.spacing * (children.len() as i32 - 1);
    let max_width = children.iter().map(|c| c.width).max().unwrap_or(0);
    let max_height = children.iter().map(|c| c.height).max().unwrap_or(0);
    let trigger = context.trigger_size;

    match config.direction {
        ExpansionDirection::Up | ExpansionDirection::Down => {
            let total: i32 = children.iter().map(|c| c.height).sum();
            Size::new(max_width, total + gaps)
        }
        ExpansionDirection::Left | ExpansionDirection::Right => {
            let total: i32 = children.iter().map(|c| c.width).sum();
            Size::new(total + gaps, max_height)
        }
        ExpansionDirection::Round => Size::new(
            orbit_extent(trigger.width, max_width, config, 2),
            orbit_extent(trigger.height, max_height, config, 2),
        ),
        ExpansionDirection::Fan => {
            let (edge_x, edge_y) = context.is_edge_aligned();
            let sides = |edge: bool| if edge { 1 } else { 2 };
            Size::new(
                orbit_extent(trigger.width, max_width, config, sides(edge_x)),
                orbit_extent(trigger.height, max_height, config, sides(edge_y)),
            )
        }
    }
}

// trigger + sides * (child + spacing + radius), never smaller than the child itself
fn orbit_extent(trigger: i32, child: i32, config: &GeometryConfig, sides: i32) -> i32 {
    let extent = trigger + sides * (child + config.spacing + config.radius);
    extent.max(child)
}

fn arrange(
    config: &GeometryConfig,
    context: &MenuContext,
    area: Rect,
    children: &[Size],
) -> Vec<Rect> {
    let spacing = config.spacing;

    match config.direction {
        ExpansionDirection::Up => {
            let mut next_y = area.bottom();
            children
                .iter()
                .map(|c| {
                    let top = next_y - c.height;
                    next_y = top - spacing;
                    Rect::new(centered(area.left, area.width, c.width), top, c.width, c.height)
                })
                .collect()
        }
        ExpansionDirection::Down => {
            let mut next_y = area.top;
            children
                .iter()
                .map(|c| {
                    let top = next_y;
                    next_y += c.height + spacing;
                    Rect::new(centered(area.left, area.width, c.width), top, c.width, c.height)
                })
                .collect()
        }
        ExpansionDirection::Left => {
            let mut next_x = area.right();
            children
                .iter()
                .map(|c| {
                    let left = next_x - c.width;
                    next_x = left - spacing;
                    Rect::new(left, centered(area.top, area.height, c.height), c.width, c.height)
                })
                .collect()
        }
        ExpansionDirection::Right => {
            let mut next_x = area.left;
            children
                .iter()
                .map(|c| {
                    let left = next_x;
                    next_x += c.width + spacing;
                    Rect::new(left, centered(area.top, area.height, c.height), c.width, c.height)
                })
                .collect()
        }
        ExpansionDirection::Round => {
            let center = area.center();
            let angles = arc_angles(0.0, 360.0 - config.angle_overflow, children.len());
            place_on_arc(center, config.radius, &angles, children)
        }
        ExpansionDirection::Fan => {
            let (start, end) = fan_arc(context.horizontal_alignment, config.angle_overflow);
            let angles = arc_angles(start, end, children.len());
            let pivot = fan_pivot(context, area, largest(children));
            place_on_arc(pivot, config.radius, &angles, children)
        }
    }
}

fn centered(start: i32, available: i32, length: i32) -> i32 {
    start + available / 2 - length / 2
}

/// Start and end angle of a fan, in degrees, for the trigger's horizontal alignment.
pub fn fan_arc(alignment: HorizontalAlignment, overflow: f64) -> (f64, f64) {
    match alignment {
        HorizontalAlignment::Left => (overflow, 90.0 - overflow),
        HorizontalAlignment::Right => (90.0 + overflow, 180.0 - overflow),
        HorizontalAlignment::Center => (overflow, 180.0 - overflow),
    }
}

/// Width and height of the widest and tallest child.
pub fn largest(children: &[Size]) -> Size {
    children.iter().fold(Size::ZERO, |acc, c| {
        Size::new(acc.width.max(c.width), acc.height.max(c.height))
    })
}

/// Centre of the fan, inset from the bottom (and pinned side) edge by half of
/// whichever is larger: the trigger or `largest_child`. Children on the ends of
/// the arc then stay inside the content area.
pub fn fan_pivot(context: &MenuContext, area: Rect, largest_child: Size) -> Point {
    let trigger = context.trigger_size;
    let half_w = trigger.width.max(largest_child.width) as f64 / 2.0;
    let half_h = trigger.height.max(largest_child.height) as f64 / 2.0;
    let x = match context.horizontal_alignment {
        HorizontalAlignment::Left => area.left as f64 + half_w,
        // Mirrors Left instead of pivoting on the right edge itself.
        HorizontalAlignment::Right => area.right() as f64 - half_w,
        HorizontalAlignment::Center => area.left as f64 + area.width as f64 / 2.0,
    };
    Point::new(x, area.bottom() as f64 - half_h)
}

/// Evenly spaced angles (degrees) for `count` children between `start` and `end`.
///
/// A full revolution is split `count` ways so the first and last child do not
/// land on the same spot; a partial arc puts children on both ends.
pub fn arc_angles(start: f64, end: f64, count: usize) -> Vec<f64> {
    let span = (end - start).abs();
    let divisor = if span >= 360.0 || count <= 1 {
        count
    } else {
        count - 1
    };
    let step = if divisor == 0 {
        0.0
    } else {
        span / divisor as f64
    };

    (0..count).map(|i| start + step * i as f64).collect()
}

// Counter-clockwise from the positive x axis; screen y grows downward.
fn place_on_arc(center: Point, radius: i32, angles: &[f64], children: &[Size]) -> Vec<Rect> {
    let radius = radius as f64;
    angles
        .iter()
        .zip(children)
        .map(|(angle, size)| {
            let theta = angle.to_radians();
            let point = Point::new(
                center.x + radius * theta.cos(),
                center.y - radius * theta.sin(),
            );
            Rect::centered_on(point, *size)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VerticalAlignment;
    use strum::IntoEnumIterator;

    const TRIGGER: Size = Size::square(62);

    fn config(direction: ExpansionDirection) -> GeometryConfig {
        GeometryConfig {
            direction,
            spacing: 10,
            radius: 100,
            angle_overflow: 0.0,
            padding: Insets::default(),
        }
    }

    fn context(h: HorizontalAlignment, v: VerticalAlignment) -> MenuContext {
        MenuContext::new(h, v, TRIGGER)
    }

    fn centred() -> MenuContext {
        context(HorizontalAlignment::Center, VerticalAlignment::Center)
    }

    fn squares(n: usize, side: i32) -> Vec<Option<Size>> {
        vec![Some(Size::square(side)); n]
    }

    #[test]
    fn test_up_stack_example() {
        let geo = layout(
            &config(ExpansionDirection::Up),
            &centred(),
            &squares(3, 50),
        );

        assert_eq!(geo.size, Size::new(50, 170));
        let rects: Vec<Rect> = geo.visible().map(|(_, r)| r).collect();
        assert_eq!(rects[0], Rect::new(0, 120, 50, 50));
        assert_eq!(rects[1], Rect::new(0, 60, 50, 50));
        assert_eq!(rects[2], Rect::new(0, 0, 50, 50));
    }

    #[test]
    fn test_down_stack_grows_from_top() {
        let children = vec![Some(Size::square(40)), Some(Size::square(60))];
        let geo = layout(&config(ExpansionDirection::Down), &centred(), &children);

        assert_eq!(geo.size, Size::new(60, 110));
        assert_eq!(geo.placements[0], Some(Rect::new(10, 0, 40, 40)));
        assert_eq!(geo.placements[1], Some(Rect::new(0, 50, 60, 60)));
    }

    #[test]
    fn test_horizontal_stacks_are_transposed() {
        let children = vec![Some(Size::square(40)), Some(Size::square(60))];

        let left = layout(&config(ExpansionDirection::Left), &centred(), &children);
        assert_eq!(left.size, Size::new(110, 60));
        assert_eq!(left.placements[0], Some(Rect::new(70, 10, 40, 40)));
        assert_eq!(left.placements[1], Some(Rect::new(0, 0, 60, 60)));

        let right = layout(&config(ExpansionDirection::Right), &centred(), &children);
        assert_eq!(right.placements[0], Some(Rect::new(0, 10, 40, 40)));
        assert_eq!(right.placements[1], Some(Rect::new(50, 0, 60, 60)));
    }

    #[test]
    fn test_linear_stacks_respect_spacing() {
        let children = vec![
            Some(Size::square(30)),
            Some(Size::new(50, 20)),
            Some(Size::square(46)),
            Some(Size::new(20, 62)),
        ];

        for direction in ExpansionDirection::iter().filter(|d| d.is_linear()) {
            let cfg = config(direction);
            let geo = layout(&cfg, &centred(), &children);
            let rects: Vec<Rect> = geo.visible().map(|(_, r)| r).collect();

            for pair in rects.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                assert!(!a.overlaps(&b), "{direction}: {a:?} overlaps {b:?}");
                let gap = match direction {
                    ExpansionDirection::Up => a.top - b.bottom(),
                    ExpansionDirection::Down => b.top - a.bottom(),
                    ExpansionDirection::Left => a.left - b.right(),
                    _ => b.left - a.right(),
                };
                assert_eq!(gap, cfg.spacing, "{direction}");
            }
        }
    }

    #[test]
    fn test_every_direction_contains_its_children() {
        let children = squares(5, 46);
        for direction in ExpansionDirection::iter() {
            for h in HorizontalAlignment::iter() {
                for v in VerticalAlignment::iter() {
                    let mut cfg = config(direction);
                    cfg.angle_overflow = 15.0;
                    let geo = layout(&cfg, &context(h, v), &children);
                    for (i, rect) in geo.visible() {
                        assert!(
                            geo.bounds().contains(&rect),
                            "{direction} {h}/{v}: child {i} {rect:?} outside {:?}",
                            geo.size
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_fan_contains_children_larger_than_trigger() {
        let children = squares(3, 62);
        for h in HorizontalAlignment::iter() {
            for v in VerticalAlignment::iter() {
                let ctx = MenuContext::new(h, v, Size::square(46));
                let geo = layout(&config(ExpansionDirection::Fan), &ctx, &children);
                for (i, rect) in geo.visible() {
                    assert!(
                        geo.bounds().contains(&rect),
                        "fan {h}/{v}: child {i} {rect:?} outside {:?}",
                        geo.size
                    );
                }
            }
        }

        let ctx = MenuContext::new(
            HorizontalAlignment::Center,
            VerticalAlignment::Bottom,
            Size::square(46),
        );
        let geo = layout(&config(ExpansionDirection::Fan), &ctx, &children);
        assert_eq!(
            fan_pivot(&ctx, geo.bounds(), Size::square(62)).y,
            geo.size.height as f64 - 31.0
        );
    }

    #[test]
    fn test_largest_child_takes_each_axis_separately() {
        let children = [Size::new(40, 10), Size::new(20, 30)];
        assert_eq!(largest(&children), Size::new(40, 30));
        assert_eq!(largest(&[]), Size::ZERO);
    }

    #[test]
    fn test_gone_children_take_no_space() {
        let children = vec![Some(Size::square(50)), None, Some(Size::square(50))];
        let geo = layout(&config(ExpansionDirection::Up), &centred(), &children);

        assert_eq!(geo.size, Size::new(50, 110));
        assert_eq!(geo.placements[1], None);
        assert_eq!(geo.placements[0], Some(Rect::new(0, 60, 50, 50)));
        assert_eq!(geo.placements[2], Some(Rect::new(0, 0, 50, 50)));
    }

    #[test]
    fn test_no_children_is_bounded_by_padding() {
        let mut cfg = config(ExpansionDirection::Round);
        cfg.padding = Insets::uniform(4);
        for direction in ExpansionDirection::iter() {
            cfg.direction = direction;
            let geo = layout(&cfg, &centred(), &[None, None]);
            assert_eq!(geo.size, Size::new(8, 8));
            assert!(geo.placements.iter().all(Option::is_none));
        }
    }

    #[test]
    fn test_padding_offsets_content() {
        let mut cfg = config(ExpansionDirection::Down);
        cfg.padding = Insets {
            left: 5,
            top: 7,
            right: 1,
            bottom: 2,
        };
        let geo = layout(&cfg, &centred(), &squares(1, 20));
        assert_eq!(geo.size, Size::new(26, 29));
        assert_eq!(geo.placements[0], Some(Rect::new(5, 7, 20, 20)));
    }

    #[test]
    fn test_arc_divisor_edge_cases() {
        assert!(arc_angles(0.0, 360.0, 0).is_empty());
        assert_eq!(arc_angles(10.0, 170.0, 1), vec![10.0]);
        assert_eq!(arc_angles(0.0, 360.0, 4), vec![0.0, 90.0, 180.0, 270.0]);
        assert_eq!(arc_angles(0.0, 300.0, 3), vec![0.0, 150.0, 300.0]);
    }

    #[test]
    fn test_fan_center_example() {
        let (start, end) = fan_arc(HorizontalAlignment::Center, 10.0);
        assert_eq!((start, end), (10.0, 170.0));
        assert_eq!(arc_angles(start, end, 2), vec![10.0, 170.0]);

        let mut cfg = config(ExpansionDirection::Fan);
        cfg.angle_overflow = 10.0;
        let ctx = context(HorizontalAlignment::Center, VerticalAlignment::Bottom);
        let geo = layout(&cfg, &ctx, &squares(2, 46));

        // 2 * (46 + 10 + 100) + 62 wide, single side tall
        assert_eq!(geo.size, Size::new(374, 218));
        let pivot = fan_pivot(&ctx, geo.bounds(), Size::square(46));
        assert_eq!(pivot, Point::new(187.0, 187.0));

        let first = geo.placements[0].unwrap().center();
        let second = geo.placements[1].unwrap().center();
        assert!(first.x > pivot.x && second.x < pivot.x);
        assert!(first.y < pivot.y && (first.y - second.y).abs() < 1.0);
        assert!((first.distance(pivot) - 100.0).abs() < 1.5);
    }

    #[test]
    fn test_fan_side_arcs() {
        assert_eq!(fan_arc(HorizontalAlignment::Left, 5.0), (5.0, 85.0));
        assert_eq!(fan_arc(HorizontalAlignment::Right, 5.0), (95.0, 175.0));

        let ctx = context(HorizontalAlignment::Right, VerticalAlignment::Bottom);
        let geo = layout(&config(ExpansionDirection::Fan), &ctx, &squares(3, 46));
        let pivot = fan_pivot(&ctx, geo.bounds(), Size::square(46));
        assert_eq!(pivot.x, geo.size.width as f64 - 31.0);
        for (_, rect) in geo.visible() {
            assert!(rect.center().x <= pivot.x + 0.5);
        }
    }

    #[test]
    fn test_round_single_child_sits_at_zero_degrees() {
        let geo = layout(&config(ExpansionDirection::Round), &centred(), &squares(1, 46));
        // 62 + 2 * (46 + 10 + 100)
        assert_eq!(geo.size, Size::square(374));
        assert_eq!(geo.placements[0].unwrap().center(), Point::new(287.0, 187.0));
    }

    #[test]
    fn test_round_full_circle_has_no_coincident_children() {
        let geo = layout(&config(ExpansionDirection::Round), &centred(), &squares(6, 20));
        let rects: Vec<Rect> = geo.visible().map(|(_, r)| r).collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.overlaps(b));
            }
        }
    }
}
