//! Entrance animation planning.
//!
//! The submenu only describes where each button travels and how; driving the
//! frames is left to the host's animation loop.

use super::ENTRANCE_DURATION;
use super::button::{ButtonId, FloatingActionButton};
use super::geometry::LayoutGeometry;
use crate::gui::units::{Point, Rect, Size};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Easing {
    Linear,
    /// Drops onto the target and bounces three times before settling.
    #[default]
    Bounce,
}

impl Easing {
    /// Apply the easing curve to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::Bounce => bounce_ease(t),
        }
    }
}

fn bounce_ease(t: f64) -> f64 {
    fn bounce(t: f64) -> f64 {
        t * t * 8.0
    }

    let t = t * 1.1226;
    if t < 0.3535 {
        bounce(t)
    } else if t < 0.7408 {
        bounce(t - 0.54719) + 0.7
    } else if t < 0.9644 {
        bounce(t - 0.8526) + 0.9
    } else {
        bounce(t - 1.0435) + 0.95
    }
}

/// Motion of one button from the trigger's pivot to its laid-out centre.
///
/// Both axes run in parallel with the same duration and easing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntranceAnimation {
    pub index: usize,
    /// Button that was at `index` when the animation was planned.
    pub button: ButtonId,
    /// Expansion cycle this animation belongs to; stale cycles are not committed.
    pub cycle: u64,
    pub from: Point,
    pub to: Point,
    pub size: Size,
    pub duration: Duration,
    pub easing: Easing,
}

impl EntranceAnimation {
    /// Centre of the button at `progress` (0.0 to 1.0). The end point is exact.
    pub fn sample(&self, progress: f64) -> Point {
        if progress >= 1.0 {
            return self.to;
        }
        let eased = self.easing.apply(progress.max(0.0));
        self.from.lerp(self.to, eased)
    }

    pub fn sample_at(&self, elapsed: Duration) -> Point {
        if self.duration.is_zero() {
            return self.to;
        }
        self.sample(elapsed.as_secs_f64() / self.duration.as_secs_f64())
    }

    /// Where the button rests once the animation has finished.
    pub fn resting_rect(&self) -> Rect {
        Rect::centered_on(self.to, self.size)
    }
}

/// One-shot guard shared by every button of a submenu.
///
/// It fires once per expansion cycle; re-arming starts a new cycle so that
/// animations planned before a collapse can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntranceLatch {
    launched: bool,
    cycle: u64,
}

impl EntranceLatch {
    pub fn is_launched(&self) -> bool {
        self.launched
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn try_launch(&mut self) -> Option<u64> {
        if self.launched {
            return None;
        }
        self.launched = true;
        Some(self.cycle)
    }

    pub fn rearm(&mut self) {
        self.launched = false;
        self.cycle += 1;
    }

    pub fn is_current(&self, cycle: u64) -> bool {
        self.launched && self.cycle == cycle
    }
}

pub fn plan_entrance(
    pivot: Point,
    geometry: &LayoutGeometry,
    buttons: &[FloatingActionButton],
    cycle: u64,
) -> Vec<EntranceAnimation> {
    geometry
        .visible()
        .filter_map(|(index, rect)| Some((index, rect, buttons.get(index)?)))
        .map(|(index, rect, button)| EntranceAnimation {
            index,
            button: button.id().clone(),
            cycle,
            from: pivot,
            to: rect.center(),
            size: rect.size(),
            duration: ENTRANCE_DURATION,
            easing: Easing::Bounce,
        })
        .collect()
}
