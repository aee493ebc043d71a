//! Keyboard stand-in for the tuning panel.
//!
//! Each tunable owns a pair of keys and a panel range. Clamping happens here;
//! simulators accept whatever they are given.

use tidepool_engine::input::Key;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
}

/// Panel range of one tunable plus its key pair.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Control {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub up: Key,
    pub down: Key,
}

impl Control {
    pub const fn new(name: &'static str, min: f32, max: f32, step: f32, up: Key, down: Key) -> Self {
        Self {
            name,
            min,
            max,
            step,
            up,
            down,
        }
    }

    pub fn direction(&self, key: Key) -> Option<Direction> {
        if key == self.up {
            Some(Direction::Up)
        } else if key == self.down {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// Moves `value` one step in `dir`, clamped to the panel range.
    pub fn nudged(&self, value: f32, dir: Direction) -> f32 {
        let delta = match dir {
            Direction::Up => self.step,
            Direction::Down => -self.step,
        };
        (value + delta).clamp(self.min, self.max)
    }

    /// Applies `key` to `value` if it belongs to this control.
    ///
    /// Returns whether the key was consumed.
    pub fn apply(&self, key: Key, value: &mut f32) -> bool {
        let Some(dir) = self.direction(key) else {
            return false;
        };

        let next = self.nudged(*value, dir);
        if next != *value {
            log::info!("{}: {:.4} -> {:.4}", self.name, *value, next);
            *value = next;
        }
        true
    }
}

pub const TIME_STEP: Control = Control::new("time step", 0.1, 2.0, 0.1, Key::Q, Key::A);
pub const DAMPING: Control = Control::new("damping", 0.0, 0.01, 0.0005, Key::W, Key::S);
pub const PRESSURE_DAMPING: Control =
    Control::new("pressure damping", 0.9, 0.999, 0.003, Key::E, Key::D);
pub const SURFACE_WIDTH: Control = Control::new("surface width", 1.0, 20.0, 0.1, Key::Z, Key::X);
pub const SURFACE_HEIGHT: Control = Control::new("surface height", 1.0, 20.0, 0.1, Key::C, Key::V);

pub const FADE: Control = Control::new("fade", 0.8, 0.999, 0.003, Key::R, Key::F);
pub const INFLUENCE_SIZE: Control = Control::new("influence size", 0.01, 0.2, 0.01, Key::T, Key::G);
pub const THRESHOLD: Control = Control::new("threshold", 0.0, 1.0, 0.05, Key::Y, Key::H);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_and_down_move_one_step() {
        let mut v = 1.0;
        assert!(TIME_STEP.apply(Key::Q, &mut v));
        assert!((v - 1.1).abs() < 1e-6);
        assert!(TIME_STEP.apply(Key::A, &mut v));
        assert!((v - 1.0).abs() < 1e-6);
    }

    #[test]
    fn nudges_stop_at_panel_range() {
        let mut fade = 0.998;
        FADE.apply(Key::R, &mut fade);
        assert_eq!(fade, 0.999);

        let mut damping = 0.0;
        DAMPING.apply(Key::S, &mut damping);
        assert_eq!(damping, 0.0);
    }

    #[test]
    fn foreign_keys_are_not_consumed() {
        let mut v = 0.05;
        assert!(!INFLUENCE_SIZE.apply(Key::Q, &mut v));
        assert_eq!(v, 0.05);
    }

    #[test]
    fn key_pairs_do_not_overlap() {
        let all = [
            TIME_STEP,
            DAMPING,
            PRESSURE_DAMPING,
            SURFACE_WIDTH,
            SURFACE_HEIGHT,
            FADE,
            INFLUENCE_SIZE,
            THRESHOLD,
        ];
        let mut keys: Vec<Key> = all.iter().flat_map(|c| [c.up, c.down]).collect();
        let n = keys.len();
        keys.sort_by_key(|k| format!("{k:?}"));
        keys.dedup();
        assert_eq!(keys.len(), n);
        assert!(!keys.contains(&Key::Escape));
    }
}
