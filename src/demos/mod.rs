// Demo scenarios
//
// Headless simulations built on the physics engine:
// - N-body gravity between regular polygons
// - Damped springs pulling a row of balls back to their anchors
// - A self-playing space invaders round using destructive collisions
// - A spinning star bouncing off the window walls
// - Stars falling under gravity onto a springy floor
// - Pacman eating pellets on a wraparound playfield

pub mod bounce;
pub mod bounds;
pub mod damping;
pub mod gravity;
pub mod invaders;
pub mod nbodies;
pub mod pacman;

pub use bounce::Bounce;
pub use bounds::{reflect_off_walls, wrap_around};
pub use damping::Damping;
pub use gravity::FallingStars;
pub use invaders::{Invaders, Outcome, Role};
pub use nbodies::NBodies;
pub use pacman::{Eat, Heading, Pacman};

use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

use crate::core::{Rgb, Vector};
use crate::engine::physics::{PhysicsError, Scene};

/// Size of the simulated playfield, origin at the bottom left
pub const WINDOW: Vector = Vector::new(1000.0, 500.0);

/// Center of the playfield
pub const CENTER: Vector = Vector::new(500.0, 250.0);

/// A self-running simulation
pub trait Demo {
    fn name(&self) -> &'static str;

    fn scene(&self) -> &Scene;

    /// Run one tick of `dt` seconds; `Ok(false)` once the demo is over
    fn step(&mut self, dt: f64) -> Result<bool, PhysicsError>;
}

/// Scenario names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    NBodies,
    Damping,
    Invaders,
    Bounce,
    Gravity,
    Pacman,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown scenario '{0}', expected one of: nbodies, damping, invaders, bounce, gravity, pacman")]
pub struct UnknownScenario(pub String);

impl Scenario {
    pub const ALL: [Scenario; 6] = [
        Scenario::NBodies,
        Scenario::Damping,
        Scenario::Invaders,
        Scenario::Bounce,
        Scenario::Gravity,
        Scenario::Pacman,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::NBodies => "nbodies",
            Scenario::Damping => "damping",
            Scenario::Invaders => "invaders",
            Scenario::Bounce => "bounce",
            Scenario::Gravity => "gravity",
            Scenario::Pacman => "pacman",
        }
    }

    /// Set up the scenario with its default parameters
    pub fn build(self) -> Result<Box<dyn Demo>, PhysicsError> {
        Ok(match self {
            Scenario::NBodies => Box::new(NBodies::new(nbodies::NUM_BODIES)?),
            Scenario::Damping => Box::new(Damping::new(damping::NUM_BALLS)?),
            Scenario::Invaders => Box::new(Invaders::new()?),
            Scenario::Bounce => Box::new(Bounce::new()?),
            Scenario::Gravity => Box::new(FallingStars::new()?),
            Scenario::Pacman => Box::new(Pacman::new()?),
        })
    }
}

impl FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownScenario(s.to_string()))
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Evenly spread, fully saturated color for item `index` of `count`
pub fn palette(index: usize, count: usize) -> Rgb {
    let hue = index as f32 / count.max(1) as f32;
    let channel = |offset: f32| 0.5 + 0.5 * (TAU * (hue + offset)).cos();
    Rgb::new(channel(0.0), channel(1.0 / 3.0), channel(2.0 / 3.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scenario() {
        assert_eq!("nbodies".parse::<Scenario>(), Ok(Scenario::NBodies));
        assert_eq!("Damping".parse::<Scenario>(), Ok(Scenario::Damping));
        assert_eq!("invaders".parse::<Scenario>(), Ok(Scenario::Invaders));
        assert_eq!("PACMAN".parse::<Scenario>(), Ok(Scenario::Pacman));
        assert_eq!("gravity".parse::<Scenario>(), Ok(Scenario::Gravity));
        assert_eq!(
            "pong".parse::<Scenario>(),
            Err(UnknownScenario("pong".to_string()))
        );
    }

    #[test]
    fn test_scenario_names_round_trip() {
        for scenario in Scenario::ALL {
            assert_eq!(scenario.to_string().parse::<Scenario>(), Ok(scenario));
        }
    }

    #[test]
    fn test_every_scenario_builds() {
        for scenario in Scenario::ALL {
            let demo = scenario.build().unwrap();
            assert_eq!(demo.name(), scenario.name());
            assert!(!demo.scene().is_empty());
        }
    }

    #[test]
    fn test_palette_in_range() {
        for i in 0..10 {
            let [r, g, b] = palette(i, 10).to_array();
            for channel in [r, g, b] {
                assert!((0.0..=1.0).contains(&channel));
            }
        }
        assert_ne!(palette(0, 3), palette(1, 3));
    }
}
