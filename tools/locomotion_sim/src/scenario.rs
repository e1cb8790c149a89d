use clap::ValueEnum;
use glam::Vec3;

/// Scripted input of a simulation run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Walk forward, then veer to the right for the second half.
    Walk,
    /// Walk into the tunnel crouched and release crouch halfway through it.
    Crouch,
    /// Walk forward and jump once.
    Jump,
}

/// The intents passed to the controller for a single tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Input {
    pub movement: Vec3,
    pub crouch: bool,
    pub jump: bool,
}

impl Scenario {
    pub fn input(self, tick: u32, ticks: u32) -> Input {
        let half = ticks / 2;

        match self {
            Self::Walk => Input {
                movement: if tick < half {
                    Vec3::Z
                } else {
                    Vec3::new(1.0, 0.0, 1.0)
                },
                crouch: false,
                jump: false,
            },
            Self::Crouch => Input {
                movement: Vec3::Z,
                crouch: tick < half,
                jump: false,
            },
            Self::Jump => Input {
                movement: Vec3::Z,
                crouch: false,
                jump: tick == JUMP_TICK,
            },
        }
    }
}

const JUMP_TICK: u32 = 30;

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::{Scenario, JUMP_TICK};

    #[test]
    fn walk_veers_right_in_second_half() {
        assert_eq!(Scenario::Walk.input(0, 100).movement, Vec3::Z);
        assert_eq!(
            Scenario::Walk.input(50, 100).movement,
            Vec3::new(1.0, 0.0, 1.0)
        );
    }

    #[test]
    fn crouch_released_halfway() {
        assert!(Scenario::Crouch.input(49, 100).crouch);
        assert!(!Scenario::Crouch.input(50, 100).crouch);
    }

    #[test]
    fn jump_once() {
        let jumps = (0..100)
            .filter(|tick| Scenario::Jump.input(*tick, 100).jump)
            .count();

        assert_eq!(jumps, 1);
        assert!(Scenario::Jump.input(JUMP_TICK, 100).jump);
    }
}
