//! Bird kinematics - fixed-tick jump/fall curve and derived tilt

use super::Bird;
use crate::config::BirdConfig;

/// Stateless integrator for bird motion
///
/// Displacement is a closed-form function of ticks since the last jump,
/// not an integrated velocity, so the curve is identical regardless of
/// how long the bird has been in the air before jumping.
pub struct BirdPhysics;

impl BirdPhysics {
    /// Vertical displacement `t` ticks after a jump with velocity `velocity`
    pub fn displacement(config: &BirdConfig, velocity: f32, ticks: u32) -> f32 {
        let t = ticks as f32;
        let mut d = velocity * t + config.gravity * t * t;

        // Terminal velocity
        if d >= config.terminal_displacement {
            d = config.terminal_displacement;
        }

        if d < 0.0 {
            d -= config.upward_bias;
        }

        d
    }

    /// Advance one tick, returning the displacement applied
    pub fn step(bird: &mut Bird, config: &BirdConfig) -> f32 {
        bird.tick_count = bird.tick_count.saturating_add(1);

        let d = Self::displacement(config, bird.velocity, bird.tick_count);
        bird.position.y += d;

        if d < 0.0 || bird.position.y < bird.jump_origin_y + config.tilt_hold_margin {
            if bird.tilt < config.max_tilt {
                bird.tilt = config.max_tilt;
            }
        } else if bird.tilt > config.min_tilt {
            bird.tilt = (bird.tilt - config.tilt_rate).max(config.min_tilt);
        }

        d
    }

    /// Start a new jump from the current height
    pub fn jump(bird: &mut Bird, config: &BirdConfig) {
        bird.velocity = config.jump_velocity;
        bird.tick_count = 0;
        bird.jump_origin_y = bird.position.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bird() -> (Bird, BirdConfig) {
        let config = BirdConfig::default();
        (Bird::new(&config, 0), config)
    }

    #[test]
    fn test_free_fall_is_monotonic_and_capped() {
        let (mut bird, config) = bird();
        let mut previous = f32::NEG_INFINITY;
        for _ in 0..100 {
            let d = BirdPhysics::step(&mut bird, &config);
            assert!(d >= previous, "displacement decreased: {} < {}", d, previous);
            assert!(d <= 16.0);
            previous = d;
        }
        assert_eq!(previous, 16.0);
    }

    #[test]
    fn test_fall_sequence() {
        let (mut bird, config) = bird();
        let steps: Vec<f32> = (0..5)
            .map(|_| BirdPhysics::step(&mut bird, &config))
            .collect();
        assert_eq!(steps, vec![1.5, 6.0, 13.5, 16.0, 16.0]);
        assert_eq!(bird.position.y, 350.0 + 53.0);
    }

    #[test]
    fn test_jump_arc() {
        let (mut bird, config) = bird();
        BirdPhysics::jump(&mut bird, &config);
        let steps: Vec<f32> = (0..9)
            .map(|_| BirdPhysics::step(&mut bird, &config))
            .collect();
        assert_eq!(
            steps,
            vec![-11.0, -17.0, -20.0, -20.0, -17.0, -11.0, 0.0, 12.0, 16.0]
        );
    }

    #[test]
    fn test_jump_is_idempotent() {
        let (mut once, config) = bird();
        for _ in 0..7 {
            BirdPhysics::step(&mut once, &config);
        }
        let mut twice = once.clone();

        BirdPhysics::jump(&mut once, &config);
        BirdPhysics::jump(&mut twice, &config);
        BirdPhysics::jump(&mut twice, &config);

        assert_eq!(once, twice);
        assert_eq!(once.tick_count, 0);
        assert_eq!(once.jump_origin_y, once.position.y);
    }

    #[test]
    fn test_tilt_pins_upward_while_rising() {
        let (mut bird, config) = bird();
        BirdPhysics::jump(&mut bird, &config);
        BirdPhysics::step(&mut bird, &config);
        assert_eq!(bird.tilt, config.max_tilt);
    }

    #[test]
    fn test_tilt_nose_dives_and_clamps() {
        let (mut bird, config) = bird();
        for _ in 0..50 {
            BirdPhysics::step(&mut bird, &config);
        }
        assert_eq!(bird.tilt, config.min_tilt);
    }

    #[test]
    fn test_tilt_holds_near_jump_origin() {
        let (mut bird, config) = bird();
        // 1.5 + 6 + 13.5 = 21 below origin, still inside the hold margin
        for _ in 0..3 {
            BirdPhysics::step(&mut bird, &config);
        }
        assert_eq!(bird.tilt, config.max_tilt);

        // 16 more per tick: 37, 53 -> leaves the margin on the fifth tick
        BirdPhysics::step(&mut bird, &config);
        assert_eq!(bird.tilt, config.max_tilt);
        BirdPhysics::step(&mut bird, &config);
        assert_eq!(bird.tilt, config.max_tilt - config.tilt_rate);
    }
}
