//! Simulation parameters
//!
//! Every value that shapes difficulty lives here: field geometry, bird
//! kinematics, pipe layout, scoring weights and run budgets. Changing them
//! changes the fitness landscape but never the tick algorithm.
//!
//! All structs use `#[serde(default)]` so partial RON/env overrides only need
//! to mention the keys they change.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected configuration, reported before the first tick runs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("pipe gap spans {top}..{bottom}, which leaves the playable band 0..{ground_y}")]
    GapOutOfField { top: f64, bottom: f64, ground_y: f64 },

    #[error("{field} budget of zero would end the generation before it starts")]
    ZeroBudget { field: &'static str },

    #[error("{field} sprite {width}x{height} exceeds {max} pixels")]
    SpriteTooLarge {
        field: &'static str,
        width: u32,
        height: u32,
        max: u32,
    },

    #[error("run.tick_rate {value} gives a tick interval that cannot be represented")]
    TickRateOutOfRange { value: f64 },

    #[error("pipes spawn at x={spawn_x}, not right of the bird's sprite ending at x={bird_right}")]
    SpawnBehindBird { spawn_x: f64, bird_right: f64 },
}

/// Largest sprite mask, in pixels
pub const MAX_SPRITE_PIXELS: u32 = 1 << 24;

/// Complete parameter set for one evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SimConfig {
    pub field: FieldConfig,
    pub bird: BirdConfig,
    pub pipe: PipeConfig,
    pub scoring: ScoringConfig,
    pub run: RunConfig,
}

/// Visible field and its boundaries (pixels, y grows downward)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
    /// Top edge of the ground strip
    pub ground_y: f32,
    /// How far the sprite may sink into the ground strip before it counts as contact
    pub ground_sink_allowance: f32,
    /// How far above y = 0 a bird may climb before it is out of bounds
    pub ceiling_allowance: f32,
    /// Width of one ground segment (two of them loop end to end)
    pub ground_segment_width: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 800.0,
            ground_y: 730.0,
            ground_sink_allowance: 10.0,
            ceiling_allowance: 50.0,
            ground_segment_width: 672.0,
        }
    }
}

/// Bird sprite size and jump/fall kinematics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdConfig {
    pub start_x: f32,
    pub start_y: f32,
    pub width: u32,
    pub height: u32,
    /// Velocity set by a jump (negative = upward)
    pub jump_velocity: f32,
    /// Quadratic coefficient of the displacement curve
    pub gravity: f32,
    /// Maximum downward displacement per tick
    pub terminal_displacement: f32,
    /// Extra upward push added to any negative displacement
    pub upward_bias: f32,
    /// Tilt stays pinned upward until the bird falls this far below its jump origin
    pub tilt_hold_margin: f32,
    /// Degrees
    pub max_tilt: f32,
    /// Degrees per tick while nose-diving
    pub tilt_rate: f32,
    /// Degrees
    pub min_tilt: f32,
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            start_x: 230.0,
            start_y: 350.0,
            width: 68,
            height: 48,
            jump_velocity: -10.5,
            gravity: 1.5,
            terminal_displacement: 16.0,
            upward_bias: 2.0,
            tilt_hold_margin: 50.0,
            max_tilt: 25.0,
            tilt_rate: 20.0,
            min_tilt: -90.0,
        }
    }
}

/// Pipe pair geometry and procedural placement range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeConfig {
    pub width: u32,
    /// Length of each pipe body (top and bottom)
    pub height: u32,
    pub gap_height: f32,
    /// Horizontal scroll per tick, shared by pipes and ground
    pub speed: f32,
    pub gap_center_min: f32,
    pub gap_center_max: f32,
    /// New pipes appear this far past the right edge of the field
    pub spawn_offset: f32,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            width: 104,
            height: 640,
            gap_height: 200.0,
            speed: 5.0,
            gap_center_min: 150.0,
            gap_center_max: 550.0,
            spawn_offset: 100.0,
        }
    }
}

/// Fitness weights and the jump decision threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Added every tick a bird is alive
    pub alive_bonus: f32,
    /// Added to every surviving bird when a pipe is passed
    pub pass_bonus: f32,
    /// Subtracted on pipe or ground contact
    pub collision_penalty: f32,
    /// Controller outputs above this value trigger a jump
    pub jump_threshold: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            alive_bonus: 0.1,
            pass_bonus: 5.0,
            collision_penalty: 1.0,
            jump_threshold: 0.5,
        }
    }
}

/// Pacing, budgets and determinism
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Ticks per second when paced against a wall clock
    pub tick_rate: f32,
    /// Stop the generation after this many ticks
    pub max_ticks: Option<u64>,
    /// Stop the generation once this many pipes have been passed
    pub max_score: Option<u32>,
    /// Base seed for pipe placement (mixed with the generation index)
    pub seed: u64,
    /// Evaluate controllers of one tick on the rayon pool
    pub parallel_decisions: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30.0,
            max_ticks: None,
            max_score: None,
            seed: 0,
            parallel_decisions: false,
        }
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite {
            field,
            value: value as f64,
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            field,
            value: value as f64,
        })
    }
}

fn positive_size(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value: 0.0 })
    }
}

fn sprite(field: &'static str, width: u32, height: u32) -> Result<(), ConfigError> {
    positive_size(field, width)?;
    positive_size(field, height)?;
    match width.checked_mul(height) {
        Some(pixels) if pixels <= MAX_SPRITE_PIXELS => Ok(()),
        _ => Err(ConfigError::SpriteTooLarge {
            field,
            width,
            height,
            max: MAX_SPRITE_PIXELS,
        }),
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange {
            field,
            min: min as f64,
            max: max as f64,
        })
    }
}

impl SimConfig {
    /// Reject degenerate parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = &self.field;
        positive("field.width", field.width)?;
        positive("field.height", field.height)?;
        positive("field.ground_y", field.ground_y)?;
        positive("field.ground_segment_width", field.ground_segment_width)?;
        finite("field.ground_sink_allowance", field.ground_sink_allowance)?;
        finite("field.ceiling_allowance", field.ceiling_allowance)?;
        ordered("field.ground_y", field.ground_y, field.height)?;

        let bird = &self.bird;
        sprite("bird", bird.width, bird.height)?;
        finite("bird.start_x", bird.start_x)?;
        finite("bird.start_y", bird.start_y)?;
        finite("bird.jump_velocity", bird.jump_velocity)?;
        positive("bird.gravity", bird.gravity)?;
        positive("bird.terminal_displacement", bird.terminal_displacement)?;
        finite("bird.upward_bias", bird.upward_bias)?;
        finite("bird.tilt_hold_margin", bird.tilt_hold_margin)?;
        finite("bird.tilt_rate", bird.tilt_rate)?;
        finite("bird.max_tilt", bird.max_tilt)?;
        finite("bird.min_tilt", bird.min_tilt)?;
        ordered("bird.tilt", bird.min_tilt, bird.max_tilt)?;

        let pipe = &self.pipe;
        sprite("pipe", pipe.width, pipe.height)?;
        positive("pipe.gap_height", pipe.gap_height)?;
        positive("pipe.speed", pipe.speed)?;
        finite("pipe.spawn_offset", pipe.spawn_offset)?;
        finite("pipe.gap_center_min", pipe.gap_center_min)?;
        finite("pipe.gap_center_max", pipe.gap_center_max)?;
        ordered("pipe.gap_center", pipe.gap_center_min, pipe.gap_center_max)?;

        let half_gap = pipe.gap_height / 2.0;
        let top = pipe.gap_center_min - half_gap;
        let bottom = pipe.gap_center_max + half_gap;
        if top < 0.0 || bottom > field.ground_y {
            return Err(ConfigError::GapOutOfField {
                top: top as f64,
                bottom: bottom as f64,
                ground_y: field.ground_y as f64,
            });
        }

        // A pipe spawned at or behind the bird is never seen coming
        let spawn_x = field.width + pipe.spawn_offset;
        let bird_right = bird.start_x + bird.width as f32;
        if spawn_x <= bird_right {
            return Err(ConfigError::SpawnBehindBird {
                spawn_x: spawn_x as f64,
                bird_right: bird_right as f64,
            });
        }

        let scoring = &self.scoring;
        finite("scoring.alive_bonus", scoring.alive_bonus)?;
        finite("scoring.pass_bonus", scoring.pass_bonus)?;
        finite("scoring.collision_penalty", scoring.collision_penalty)?;
        finite("scoring.jump_threshold", scoring.jump_threshold)?;

        let run = &self.run;
        positive("run.tick_rate", run.tick_rate)?;
        self.tick_interval()?;
        if run.max_ticks == Some(0) {
            return Err(ConfigError::ZeroBudget {
                field: "run.max_ticks",
            });
        }
        if run.max_score == Some(0) {
            return Err(ConfigError::ZeroBudget {
                field: "run.max_score",
            });
        }

        Ok(())
    }

    /// Duration of one tick when paced in real time
    pub fn tick_interval(&self) -> Result<std::time::Duration, ConfigError> {
        std::time::Duration::try_from_secs_f32(1.0 / self.run.tick_rate).map_err(|_| {
            ConfigError::TickRateOutOfRange {
                value: self.run.tick_rate as f64,
            }
        })
    }
}
