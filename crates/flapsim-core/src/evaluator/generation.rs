//! One generation of the population, advanced tick by tick
//!
//! Birds, their controllers and their fitness accumulators live in three
//! parallel vectors. Removals are collected during a tick and applied to all
//! three at once at the end, so index `i` always names the same bird.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::controller::{Candidate, Controller, ControllerId, Observation};
use super::snapshot::{BirdView, GroundView, PipeView, Snapshot};
use crate::collision::{CollisionDetector, DeathCause};
use crate::config::{ConfigError, SimConfig};
use crate::entity::{Bird, BirdPhysics};
use crate::world::{Ground, Pipe, PipeSpawner};

/// Lifecycle of a generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationPhase {
    Running,
    /// Every bird has been removed
    Extinct,
    /// Tick or score budget reached with birds still flying
    BudgetExhausted,
}

impl GenerationPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GenerationPhase::Running)
    }
}

/// Final result for one candidate
pub struct Evaluation {
    pub id: ControllerId,
    pub controller: Box<dyn Controller>,
    pub fitness: f32,
    /// Ticks survived, including the tick of death
    pub ticks_alive: u64,
    /// `None` for birds still flying when the budget ran out
    pub cause: Option<DeathCause>,
    /// Position in the population the generation started with
    pub slot: usize,
}

impl std::fmt::Debug for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluation")
            .field("id", &self.id)
            .field("fitness", &self.fitness)
            .field("ticks_alive", &self.ticks_alive)
            .field("cause", &self.cause)
            .field("slot", &self.slot)
            .finish()
    }
}

/// Everything the population source gets back from a generation
#[derive(Debug)]
pub struct GenerationReport {
    pub generation: u32,
    pub phase: GenerationPhase,
    pub ticks: u64,
    pub score: u32,
    pub pipes_spawned: u32,
    /// One entry per candidate, in proposal order
    pub evaluations: Vec<Evaluation>,
}

impl GenerationReport {
    pub fn best(&self) -> Option<&Evaluation> {
        self.evaluations
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
    }

    pub fn mean_fitness(&self) -> f32 {
        if self.evaluations.is_empty() {
            return 0.0;
        }
        self.evaluations.iter().map(|e| e.fitness).sum::<f32>() / self.evaluations.len() as f32
    }

    /// `(id, fitness)` pairs in proposal order
    pub fn fitness_by_id(&self) -> Vec<(ControllerId, f32)> {
        self.evaluations.iter().map(|e| (e.id, e.fitness)).collect()
    }
}

/// Drives one generation from its candidates to a terminal phase
pub struct PopulationEvaluator {
    config: SimConfig,
    generation: u32,
    phase: GenerationPhase,
    tick: u64,
    score: u32,
    pipes_spawned: u32,

    birds: Vec<Bird>,
    candidates: Vec<Candidate>,
    fitness: Vec<f32>,

    pipes: Vec<Pipe>,
    ground: Ground,
    spawner: PipeSpawner,
    detector: CollisionDetector,
    rng: Xoshiro256StarStar,

    retired: Vec<Evaluation>,
}

/// Seed for a generation's pipe sequence
fn generation_seed(seed: u64, generation: u32) -> u64 {
    seed ^ (generation as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

impl PopulationEvaluator {
    /// Validate `config` and place the population at the start line
    pub fn new(
        config: SimConfig,
        generation: u32,
        population: Vec<Candidate>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let birds: Vec<Bird> = (0..population.len())
            .map(|slot| Bird::new(&config.bird, slot))
            .collect();
        let fitness = vec![0.0; population.len()];

        let spawner = PipeSpawner::new(&config.pipe, &config.field);
        let mut rng = Xoshiro256StarStar::seed_from_u64(generation_seed(config.run.seed, generation));
        let first_pipe = spawner.spawn(&mut rng);

        let phase = if population.is_empty() {
            GenerationPhase::Extinct
        } else {
            GenerationPhase::Running
        };

        log::debug!(
            "Generation {}: {} birds, first gap at y={:.1}",
            generation,
            population.len(),
            first_pipe.gap_center_y
        );

        Ok(Self {
            ground: Ground::new(config.field.ground_y, config.field.ground_segment_width),
            detector: CollisionDetector::new(&config.bird, &config.pipe),
            config,
            generation,
            phase,
            tick: 0,
            score: 0,
            pipes_spawned: 1,
            birds,
            candidates: population,
            fitness,
            pipes: vec![first_pipe],
            spawner,
            rng,
            retired: Vec::new(),
        })
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn pipes_spawned(&self) -> u32 {
        self.pipes_spawned
    }

    pub fn live_count(&self) -> usize {
        self.birds.len()
    }

    pub fn birds(&self) -> &[Bird] {
        &self.birds
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn ground(&self) -> &Ground {
        &self.ground
    }

    /// Running fitness of the live birds, index-aligned with `birds()`
    pub fn fitness(&self) -> &[f32] {
        &self.fitness
    }

    /// Ids of the live birds' controllers, index-aligned with `birds()`
    pub fn live_ids(&self) -> Vec<ControllerId> {
        self.candidates.iter().map(|c| c.id).collect()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Largest x among live birds
    fn lead_x(&self) -> Option<f32> {
        self.birds.iter().map(Bird::x).reduce(f32::max)
    }

    /// The first pipe whose trailing edge the lead bird has not crossed
    pub fn reference_pipe(&self) -> Option<&Pipe> {
        let lead_x = self.lead_x()?;
        self.pipes.iter().find(|pipe| lead_x <= pipe.trailing_edge())
    }

    /// Advance one tick; a no-op once the generation is terminal
    pub fn tick(&mut self) -> GenerationPhase {
        if self.phase.is_terminal() {
            return self.phase;
        }
        self.tick += 1;

        // Gap bounds exposed to controllers this tick
        let (gap_top, gap_bottom) = self
            .reference_pipe()
            .map(|pipe| (pipe.gap_top(), pipe.gap_bottom()))
            .unwrap_or((0.0, self.config.field.ground_y));

        // Physics, then decisions
        let alive_bonus = self.config.scoring.alive_bonus;
        for (bird, fitness) in self.birds.iter_mut().zip(self.fitness.iter_mut()) {
            *fitness += alive_bonus;
            BirdPhysics::step(bird, &self.config.bird);
        }

        let observations: Vec<Observation> = self
            .birds
            .iter()
            .map(|bird| Observation::new(bird.y(), gap_top, gap_bottom))
            .collect();
        let outputs = self.decide(&observations);

        for (index, output) in outputs.into_iter().enumerate() {
            if self.wants_jump(index, output) {
                BirdPhysics::jump(&mut self.birds[index], &self.config.bird);
            }
        }

        // Scroll the world
        self.ground.step(self.config.pipe.speed);
        for pipe in &mut self.pipes {
            self.spawner.step(pipe);
        }

        // Pipe collisions
        let mut doomed: Vec<Option<DeathCause>> = vec![None; self.birds.len()];
        for pipe in &self.pipes {
            for (index, bird) in self.birds.iter().enumerate() {
                if doomed[index].is_none() && self.detector.collides(bird, pipe) {
                    self.fitness[index] -= self.config.scoring.collision_penalty;
                    doomed[index] = Some(DeathCause::Pipe);
                }
            }
        }

        self.update_pipes(&doomed);

        // Ground and ceiling
        for (index, bird) in self.birds.iter().enumerate() {
            if doomed[index].is_some() {
                continue;
            }
            if let Some(cause) =
                self.detector
                    .boundary_contact(bird, &self.config.bird, &self.config.field)
            {
                if cause == DeathCause::Ground {
                    self.fitness[index] -= self.config.scoring.collision_penalty;
                }
                doomed[index] = Some(cause);
            }
        }

        self.apply_removals(doomed);

        self.phase = if self.birds.is_empty() {
            GenerationPhase::Extinct
        } else if self.budget_exhausted() {
            GenerationPhase::BudgetExhausted
        } else {
            GenerationPhase::Running
        };

        if self.phase.is_terminal() {
            log::debug!(
                "Generation {} ended {:?} after {} ticks, score {}",
                self.generation,
                self.phase,
                self.tick,
                self.score
            );
        }

        self.phase
    }

    /// Query every live controller, in parallel when configured
    fn decide(&mut self, observations: &[Observation]) -> Vec<f32> {
        if self.config.run.parallel_decisions {
            self.candidates
                .par_iter_mut()
                .zip(observations.par_iter())
                .map(|(candidate, observation)| candidate.controller.decide(observation))
                .collect()
        } else {
            self.candidates
                .iter_mut()
                .zip(observations)
                .map(|(candidate, observation)| candidate.controller.decide(observation))
                .collect()
        }
    }

    fn wants_jump(&self, index: usize, output: f32) -> bool {
        if !output.is_finite() {
            log::warn!(
                "{} returned non-finite output {}, treating as no jump",
                self.candidates[index].id,
                output
            );
            return false;
        }
        output > self.config.scoring.jump_threshold
    }

    /// Pass detection, scoring, spawning and retirement
    fn update_pipes(&mut self, doomed: &[Option<DeathCause>]) {
        let lead_x = self
            .birds
            .iter()
            .zip(doomed)
            .filter(|(_, cause)| cause.is_none())
            .map(|(bird, _)| bird.x())
            .reduce(f32::max);

        if let Some(lead_x) = lead_x {
            let mut fresh_pass = false;
            for pipe in &mut self.pipes {
                if !pipe.passed && lead_x > pipe.trailing_edge() {
                    pipe.passed = true;
                    fresh_pass = true;
                }
            }

            if fresh_pass {
                self.score += 1;
                let pass_bonus = self.config.scoring.pass_bonus;
                for (fitness, cause) in self.fitness.iter_mut().zip(doomed) {
                    if cause.is_none() {
                        *fitness += pass_bonus;
                    }
                }

                let pipe = self.spawner.spawn(&mut self.rng);
                log::debug!(
                    "Generation {} tick {}: score {}, next gap at y={:.1}",
                    self.generation,
                    self.tick,
                    self.score,
                    pipe.gap_center_y
                );
                self.pipes.push(pipe);
                self.pipes_spawned += 1;
            }
        }

        let spawner = &self.spawner;
        self.pipes.retain(|pipe| !spawner.is_off_field(pipe));
    }

    /// Drop doomed birds from all three parallel vectors, keeping survivor order
    fn apply_removals(&mut self, doomed: Vec<Option<DeathCause>>) {
        if doomed.iter().all(Option::is_none) {
            return;
        }

        let count = self.birds.len();
        let birds = std::mem::take(&mut self.birds);
        let candidates = std::mem::take(&mut self.candidates);
        let fitness = std::mem::take(&mut self.fitness);

        self.birds.reserve(count);
        self.candidates.reserve(count);
        self.fitness.reserve(count);

        for (((mut bird, candidate), fitness), cause) in birds
            .into_iter()
            .zip(candidates)
            .zip(fitness)
            .zip(doomed)
        {
            match cause {
                Some(cause) => {
                    bird.alive = false;
                    log::trace!(
                        "Generation {} tick {}: {} removed ({:?}, fitness {:.2})",
                        self.generation,
                        self.tick,
                        candidate.id,
                        cause,
                        fitness
                    );
                    self.retired.push(Evaluation {
                        id: candidate.id,
                        controller: candidate.controller,
                        fitness,
                        ticks_alive: self.tick,
                        cause: Some(cause),
                        slot: bird.slot,
                    });
                }
                None => {
                    self.birds.push(bird);
                    self.candidates.push(candidate);
                    self.fitness.push(fitness);
                }
            }
        }
    }

    fn budget_exhausted(&self) -> bool {
        let run = &self.config.run;
        run.max_ticks.is_some_and(|max| self.tick >= max)
            || run.max_score.is_some_and(|max| self.score >= max)
    }

    /// Read-only view of the last completed tick
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            generation: self.generation,
            tick: self.tick,
            score: self.score,
            phase: self.phase,
            birds: self
                .birds
                .iter()
                .map(|bird| BirdView {
                    x: bird.x(),
                    y: bird.y(),
                    tilt: bird.tilt,
                })
                .collect(),
            pipes: self
                .pipes
                .iter()
                .map(|pipe| PipeView {
                    x: pipe.x,
                    gap_top: pipe.gap_top(),
                    gap_bottom: pipe.gap_bottom(),
                    passed: pipe.passed,
                })
                .collect(),
            ground: GroundView {
                y: self.ground.y,
                x1: self.ground.x1,
                x2: self.ground.x2,
            },
        }
    }

    /// Tick until terminal, then report
    pub fn run(mut self) -> GenerationReport {
        while !self.tick().is_terminal() {}
        self.finish()
    }

    /// Report every candidate's fitness, survivors included, in proposal order
    pub fn finish(self) -> GenerationReport {
        let ticks = self.tick;
        let mut evaluations = self.retired;
        evaluations.extend(
            self.birds
                .into_iter()
                .zip(self.candidates)
                .zip(self.fitness)
                .map(|((bird, candidate), fitness)| Evaluation {
                    id: candidate.id,
                    controller: candidate.controller,
                    fitness,
                    ticks_alive: ticks,
                    cause: None,
                    slot: bird.slot,
                }),
        );
        evaluations.sort_by_key(|evaluation| evaluation.slot);

        GenerationReport {
            generation: self.generation,
            phase: self.phase,
            ticks,
            score: self.score,
            pipes_spawned: self.pipes_spawned,
            evaluations,
        }
    }
}
