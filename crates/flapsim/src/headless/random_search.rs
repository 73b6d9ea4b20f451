//! Baseline population source: random networks plus the reigning champion
//!
//! Each generation is `population_size - 1` freshly sampled networks and the
//! best network seen so far. The champion is replaced whenever a generation's
//! best candidate outscores it on that generation's pipe layout.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use flapsim_core::evaluator::{Candidate, ControllerId, GenerationReport, PopulationSource};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use serde::{Deserialize, Serialize};

use super::neural::FeedforwardController;

/// Champion network and the fitness it last earned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Champion {
    pub controller: FeedforwardController,
    pub fitness: f32,
    /// Generation the network first became champion
    pub generation: u32,
}

impl Champion {
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize champion to JSON")?;
        std::fs::write(path.as_ref(), json).with_context(|| {
            format!("Failed to write champion: {}", path.as_ref().display())
        })
    }

    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read champion: {}", path.as_ref().display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse champion: {}", path.as_ref().display()))
    }
}

/// Random search over feedforward weights with an elite of one
pub struct RandomSearch {
    rng: Xoshiro256StarStar,
    population_size: usize,
    hidden_dim: usize,
    input_scale: f32,
    champion: Option<Champion>,
    /// Networks proposed for the generation in flight, by id
    pending: HashMap<ControllerId, FeedforwardController>,
}

impl RandomSearch {
    pub fn new(seed: u64, population_size: usize, hidden_dim: usize, input_scale: f32) -> Self {
        Self {
            rng: Xoshiro256StarStar::seed_from_u64(seed),
            population_size,
            hidden_dim,
            input_scale,
            champion: None,
            pending: HashMap::new(),
        }
    }

    pub fn champion(&self) -> Option<&Champion> {
        self.champion.as_ref()
    }
}

impl PopulationSource for RandomSearch {
    fn propose(&mut self, generation: u32) -> Vec<Candidate> {
        self.pending.clear();

        let mut networks = Vec::with_capacity(self.population_size);
        if let Some(champion) = &self.champion {
            networks.push(champion.controller.clone());
        }
        while networks.len() < self.population_size {
            networks.push(FeedforwardController::random(
                &mut self.rng,
                self.hidden_dim,
                self.input_scale,
            ));
        }

        log::debug!(
            "Generation {}: proposing {} networks (champion: {})",
            generation,
            networks.len(),
            self.champion.is_some()
        );

        networks
            .into_iter()
            .map(|network| {
                let id = ControllerId::next();
                self.pending.insert(id, network.clone());
                Candidate::with_id(id, Box::new(network))
            })
            .collect()
    }

    fn absorb(&mut self, report: GenerationReport) {
        let pending = std::mem::take(&mut self.pending);

        let Some(best) = report.best() else {
            return;
        };
        let Some(network) = pending.get(&best.id) else {
            log::warn!("Best candidate {} was not proposed by this source", best.id);
            return;
        };

        // The champion competes on the same layout, so this generation's best
        // is at least as good as the champion was here
        let generation = match &self.champion {
            Some(champion) if champion.controller == *network => champion.generation,
            _ => {
                log::debug!(
                    "Generation {}: new champion {} with fitness {:.2}",
                    report.generation,
                    best.id,
                    best.fitness
                );
                report.generation
            }
        };

        self.champion = Some(Champion {
            controller: network.clone(),
            fitness: best.fitness,
            generation,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flapsim_core::evaluator::evaluate_generation;
    use flapsim_core::SimConfig;

    fn quick_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.run.max_ticks = Some(400);
        config
    }

    #[test]
    fn test_propose_population_size() {
        let mut search = RandomSearch::new(1, 12, 4, 1.0 / 800.0);
        let population = search.propose(0);
        assert_eq!(population.len(), 12);
        assert!(search.champion().is_none());
    }

    #[test]
    fn test_champion_carried_into_next_generation() {
        let config = quick_config();
        let mut search = RandomSearch::new(5, 10, 4, 1.0 / 800.0);

        let summary = evaluate_generation(&mut search, &config, 0).unwrap();
        let champion = search.champion().cloned().expect("champion after first generation");
        assert_eq!(champion.fitness, summary.best_fitness);
        assert_eq!(champion.generation, 0);

        let population = search.propose(1);
        assert_eq!(population.len(), 10);
        // The champion is always proposed first
        assert!(search.pending.get(&population[0].id) == Some(&champion.controller));
    }

    #[test]
    fn test_champion_never_gets_worse_within_a_layout() {
        let config = quick_config();
        let mut search = RandomSearch::new(9, 8, 4, 1.0 / 800.0);

        // Same generation index means the same pipe layout
        evaluate_generation(&mut search, &config, 0).unwrap();
        let first = search.champion().map(|c| c.fitness).unwrap();
        evaluate_generation(&mut search, &config, 0).unwrap();
        let second = search.champion().map(|c| c.fitness).unwrap();
        assert!(second >= first);
    }

    #[test]
    fn test_champion_json_file() {
        let mut search = RandomSearch::new(2, 4, 3, 1.0 / 800.0);
        evaluate_generation(&mut search, &quick_config(), 0).unwrap();
        let champion = search.champion().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best_controller.json");
        champion.save_json(&path).unwrap();

        let loaded = Champion::from_json(&path).unwrap();
        assert_eq!(loaded.controller, champion.controller);
        assert_eq!(loaded.fitness, champion.fitness);
    }

    #[test]
    fn test_same_seed_same_proposals() {
        let mut a = RandomSearch::new(4, 5, 3, 1.0);
        let mut b = RandomSearch::new(4, 5, 3, 1.0);
        a.propose(0);
        b.propose(0);

        let mut left: Vec<_> = a.pending.values().cloned().collect();
        let mut right: Vec<_> = b.pending.values().cloned().collect();
        let key = |c: &FeedforwardController| c.weights()[0];
        left.sort_by(|x, y| key(x).total_cmp(&key(y)));
        right.sort_by(|x, y| key(x).total_cmp(&key(y)));
        assert_eq!(left, right);
    }
}
