//! Full training runs through the public runner API

use flapsim::config::AppConfig;
use flapsim::headless::{replay, Champion, RandomSearch, TraceWriter, TrainingEnv, TrainingReport};
use flapsim_core::evaluator::Candidate;
use flapsim_core::Snapshot;

fn small_config(output_dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.sim.run.seed = 21;
    config.sim.run.max_ticks = Some(600);
    config.training.generations = 4;
    config.training.population_size = 12;
    config.training.hidden_dim = 4;
    config.training.output_dir = output_dir.to_string_lossy().into_owned();
    config
}

// ============================================================================
// Training loop
// ============================================================================

#[test]
fn test_training_writes_stats_and_champion() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(dir.path());
    let source = RandomSearch::new(
        config.sim.run.seed,
        config.training.population_size,
        config.training.hidden_dim,
        1.0 / config.sim.field.height,
    );

    let mut env = TrainingEnv::new(config.sim, config.training, source).without_progress();
    env.run().unwrap();

    let stats = TrainingReport::from_json(dir.path().join("stats.json")).unwrap();
    assert_eq!(stats.seed, 21);
    assert!(!stats.generations.is_empty());
    assert!(stats.generations.len() <= 4);
    for (index, generation) in stats.generations.iter().enumerate() {
        assert_eq!(generation.generation, index as u32);
        assert_eq!(generation.population, 12);
        assert!(generation.ticks <= 600);
        assert!(generation.best_fitness >= generation.mean_fitness);
    }

    let champion = env.source().champion().cloned().unwrap();
    let path = dir.path().join("best_controller.json");
    champion.save_json(&path).unwrap();
    assert_eq!(Champion::from_json(&path).unwrap().controller, champion.controller);
}

#[test]
fn test_same_seed_same_training_history() {
    let run = || {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config(dir.path());
        let source = RandomSearch::new(3, 8, 4, 1.0 / 800.0);
        let mut env = TrainingEnv::new(config.sim, config.training, source).without_progress();
        env.run().unwrap();
        env.stats_history().to_vec()
    };
    assert_eq!(run(), run());
}

// ============================================================================
// Champion replay
// ============================================================================

#[test]
fn test_champion_replay_matches_its_training_fitness() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(dir.path());
    let source = RandomSearch::new(8, 10, 4, 1.0 / 800.0);
    let mut env = TrainingEnv::new(config.sim, config.training, source).without_progress();
    env.run().unwrap();

    let champion = env.source().champion().cloned().unwrap();
    let last_generation = env.stats_history().len() as u32 - 1;

    // Birds don't interact, so flying alone on the same layout earns the
    // same fitness the champion last earned in its population
    let mut trace = TraceWriter::new(Vec::new());
    let report = replay(
        &env.sim,
        last_generation,
        vec![Candidate::new(champion.controller.clone())],
        Some(&mut trace),
        false,
    )
    .unwrap();
    assert!((report.evaluations[0].fitness - champion.fitness).abs() < 1e-3);

    let text = String::from_utf8(trace.finish().unwrap()).unwrap();
    let first: Snapshot = serde_json::from_str(text.lines().next().unwrap()).unwrap();
    assert_eq!(first.generation, last_generation);
    assert_eq!(first.pipes.len(), 1);
}
