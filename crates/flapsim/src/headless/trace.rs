//! Per-tick snapshot traces
//!
//! A trace is one JSON object per line, one line per tick, so external
//! viewers can replay a generation without linking against the simulation.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use flapsim_core::evaluator::{Candidate, GenerationReport, PopulationEvaluator};
use flapsim_core::{SimConfig, Snapshot};

/// Writes snapshots as JSON lines
pub struct TraceWriter<W: Write> {
    out: W,
    lines: u64,
}

impl TraceWriter<BufWriter<std::fs::File>> {
    /// Create the trace file, including missing parent directories
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create trace file: {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> TraceWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    pub fn write(&mut self, snapshot: &Snapshot) -> Result<()> {
        serde_json::to_writer(&mut self.out, snapshot).context("Failed to serialize snapshot")?;
        self.out
            .write_all(b"\n")
            .context("Failed to write trace line")?;
        self.lines += 1;
        Ok(())
    }

    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush().context("Failed to flush trace")?;
        Ok(self.out)
    }
}

/// Run one generation to completion, optionally tracing and pacing it
///
/// With `realtime` each tick is padded to the configured tick interval, which
/// is how a viewer tailing the trace sees the run at game speed.
pub fn replay<W: Write>(
    config: &SimConfig,
    generation: u32,
    population: Vec<Candidate>,
    mut trace: Option<&mut TraceWriter<W>>,
    realtime: bool,
) -> Result<GenerationReport> {
    let interval = if realtime {
        Some(
            config
                .tick_interval()
                .context("Failed to derive tick interval")?,
        )
    } else {
        None
    };
    let mut eval = PopulationEvaluator::new(config.clone(), generation, population)
        .context("Failed to start generation")?;

    if let Some(trace) = trace.as_deref_mut() {
        trace.write(&eval.snapshot())?;
    }

    while !eval.phase().is_terminal() {
        let started = Instant::now();
        eval.tick();

        if let Some(trace) = trace.as_deref_mut() {
            trace.write(&eval.snapshot())?;
        }
        if let Some(remaining) = interval.and_then(|i| i.checked_sub(started.elapsed())) {
            thread::sleep(remaining);
        }
    }

    log::info!(
        "Replay of generation {} finished: {:?} after {} ticks, score {}",
        generation,
        eval.phase(),
        eval.tick_count(),
        eval.score()
    );
    Ok(eval.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flapsim_core::evaluator::{AlwaysFlap, NeverFlap};
    use flapsim_core::GenerationPhase;

    #[test]
    fn test_trace_has_one_line_per_tick_plus_start() {
        let config = SimConfig::default();
        let mut trace = TraceWriter::new(Vec::new());

        let report = replay(
            &config,
            0,
            vec![Candidate::new(NeverFlap)],
            Some(&mut trace),
            false,
        )
        .unwrap();

        assert_eq!(report.phase, GenerationPhase::Extinct);
        assert_eq!(trace.lines(), report.ticks + 1);

        let bytes = trace.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let snapshots: Vec<Snapshot> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(snapshots.first().map(|s| s.tick), Some(0));
        assert_eq!(snapshots.first().map(|s| s.birds.len()), Some(1));
        let last = snapshots.last().unwrap();
        assert_eq!(last.tick, report.ticks);
        assert!(last.birds.is_empty());
        assert_eq!(last.phase, GenerationPhase::Extinct);
    }

    #[test]
    fn test_replay_without_trace() {
        let config = SimConfig::default();
        let report =
            replay::<Vec<u8>>(&config, 0, vec![Candidate::new(AlwaysFlap)], None, false).unwrap();
        assert_eq!(report.ticks, 38);
    }

    #[test]
    fn test_realtime_replay_rejects_unrepresentable_tick_rate() {
        let mut config = SimConfig::default();
        config.run.tick_rate = 1e-38;
        let err = replay::<Vec<u8>>(&config, 0, vec![Candidate::new(AlwaysFlap)], None, true)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("tick interval"));
    }

    #[test]
    fn test_create_trace_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traces").join("run.jsonl");

        let mut trace = TraceWriter::create(&path).unwrap();
        replay(
            &SimConfig::default(),
            0,
            vec![Candidate::new(AlwaysFlap)],
            Some(&mut trace),
            false,
        )
        .unwrap();
        trace.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 39);
    }
}
