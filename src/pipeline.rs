//! Generator, worker pool and collection loop.
//!
//! The generator pushes `rounds` freshly randomized simulations into a bounded
//! task queue; `workers` tasks drain it, run each simulation on the blocking
//! pool and push one result per task into a bounded results queue, which the
//! caller drains through an [`Aggregator`].

use crate::{persist, Aggregator, Config, GridSink, Summary};
use anyhow::{anyhow, bail, Context, Result};
use futures::future::try_join_all;
use gol_engines::Simulation;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::{path::PathBuf, sync::Arc, time::Instant};
use tokio::{
    sync::{mpsc, Mutex},
    task::{self, JoinHandle},
};
use tracing::debug;

/// A simulation waiting to be run.
pub struct Round {
    pub index: u64,
    pub simulation: Simulation,
}

/// A finished simulation with its score.
pub struct RoundResult {
    pub index: u64,
    pub score: u64,
    pub simulation: Simulation,
}

/// Where the generator saves each initial grid.
pub struct Snapshots {
    pub sink: Arc<dyn GridSink>,
    pub dir: PathBuf,
}

/// Emit rounds `1..=rounds`, then close the queue by dropping `tasks`.
pub fn spawn_generator(
    rounds: u64,
    size: usize,
    seed: Option<u64>,
    snapshots: Option<Snapshots>,
    tasks: mpsc::Sender<Round>,
) -> JoinHandle<Result<()>> {
    tokio::spawn(async move {
        let mut rng = if let Some(x) = seed {
            ChaCha8Rng::seed_from_u64(x)
        } else {
            ChaCha8Rng::from_entropy()
        };
        for index in 1..=rounds {
            // one stream per round keeps soups independent of scheduling
            let mut round_rng = ChaCha8Rng::seed_from_u64(rng.gen());
            let simulation = Simulation::random(size, size, &mut round_rng)
                .with_context(|| format!("Failed to create simulation {index}"))?;
            if let Some(s) = &snapshots {
                let path = s.dir.join(persist::round_file_name(index));
                persist::write_or_warn(s.sink.as_ref(), &path, simulation.current_state());
            }
            tasks
                .send(Round { index, simulation })
                .await
                .map_err(|_| anyhow!("Task queue closed before round {index}"))?;
        }
        debug!(rounds, "Generator finished");
        Ok(())
    })
}

/// Start `count` workers sharing one task queue.
pub fn spawn_workers(
    count: usize,
    limit: u64,
    tasks: mpsc::Receiver<Round>,
    results: mpsc::Sender<RoundResult>,
) -> Vec<JoinHandle<Result<()>>> {
    let tasks = Arc::new(Mutex::new(tasks));
    (0..count)
        .map(|id| tokio::spawn(worker(id, limit, tasks.clone(), results.clone())))
        .collect()
}

async fn worker(
    id: usize,
    limit: u64,
    tasks: Arc<Mutex<mpsc::Receiver<Round>>>,
    results: mpsc::Sender<RoundResult>,
) -> Result<()> {
    let mut done = 0u64;
    loop {
        let next = tasks.lock().await.recv().await;
        let Some(Round {
            index,
            mut simulation,
        }) = next
        else {
            break;
        };

        let (score, simulation) = task::spawn_blocking(move || {
            let score = simulation.run(limit);
            (score, simulation)
        })
        .await
        .with_context(|| format!("Simulation {index} failed"))?;

        results
            .send(RoundResult {
                index,
                score,
                simulation,
            })
            .await
            .map_err(|_| anyhow!("Results queue closed before round {index}"))?;
        done += 1;
    }
    debug!(worker = id, rounds = done, "Worker finished");
    Ok(())
}

/// Run the whole search described by `config` and collect its summary.
///
/// Any generator or worker failure aborts the search.
pub async fn run_pipeline(config: &Config, snapshots: Option<Snapshots>) -> Result<Summary> {
    config.validate()?;
    let limit = config.generation_limit();
    let (task_tx, task_rx) = mpsc::channel(Config::QUEUE_CAPACITY);
    let (result_tx, mut result_rx) = mpsc::channel(Config::QUEUE_CAPACITY);

    let workers = spawn_workers(config.worker_count(), limit, task_rx, result_tx);
    let timer = Instant::now();
    let generator = spawn_generator(
        config.rounds,
        config.world_size(),
        config.seed,
        snapshots,
        task_tx,
    );

    let mut aggregator = Aggregator::new(limit);
    while aggregator.received() < config.rounds {
        // `None` means every worker is gone; the join below reports why
        let Some(result) = result_rx.recv().await else {
            break;
        };
        aggregator.observe(result);
    }

    generator.await.context("Generator panicked")??;
    for outcome in try_join_all(workers).await.context("Worker panicked")? {
        outcome?;
    }
    if aggregator.received() != config.rounds {
        bail!(
            "Received {} results for {} rounds",
            aggregator.received(),
            config.rounds
        );
    }
    Ok(aggregator.finish(timer.elapsed()))
}
