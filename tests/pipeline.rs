use longest_life::{
    read_grid, round_file_name, run_pipeline, spawn_generator, spawn_workers, Config,
    JsonFileSink, MemorySink, RoundResult, Snapshots,
};
use std::sync::Arc;
use tokio::sync::mpsc;

const SEED: u64 = 42;

async fn collect(rounds: u64, workers: usize) -> Vec<RoundResult> {
    let (task_tx, task_rx) = mpsc::channel(Config::QUEUE_CAPACITY);
    let (result_tx, mut result_rx) = mpsc::channel(Config::QUEUE_CAPACITY);
    let handles = spawn_workers(workers, 500, task_rx, result_tx);
    let generator = spawn_generator(rounds, 8, Some(SEED), None, task_tx);

    let mut results = vec![];
    while let Some(result) = result_rx.recv().await {
        results.push(result);
    }
    generator.await.unwrap().unwrap();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    results
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_round_yields_one_result() {
    for rounds in [1, 4, 50] {
        for workers in [1, 2, 8] {
            let results = collect(rounds, workers).await;
            let mut indices = results.iter().map(|r| r.index).collect::<Vec<_>>();
            indices.sort_unstable();
            assert_eq!(
                indices,
                (1..=rounds).collect::<Vec<_>>(),
                "rounds={rounds} workers={workers}"
            );
            for r in &results {
                assert_eq!(r.simulation.generation(), r.score);
                assert!(r.simulation.start_grid().is_some());
            }
        }
    }
}

#[tokio::test]
async fn test_single_threaded_runtime() {
    let config = Config {
        rounds: 12,
        size: 8,
        workers: 3,
        seed: Some(SEED),
        ..Config::default()
    };
    let summary = run_pipeline(&config, None).await.unwrap();
    assert_eq!(summary.rounds, 12);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_seed_fixes_best_score() {
    let mut scores = vec![];
    for workers in [1, 4] {
        let config = Config {
            rounds: 30,
            size: 12,
            workers,
            seed: Some(SEED),
            ..Config::default()
        };
        let summary = run_pipeline(&config, None).await.unwrap();
        assert_eq!(summary.rounds, 30);
        scores.push(summary.best_score());
    }
    assert_eq!(scores[0], scores[1]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_search_saves_grids() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        rounds: 20,
        size: 8,
        workers: 2,
        write_all: true,
        seed: Some(SEED),
        grids_dir: dir.path().join("grids"),
        ..Config::default()
    };
    let sink = Arc::new(MemorySink::default());
    let summary = longest_life::search(&config, sink.clone()).await.unwrap();

    let best = summary.best.as_ref().expect("8x8 soups stall quickly");
    assert!(best.score < config.generation_limit());
    let start = best.simulation.start_grid().unwrap();
    assert_eq!(sink.get(&config.best_path).as_ref(), Some(start));
    assert_eq!(
        sink.get(config.grids_dir.join(round_file_name(best.index))).as_ref(),
        Some(start)
    );
    assert_eq!(sink.len(), 21);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_search_writes_json_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        rounds: 5,
        size: 8,
        workers: 2,
        write_all: true,
        seed: Some(SEED),
        grids_dir: dir.path().join("grids"),
        best_path: dir.path().join("best.txt"),
        ..Config::default()
    };
    let summary = longest_life::search(&config, Arc::new(JsonFileSink))
        .await
        .unwrap();

    for index in 1..=5 {
        let grid = read_grid(&config.grids_dir.join(round_file_name(index))).unwrap();
        assert_eq!((grid.width(), grid.height()), (8, 8));
    }
    if let Some(best) = &summary.best {
        let saved = read_grid(&config.best_path).unwrap();
        assert_eq!(Some(&saved), best.simulation.start_grid());
        let score = longest_life::replay(&config.best_path, config.generation_limit()).unwrap();
        assert_eq!(score, best.score);
    }
}

#[tokio::test]
async fn test_failed_writes_do_not_abort() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        rounds: 3,
        size: 6,
        workers: 2,
        seed: Some(SEED),
        best_path: dir.path().join("missing").join("best.txt"),
        ..Config::default()
    };
    let summary = longest_life::search(&config, Arc::new(JsonFileSink))
        .await
        .unwrap();
    assert_eq!(summary.rounds, 3);
    assert!(!config.best_path.exists());
}

#[tokio::test]
async fn test_allocation_failure_is_fatal() {
    let config = Config {
        rounds: 3,
        size: u32::MAX,
        workers: 2,
        ..Config::default()
    };
    assert!(run_pipeline(&config, None).await.is_err());
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let config = Config {
        rounds: 0,
        ..Config::default()
    };
    let snapshots = Snapshots {
        sink: Arc::new(MemorySink::default()),
        dir: "grids".into(),
    };
    assert!(run_pipeline(&config, Some(snapshots)).await.is_err());
}
