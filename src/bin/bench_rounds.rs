use longest_life::{Config, MemorySink};
use std::{sync::Arc, time::Instant};

fn main() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();

    for workers in [1, 2, 4, 8] {
        let config = Config {
            rounds: 200,
            size: 64,
            workers,
            seed: Some(42),
            ..Config::default()
        };
        let sink = Arc::new(MemorySink::default());

        let timer = Instant::now();
        let summary = runtime
            .block_on(longest_life::search(&config, sink))
            .unwrap();
        println!(
            "Workers: {:>2}, time: {:?}, best score: {}",
            workers,
            timer.elapsed(),
            summary.best_score()
        );
    }
}
