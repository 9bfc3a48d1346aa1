// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Driving the expiry sweep from a periodic timer.
//!
//! The sweep is caller-driven: spawn a task that runs it on an interval.
//! Each eviction inside a pass is atomic, so the task (and any pass in
//! flight) can simply be dropped at shutdown.

use std::time::Duration;

use futures::StreamExt;
use tick::{Clock, PeriodicTimer};

use cachetag::{CacheEngine, Fingerprint, Tag, TagSet};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let clock = Clock::new_tokio();
    let engine = std::sync::Arc::new(
        CacheEngine::builder(clock.clone())
            .memory()
            .ttl(Duration::from_millis(50))
            .build(),
    );

    let tags: TagSet = [Tag::new("product-1")?].into_iter().collect();
    engine
        .store(&Fingerprint::new("prod:1:en"), "<html/>", tags, None)
        .await?;

    // Sweep every 100ms in the background.
    let sweeper = {
        let engine = std::sync::Arc::clone(&engine);
        let timer = PeriodicTimer::new(&clock, Duration::from_millis(100));
        tokio::spawn(async move {
            let mut ticks = Box::pin(timer.take(3));
            while ticks.next().await.is_some() {
                match engine.sweep_expired().await {
                    Ok(report) if report.swept() > 0 => {
                        println!("swept {} expired responses", report.swept());
                    }
                    Ok(_) => {}
                    Err(error) => eprintln!("sweep failed: {error}"),
                }
            }
        })
    };

    sweeper.await?;
    assert!(engine.lookup(&Fingerprint::new("prod:1:en")).await?.is_none());
    Ok(())
}
