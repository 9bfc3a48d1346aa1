// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Minimal usage: store a rendered response, look it up, invalidate it.

use cachetag::{CacheEngine, Fingerprint, Tag, TagCollector, TagSet};
use tick::Clock;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    futures::executor::block_on(async {
        let clock = Clock::new_frozen();
        let engine = CacheEngine::builder(clock).memory().build();

        // The renderer computes the fingerprint and collects the tags that
        // influenced the response while producing it.
        let key = Fingerprint::new("prod:123:de");
        let mut tags = TagCollector::new();
        tags.add(Tag::new("product-123")?);
        tags.add(Tag::new("manufacturer-55")?);

        engine.store(&key, "<html>product detail</html>", tags, None).await?;

        let body = engine.lookup(&key).await?.expect("just stored");
        println!("hit: {} bytes", body.len());

        // A manufacturer update evicts every response it influenced.
        let stale: TagSet = [Tag::new("manufacturer-55")?].into_iter().collect();
        let report = engine.invalidate(&stale).await;
        println!("evicted {} responses", report.evicted());

        assert!(engine.lookup(&key).await?.is_none());
        Ok(())
    })
}
