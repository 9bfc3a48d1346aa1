// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mapping domain events to tag invalidations.
//!
//! The mapping from a domain event to the tags it stales is caller policy;
//! this example shows the shape a webhook or event-bus consumer typically
//! takes on top of the engine.

use cachetag::{CacheEngine, Fingerprint, InMemoryStore, InvalidTag, Tag, TagSet};
use tick::Clock;

/// Domain events published by the shop backend.
enum ShopEvent {
    ProductUpdated { id: u64 },
    ManufacturerUpdated { id: u64 },
    NavigationChanged,
}

/// Caller-defined policy: which tags does each event stale?
fn tags_for(event: &ShopEvent) -> Result<TagSet, InvalidTag> {
    let labels = match event {
        ShopEvent::ProductUpdated { id } => vec![format!("product-{id}")],
        ShopEvent::ManufacturerUpdated { id } => vec![format!("manufacturer-{id}")],
        ShopEvent::NavigationChanged => vec!["navigation".to_string()],
    };
    labels.into_iter().map(Tag::new).collect()
}

async fn seed(engine: &CacheEngine<InMemoryStore>) -> Result<(), Box<dyn std::error::Error>> {
    engine
        .store(
            &Fingerprint::new("prod:123:de"),
            "<product 123>",
            tags_for(&ShopEvent::ProductUpdated { id: 123 })?,
            None,
        )
        .await?;

    let mut detail_tags = tags_for(&ShopEvent::ProductUpdated { id: 7 })?;
    detail_tags.extend(tags_for(&ShopEvent::ManufacturerUpdated { id: 55 })?);
    engine
        .store(&Fingerprint::new("prod:7:de"), "<product 7>", detail_tags, None)
        .await?;

    engine
        .store(
            &Fingerprint::new("nav:main"),
            "<nav/>",
            tags_for(&ShopEvent::NavigationChanged)?,
            None,
        )
        .await?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    futures::executor::block_on(async {
        let clock = Clock::new_frozen();
        let engine = CacheEngine::builder(clock).memory().build();
        seed(&engine).await?;

        // A manufacturer webhook arrives; only pages that depended on the
        // manufacturer fall out of the cache.
        let event = ShopEvent::ManufacturerUpdated { id: 55 };
        let report = engine.invalidate(&tags_for(&event)?).await;
        println!("manufacturer-55 update evicted {} pages", report.evicted());

        assert!(engine.lookup(&Fingerprint::new("prod:7:de")).await?.is_none());
        assert!(engine.lookup(&Fingerprint::new("prod:123:de")).await?.is_some());
        assert!(engine.lookup(&Fingerprint::new("nav:main")).await?.is_some());
        Ok(())
    })
}
