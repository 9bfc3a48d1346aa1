// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for TTL expiry and the background sweep.

use std::time::Duration;

use cachetag::{CacheEngine, Fingerprint, Tag, TagSet};
use cachetag_store::testing::{MockStore, StoreOp};
use tick::ClockControl;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

fn tags(labels: &[&str]) -> TagSet {
    labels
        .iter()
        .map(|l| Tag::new(*l).expect("test labels are valid"))
        .collect()
}

#[test]
fn expired_entry_reports_as_miss_before_sweep() -> TestResult {
    block_on(async {
        let control = ClockControl::new();
        let store = MockStore::new();
        let engine = CacheEngine::builder(control.to_clock())
            .storage(store.clone())
            .ttl(Duration::from_secs(60))
            .build();

        let key = Fingerprint::new("prod:1");
        engine.store(&key, "<html/>", tags(&["product-1"]), None).await?;
        assert!(engine.lookup(&key).await?.is_some());

        control.advance(Duration::from_secs(61));

        // Expired entries miss, even though the body is still stored.
        assert!(engine.lookup(&key).await?.is_none());
        assert!(store.contains_key(&key));
        Ok(())
    })
}

#[test]
fn sweep_reclaims_expired_entries_and_prunes_the_ledger() -> TestResult {
    block_on(async {
        let control = ClockControl::new();
        let store = MockStore::new();
        let engine = CacheEngine::builder(control.to_clock())
            .storage(store.clone())
            .ttl(Duration::from_secs(60))
            .build();

        let old = Fingerprint::new("old:page");
        engine.store(&old, "<old/>", tags(&["old"]), None).await?;

        control.advance(Duration::from_secs(40));
        let fresh = Fingerprint::new("fresh:page");
        engine.store(&fresh, "<fresh/>", tags(&["fresh"]), None).await?;

        // 70s for the old entry, 30s for the fresh one.
        control.advance(Duration::from_secs(30));

        let report = engine.sweep_expired().await?;
        assert_eq!(report.swept(), 1);
        assert!(report.failed().is_empty());

        assert!(!store.contains_key(&old));
        assert!(engine.tags_of(&old).is_empty());
        assert!(store.contains_key(&fresh));
        assert_eq!(engine.tags_of(&fresh), tags(&["fresh"]));
        Ok(())
    })
}

#[test]
fn per_entry_ttl_overrides_engine_ttl() -> TestResult {
    block_on(async {
        let control = ClockControl::new();
        let engine = CacheEngine::builder(control.to_clock())
            .memory()
            .ttl(Duration::from_secs(600))
            .build();

        let key = Fingerprint::new("flash:sale");
        engine
            .store(&key, "<sale/>", tags(&["sale"]), Some(Duration::from_secs(10)))
            .await?;

        control.advance(Duration::from_secs(11));

        // Expired by the entry's own TTL long before the engine-level one.
        assert!(engine.lookup(&key).await?.is_none());
        let report = engine.sweep_expired().await?;
        assert_eq!(report.swept(), 1);
        Ok(())
    })
}

#[test]
fn entries_without_any_ttl_never_expire() -> TestResult {
    block_on(async {
        let control = ClockControl::new();
        let engine = CacheEngine::builder(control.to_clock()).memory().build();

        let key = Fingerprint::new("evergreen");
        engine.store(&key, "<html/>", tags(&["static"]), None).await?;

        control.advance(Duration::from_secs(60 * 60 * 24 * 365));

        assert!(engine.lookup(&key).await?.is_some());
        let report = engine.sweep_expired().await?;
        assert_eq!(report.swept(), 0);
        Ok(())
    })
}

#[test]
fn sweep_on_empty_store_does_nothing() -> TestResult {
    block_on(async {
        let control = ClockControl::new();
        let engine = CacheEngine::builder(control.to_clock()).memory().build();

        let report = engine.sweep_expired().await?;
        assert_eq!(report.swept(), 0);
        assert!(report.failed().is_empty());
        Ok(())
    })
}

#[test]
fn sweep_collects_per_entry_failures_and_continues() -> TestResult {
    block_on(async {
        let control = ClockControl::new();
        let store = MockStore::new();
        let engine = CacheEngine::builder(control.to_clock())
            .storage(store.clone())
            .ttl(Duration::from_secs(60))
            .build();

        let stuck = Fingerprint::new("stuck");
        let fine = Fingerprint::new("fine");
        engine.store(&stuck, "<a>", tags(&["t"]), None).await?;
        engine.store(&fine, "<b>", tags(&["t"]), None).await?;

        control.advance(Duration::from_secs(61));
        store.fail_when(|op| matches!(op, StoreOp::Delete(key) if key.as_str() == "stuck"));

        let report = engine.sweep_expired().await?;
        assert_eq!(report.swept(), 1);
        assert_eq!(report.failed().len(), 1);
        assert_eq!(report.failed()[0].fingerprint(), &stuck);

        // The failed entry keeps its ledger entry for the next pass.
        assert_eq!(engine.tags_of(&stuck), tags(&["t"]));
        assert!(engine.tags_of(&fine).is_empty());

        store.clear_failures();
        let retry = engine.sweep_expired().await?;
        assert_eq!(retry.swept(), 1);
        assert!(engine.tags_of(&stuck).is_empty());
        Ok(())
    })
}

#[test]
fn cancelled_sweep_leaves_store_and_ledger_consistent() -> TestResult {
    use futures::FutureExt as _;
    use std::pin::Pin;
    use std::task::{self, Poll};

    use cachetag_store::{ResponseEntry, ResponseStore, StoreError};

    /// Yields to the executor once, so a manual poll stops here.
    struct YieldOnce(bool);

    impl Future for YieldOnce {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    /// A store whose deletes suspend once before completing, giving the
    /// sweep a real checkpoint between evictions.
    #[derive(Clone)]
    struct YieldingStore(MockStore);

    impl ResponseStore for YieldingStore {
        async fn get(&self, key: &Fingerprint) -> Result<Option<ResponseEntry>, StoreError> {
            self.0.get(key).await
        }

        async fn put(&self, key: &Fingerprint, entry: ResponseEntry) -> Result<(), StoreError> {
            self.0.put(key, entry).await
        }

        async fn delete(&self, key: &Fingerprint) -> Result<(), StoreError> {
            YieldOnce(false).await;
            self.0.delete(key).await
        }

        async fn keys(&self) -> Result<Vec<Fingerprint>, StoreError> {
            self.0.keys().await
        }

        fn len(&self) -> Option<u64> {
            self.0.len()
        }
    }

    block_on(async {
        let control = ClockControl::new();
        let store = MockStore::new();
        let engine = CacheEngine::builder(control.to_clock())
            .storage(YieldingStore(store.clone()))
            .ttl(Duration::from_secs(60))
            .build();

        for i in 0..8 {
            engine
                .store(&Fingerprint::new(format!("page:{i}")), "body", tags(&["t"]), None)
                .await?;
        }
        control.advance(Duration::from_secs(61));

        // Drive the sweep through a couple of evictions, then drop it mid-pass.
        {
            let mut sweep = Box::pin(engine.sweep_expired());
            let mut cx = task::Context::from_waker(task::Waker::noop());
            for _ in 0..3 {
                if sweep.poll_unpin(&mut cx).is_ready() {
                    break;
                }
            }
        }

        // Some entries were evicted, some were not reached.
        let remaining = store.entry_count();
        assert!(remaining > 0, "sweep should have been cancelled before finishing");
        assert!(remaining < 8, "sweep should have evicted at least one entry");

        // However far the sweep got, evicted entries lost their ledger entry
        // and surviving entries kept body and ledger entry together.
        for i in 0..8 {
            let key = Fingerprint::new(format!("page:{i}"));
            let live = store.contains_key(&key);
            let indexed = !engine.tags_of(&key).is_empty();
            assert_eq!(live, indexed, "cancelled sweep left {key} half-evicted");
        }

        // A fresh pass finishes the job.
        let report = engine.sweep_expired().await?;
        assert!(report.failed().is_empty());
        assert_eq!(store.entry_count(), 0);
        assert!(engine.tags_of(&Fingerprint::new("page:0")).is_empty());
        Ok(())
    })
}
