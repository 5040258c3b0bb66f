//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a simple reference model and to
//! exercise capacity, recency and expiration rules over random op sequences.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheStore, LruCache, ManualClock};

// == Test Configuration ==
const TEST_CAPACITY: usize = 8;

// == Strategies ==
/// Small key space so sets, gets and deletes collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-l]".prop_map(|s| s)
}

fn distinct_keys(min: usize, max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z]{1,6}", min..max).prop_map(|set| set.into_iter().collect())
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32, ttl: u64 },
    Get { key: String },
    Delete { key: String },
    Advance { secs: i64 },
    Sweep,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), any::<u32>(), 0u64..4)
            .prop_map(|(key, value, ttl)| CacheOp::Set { key, value, ttl }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => (1i64..3).prop_map(|secs| CacheOp::Advance { secs }),
        1 => Just(CacheOp::Sweep),
    ]
}

// == Reference Model ==
/// Naive LRU+TTL cache: a vector ordered most recent first.
#[derive(Default)]
struct Model {
    /// (key, value, expires_at in seconds; None = never)
    order: Vec<(String, u32, Option<i64>)>,
    now: i64,
}

impl Model {
    fn position(&self, key: &str) -> Option<usize> {
        self.order.iter().position(|(k, _, _)| k == key)
    }

    fn expired(&self, expires: Option<i64>) -> bool {
        expires.is_some_and(|at| self.now >= at)
    }

    fn get(&mut self, key: &str) -> Option<u32> {
        let pos = self.position(key)?;
        let item = self.order.remove(pos);
        if self.expired(item.2) {
            return None;
        }
        let value = item.1;
        self.order.insert(0, item);
        Some(value)
    }

    fn set(&mut self, key: String, value: u32, ttl: u64) {
        let expires = (ttl > 0).then(|| self.now + ttl as i64);
        if let Some(pos) = self.position(&key) {
            self.order.remove(pos);
        } else if self.order.len() >= TEST_CAPACITY {
            self.order.pop();
        }
        self.order.insert(0, (key, value, expires));
    }

    fn delete(&mut self, key: &str) {
        if let Some(pos) = self.position(key) {
            self.order.remove(pos);
        }
    }

    fn sweep(&mut self) {
        while let Some(last) = self.order.last() {
            if !self.expired(last.2) {
                break;
            }
            self.order.pop();
        }
    }

    fn live(&self) -> Vec<(String, u32)> {
        self.order
            .iter()
            .filter(|(_, _, expires)| !self.expired(*expires))
            .map(|(k, v, _)| (k.clone(), *v))
            .collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Every operation sequence matches the reference model: same lookups,
    // same live snapshot in the same order, and the index stays in step
    // with the recency list.
    #[test]
    fn prop_matches_reference_model(ops in prop::collection::vec(cache_op_strategy(), 1..120)) {
        let clock = ManualClock::default();
        let mut store = CacheStore::new(TEST_CAPACITY, clock.clone()).unwrap();
        let mut model = Model::default();

        for op in ops {
            match op {
                CacheOp::Set { key, value, ttl } => {
                    store.set(key.clone(), value, ttl);
                    model.set(key, value, ttl);
                }
                CacheOp::Get { key } => {
                    let got = store.get(&key).copied();
                    prop_assert_eq!(got, model.get(&key), "get({}) diverged", key);
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                    model.delete(&key);
                }
                CacheOp::Advance { secs } => {
                    clock.advance_secs(secs);
                    model.now += secs;
                }
                CacheOp::Sweep => {
                    store.sweep_expired();
                    model.sweep();
                }
            }

            store.assert_consistent();
            prop_assert!(store.len() <= TEST_CAPACITY);
            let live: Vec<_> = store.entries().into_iter().map(|e| (e.key, e.value)).collect();
            prop_assert_eq!(live, model.live());
        }
    }

    // Filling past capacity with permanent entries evicts in insertion order.
    #[test]
    fn prop_lru_eviction_order(keys in distinct_keys(3, 12), extra in 1usize..3) {
        let capacity = keys.len();
        let mut store = CacheStore::new(capacity, ManualClock::default()).unwrap();

        for key in &keys {
            store.set(key.clone(), 0u32, 0);
        }
        for i in 0..extra {
            let evicted = store.set(format!("new_{i}"), 0, 0);
            prop_assert_eq!(evicted.map(|e| e.key), Some(keys[i].clone()));
        }

        prop_assert_eq!(store.len(), capacity);
    }

    // A key touched by get or set is never the next eviction victim.
    #[test]
    fn prop_touch_protects_from_eviction(keys in distinct_keys(3, 10), via_set in any::<bool>()) {
        let capacity = keys.len();
        let mut store = CacheStore::new(capacity, ManualClock::default()).unwrap();
        for key in &keys {
            store.set(key.clone(), 1u32, 0);
        }

        let touched = keys[0].clone();
        if via_set {
            store.set(touched.clone(), 2, 0);
        } else {
            prop_assert!(store.get(&touched).is_some());
        }
        let evicted = store.set("fresh-key".to_string(), 3, 0);

        prop_assert_eq!(evicted.map(|e| e.key), Some(keys[1].clone()));
        prop_assert!(store.get(&touched).is_some());
    }
}

// Concurrency properties run fewer cases since each spins up a runtime
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Concurrent writers on distinct keys leave exactly min(keys, capacity)
    // entries and a consistent index.
    #[test]
    fn prop_concurrent_sets_respect_capacity(
        keys in distinct_keys(1, 40),
        capacity in 1usize..24,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();
        let cache: Arc<LruCache<usize, ManualClock>> = Arc::new(
            LruCache::with_clock(capacity, Duration::from_secs(3600), ManualClock::default())
                .unwrap(),
        );

        let handles: Vec<_> = keys
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, key)| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.set(key, i, 0))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let expected = keys.len().min(capacity);
        prop_assert_eq!(cache.len(), expected);
        let snapshot = cache.get_all();
        prop_assert_eq!(snapshot.len(), expected);
        let unique: HashSet<_> = snapshot.iter().map(|e| e.key.as_str()).collect();
        prop_assert_eq!(unique.len(), expected);
        let by_key: HashMap<_, _> = keys.iter().enumerate().map(|(i, k)| (k.as_str(), i)).collect();
        for entry in &snapshot {
            prop_assert_eq!(Some(&entry.value), by_key.get(entry.key.as_str()));
        }
    }

    // Async callers sharing the cache see whole values only.
    #[test]
    fn prop_async_readers_and_writers(ops in prop::collection::vec(cache_op_strategy(), 10..60)) {
        tokio_test::block_on(async {
            let cache: Arc<LruCache<u32>> = Arc::new(LruCache::new(TEST_CAPACITY).unwrap());
            let mut handles = Vec::new();

            for op in ops {
                let cache = Arc::clone(&cache);
                handles.push(tokio::spawn(async move {
                    match op {
                        CacheOp::Set { key, value, .. } => cache.set(key, value, 0),
                        CacheOp::Get { key } => {
                            cache.get(&key);
                        }
                        CacheOp::Delete { key } => {
                            cache.delete(&key);
                        }
                        CacheOp::Advance { .. } | CacheOp::Sweep => {
                            cache.sweep();
                        }
                    }
                }));
            }
            for handle in handles {
                handle.await.unwrap();
            }

            assert!(cache.len() <= TEST_CAPACITY);
            assert_eq!(cache.get_all().len(), cache.len());
        });
    }
}
