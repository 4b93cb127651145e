use config::{global, OverrideSource, RawOverride, Resolver, Settings};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use types::ConfigError;

/// Source that counts how often the resolver reads it
struct CountingSource {
    reads: Arc<AtomicUsize>,
    total_to_fetch: usize,
}

impl OverrideSource for CountingSource {
    fn name(&self) -> &str {
        "counting"
    }

    fn overrides(&self, _prefix: &str) -> Result<Vec<RawOverride>, ConfigError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        // Widen the window in which other threads arrive
        thread::sleep(Duration::from_millis(20));
        Ok(vec![RawOverride {
            key: "MC_MAVEN_BRIDGE__HANGAR__VERSIONS_TOTAL_TO_FETCH".to_string(),
            value: self.total_to_fetch.to_string(),
        }])
    }
}

#[test]
fn test_concurrent_first_access_resolves_once() {
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let reads = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            let reads = Arc::clone(&reads);
            thread::spawn(move || {
                let resolver = Resolver::empty().with_source(CountingSource {
                    reads,
                    total_to_fetch: 100 + i,
                });
                barrier.wait();
                global::init_with(&resolver).unwrap() as *const Settings as usize
            })
        })
        .collect();

    let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(reads.load(Ordering::SeqCst), 1);
    assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));

    let installed = global::get().unwrap();
    assert_eq!(installed as *const Settings as usize, addresses[0]);
    assert!((100..100 + threads as i64).contains(&installed.hangar.versions_total_to_fetch));

    // Later calls keep the installed instance without resolving again
    let again = global::init_with(&Resolver::empty().with_source(CountingSource {
        reads: Arc::clone(&reads),
        total_to_fetch: 1,
    }))
    .unwrap();
    assert!(std::ptr::eq(again, installed));
    assert_eq!(reads.load(Ordering::SeqCst), 1);
}
