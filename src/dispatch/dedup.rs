use std::collections::HashSet;
use std::sync::Mutex;

/// At-most-once guard over translation-unit identities.
///
/// Admission is a one-way transition and entries are never removed, so a
/// unit admitted once stays admitted for the life of the run. This guard is
/// separate from the registry's page claims: a source can be discovered
/// several times, through different paths, before its project association is
/// known, and this is the last gate in front of the processor invocation.
#[derive(Debug, Default)]
pub struct DedupGuard {
    admitted: Mutex<HashSet<String>>,
}

impl DedupGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff this is the first admission of `id`.
    pub fn try_admit(&self, id: &str) -> bool {
        self.admitted.lock().unwrap().insert(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_first_admission_wins() {
        let guard = DedupGuard::new();
        assert!(guard.try_admit("/src/a.cc"));
        assert!(!guard.try_admit("/src/a.cc"));
    }

    #[test]
    fn test_identities_are_independent() {
        let guard = DedupGuard::new();
        assert!(guard.try_admit("/src/a.cc"));
        assert!(guard.try_admit("/src/b.cc"));
    }

    #[test]
    fn test_single_winner_under_contention() {
        let guard = DedupGuard::new();
        let admitted = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..16 {
                let guard = &guard;
                let admitted = &admitted;
                scope.spawn(move || {
                    if guard.try_admit("/src/contended.cc") {
                        admitted.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(admitted.load(Ordering::SeqCst), 1);
    }
}
