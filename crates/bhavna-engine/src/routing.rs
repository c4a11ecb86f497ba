//! Process-wide routing mode

use std::sync::atomic::{AtomicBool, Ordering};

/// How statements are dispatched to adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingMode {
    /// Route between the model adapters
    AdapterRouted,
    /// Use only the lexicon scorer
    LexiconOnly,
}

/// Shared routing mode with a one-way transition to [`RoutingMode::LexiconOnly`].
///
/// Once demoted the state never reverts. All sessions holding the same
/// `Arc<RoutingState>` observe the demotion.
#[derive(Debug, Default)]
pub struct RoutingState {
    lexicon_only: AtomicBool,
}

impl RoutingState {
    /// Start in adapter-routed mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Start already demoted
    pub fn lexicon_only() -> Self {
        Self {
            lexicon_only: AtomicBool::new(true),
        }
    }

    /// Demote to lexicon-only. Returns `true` if this call performed the flip.
    pub fn demote(&self) -> bool {
        !self.lexicon_only.swap(true, Ordering::SeqCst)
    }

    pub fn is_lexicon_only(&self) -> bool {
        self.lexicon_only.load(Ordering::SeqCst)
    }

    pub fn mode(&self) -> RoutingMode {
        if self.is_lexicon_only() {
            RoutingMode::LexiconOnly
        } else {
            RoutingMode::AdapterRouted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_demotion_is_one_way() {
        let state = RoutingState::new();
        assert_eq!(state.mode(), RoutingMode::AdapterRouted);

        assert!(state.demote());
        assert_eq!(state.mode(), RoutingMode::LexiconOnly);

        assert!(!state.demote());
        assert!(state.is_lexicon_only());
    }

    #[test]
    fn test_starts_demoted() {
        let state = RoutingState::lexicon_only();
        assert_eq!(state.mode(), RoutingMode::LexiconOnly);
        assert!(!state.demote());
    }

    #[test]
    fn test_concurrent_demotion_flips_once() {
        let state = Arc::new(RoutingState::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = Arc::clone(&state);
                std::thread::spawn(move || state.demote())
            })
            .collect();

        let flips = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|flipped| *flipped)
            .count();
        assert_eq!(flips, 1);
        assert!(state.is_lexicon_only());
    }
}
