use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Debug, Default)]
pub struct GenerationToken {
    current: Arc<AtomicU64>,
}

impl GenerationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::Acquire)
    }

    pub fn advance(&self) -> u64 {
        self.current.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
    }

    pub fn guard(&self) -> CancelGuard {
        CancelGuard {
            token: self.clone(),
            generation: self.current(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CancelGuard {
    token: GenerationToken,
    generation: u64,
}

impl CancelGuard {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_stale(&self) -> bool {
        self.token.current() != self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_goes_stale_after_advance() {
        let token = GenerationToken::new();
        let guard = token.guard();
        assert!(!guard.is_stale());

        let clone = token.clone();
        assert_eq!(clone.advance(), 1);
        assert!(guard.is_stale());
        assert!(!token.guard().is_stale());
        assert_eq!(token.guard().generation(), 1);
    }
}
