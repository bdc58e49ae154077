use std::sync::atomic::{AtomicBool, Ordering};

/// Liveness flag checked before every state write that follows an await.
#[derive(Debug)]
pub struct Liveness {
    alive: AtomicBool,
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            alive: AtomicBool::new(true),
        }
    }

    pub fn is_live(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Returns `true` the first time only.
    pub fn shutdown(&self) -> bool {
        self.alive.swap(false, Ordering::SeqCst)
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_reports_only_the_first_transition() {
        let liveness = Liveness::new();
        assert!(liveness.is_live());
        assert!(liveness.shutdown());
        assert!(!liveness.shutdown());
        assert!(!liveness.is_live());
    }
}
