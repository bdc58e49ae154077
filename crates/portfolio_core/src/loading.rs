//! Reference-counted loading state, one counter per operation kind.
//!
//! Each in-flight call holds a [`LoadingGuard`]; dropping it decrements its
//! counter, so a finishing call can never mark a still-running sibling as
//! loaded.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingOp {
    Identity,
    Profile,
    CoverUpload,
    Education,
}

impl LoadingOp {
    pub const ALL: [LoadingOp; 4] = [
        LoadingOp::Identity,
        LoadingOp::Profile,
        LoadingOp::CoverUpload,
        LoadingOp::Education,
    ];

    fn index(self) -> usize {
        match self {
            Self::Identity => 0,
            Self::Profile => 1,
            Self::CoverUpload => 2,
            Self::Education => 3,
        }
    }
}

#[derive(Debug, Default)]
pub struct LoadingTracker {
    counts: [AtomicUsize; 4],
}

impl LoadingTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn begin(self: &Arc<Self>, op: LoadingOp) -> LoadingGuard {
        self.counts[op.index()].fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            tracker: Arc::clone(self),
            op,
        }
    }

    pub fn in_flight(&self, op: LoadingOp) -> usize {
        self.counts[op.index()].load(Ordering::SeqCst)
    }

    pub fn is_loading_op(&self, op: LoadingOp) -> bool {
        self.in_flight(op) > 0
    }

    pub fn is_loading(&self) -> bool {
        LoadingOp::ALL.into_iter().any(|op| self.is_loading_op(op))
    }

    pub fn active(&self) -> Vec<LoadingOp> {
        LoadingOp::ALL
            .into_iter()
            .filter(|op| self.is_loading_op(*op))
            .collect()
    }
}

#[must_use = "loading ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoadingGuard {
    tracker: Arc<LoadingTracker>,
    op: LoadingOp,
}

impl LoadingGuard {
    pub fn op(&self) -> LoadingOp {
        self.op
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.tracker.counts[self.op.index()].fetch_sub(1, Ordering::SeqCst);
    }
}
