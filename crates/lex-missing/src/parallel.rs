//! Crate-local rayon thread pool for the per-row fan-out.
//!
//! The pool is built lazily on first use. If it cannot be created (for example
//! under tight thread limits), callers run the same work sequentially.

use rayon::ThreadPool;
use std::sync::OnceLock;
use tracing::{debug, warn};

static RAYON_POOL: OnceLock<Option<ThreadPool>> = OnceLock::new();

fn desired_threads() -> usize {
    std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
}

fn build_pool() -> Option<ThreadPool> {
    let requested = desired_threads().max(1);
    let try_build = |n| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .thread_name(|i| format!("lex-missing-{i}"))
            .build()
    };

    match try_build(requested) {
        Ok(pool) => {
            debug!("Built row pool with {} threads", requested);
            Some(pool)
        }
        Err(_) if requested > 1 => {
            warn!("Could not build a {requested}-thread pool, retrying with one thread");
            try_build(1).ok()
        }
        Err(err) => {
            warn!("Could not build row pool, running sequentially: {err}");
            None
        }
    }
}

/// Returns the crate-local thread pool, if one could be created.
pub(crate) fn rayon_pool() -> Option<&'static ThreadPool> {
    RAYON_POOL.get_or_init(build_pool).as_ref()
}
