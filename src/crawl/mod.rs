// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling from a seed URL
// - Stays on the seed's authority (doesn't crawl external sites)
// - Obeys robots.txt, including Crawl-delay, unless told not to
// - Runs visits inline or on a bounded pool of tokio tasks
//
// Submodules:
// - frontier: queued / seen / done state behind one lock
// - executor: inline vs pooled visit tasks
// - robots: robots.txt parsing and matching
// - scheduler: Crawler, the dispatcher loop and the per-page visit
// =============================================================================

mod executor;
mod frontier;
mod robots;
mod scheduler;

pub use robots::RobotsPolicy;
pub use scheduler::Crawler;
