// # dnsimple-core
//
// Registrar convergence and zone record caching for DNSimple integrations.
//
// ## Architecture Overview
//
// - **ConvergenceEngine**: Polls an asynchronous registrar operation until it
//   converges, fails terminally, or its deadline passes
// - **State taxonomies**: Per-operation classification of registrar states
// - **Registrar waiters**: Probes for domain registrations and registrant changes
// - **Resolution**: Call-site policy turning outcomes into complete/partial/rejected
// - **ZoneRecordCache**: Complete-or-absent cache of zone record sets
// - **RegistrarApi / ZoneRecordSource**: The remote interfaces, implemented by
//   `dnsimple-client`
//
// ## Design Principles
//
// 1. **Single-shot collaborators**: API implementations never retry or sleep
// 2. **Engine-owned cadence**: Fixed delay, no backoff, explicit deadline
// 3. **Explicit shared state**: The cache is an owned object, never a global
// 4. **No suppression**: Every error reaches the caller

pub mod cache;
pub mod config;
pub mod convergence;
pub mod error;
pub mod resolution;
pub mod traits;

// Re-export core types for convenience
pub use cache::ZoneRecordCache;
pub use config::{ApiConfig, ConvergenceConfig, DnsimpleConfig, ZoneRecordsConfig};
pub use convergence::{ConvergenceEngine, ConvergenceOutcome, ConvergencePolicy, ConvergenceReport, PollStatus, Probe};
pub use error::{Error, Result};
pub use resolution::{Resolution, Warning};
pub use traits::{RegistrarApi, ZoneRecordSource};
