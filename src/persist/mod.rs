//! Persistence bridge between the in-memory screenplay and the host
//!
//! - `store`: the file read/write collaborator
//! - `debounce`: clock and coalescing write timer
//! - `session`: the per-file editing session that ties everything together

pub mod debounce;
pub mod session;
pub mod store;

pub use debounce::{Clock, Debouncer, ManualClock};
#[cfg(not(target_arch = "wasm32"))]
pub use debounce::SystemClock;
pub use session::{KeyOutcome, ListenerId, OpenOutcome, SaveStatus, ScreenplaySession};
#[cfg(not(target_arch = "wasm32"))]
pub use store::FsFileStore;
pub use store::{MemoryFileStore, TextFileStore};
