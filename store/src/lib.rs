//! Local preference stores for Vitrine.
//!
//! Three independent stores back the visitor-facing preferences: cookie
//! consent, display language, and visual theme. Each store owns exactly one
//! key of a shared [`Storage`] backend and is fully synchronous; nothing in
//! this crate suspends or touches the network.
//!
//! Stores are constructed once at startup and handed to consumers as plain
//! values. There is no ambient registry to look them up in, so "store used
//! before it exists" is unrepresentable.

mod consent;
mod file;
mod language;
mod storage;
mod theme;

pub use consent::ConsentStore;
pub use file::FileStorage;
pub use language::{LanguageStore, Subscription};
pub use storage::{MemoryStorage, Storage};
pub use theme::{MarkerSet, ThemeStore, ThemeTarget};
