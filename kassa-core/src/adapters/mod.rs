//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - Connect HTTP client for the production budget backend
//! - In-memory backend for tests and offline runs

pub mod connect;
pub mod memory;

pub use connect::ConnectBackend;
pub use memory::MemoryBackend;
