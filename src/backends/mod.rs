//! Remote backend implementations

pub mod memory;
#[cfg(feature = "tcp")]
pub mod tcp;

pub use memory::{MemoryBackend, MemoryClient};
#[cfg(feature = "tcp")]
pub use tcp::{TcpBackend, TcpClient, WireRecord};

pub use crate::core::{RemoteBackend, RemoteClient};
