//! Remote backend traits and the handle the logger keeps to a client

use super::error::Result;
use super::log_entry::LogEntry;
use super::payload::CommonLabels;
use std::fmt;

/// Factory for remote clients.
///
/// `acquire` may block on a network or credential round-trip; it is called
/// once, while the logger is constructed.
pub trait RemoteBackend {
    fn acquire(
        &self,
        identity: &str,
        stream_name: &str,
        labels: &CommonLabels,
    ) -> Result<Box<dyn RemoteClient>>;
}

impl<B: RemoteBackend + ?Sized> RemoteBackend for &B {
    fn acquire(
        &self,
        identity: &str,
        stream_name: &str,
        labels: &CommonLabels,
    ) -> Result<Box<dyn RemoteClient>> {
        (**self).acquire(identity, stream_name, labels)
    }
}

/// An acquired connection to the remote logging service.
///
/// The client attaches its common labels to every entry it forwards.
pub trait RemoteClient: Send + Sync {
    /// Fire-and-forget submission. Failures stay with the client.
    fn submit(&self, entry: LogEntry);

    /// Release the client's resources
    fn release(&mut self) -> Result<()>;

    fn name(&self) -> &str;
}

/// Whether the logger holds a remote client
#[derive(Default)]
pub enum RemoteHandle {
    /// Never acquired, or already released
    #[default]
    Absent,
    Live(Box<dyn RemoteClient>),
}

impl RemoteHandle {
    pub fn is_live(&self) -> bool {
        matches!(self, RemoteHandle::Live(_))
    }

    /// Take the client out, leaving the handle absent
    pub fn take(&mut self) -> Option<Box<dyn RemoteClient>> {
        match std::mem::replace(self, RemoteHandle::Absent) {
            RemoteHandle::Live(client) => Some(client),
            RemoteHandle::Absent => None,
        }
    }
}

impl fmt::Debug for RemoteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteHandle::Absent => f.write_str("Absent"),
            RemoteHandle::Live(client) => f.debug_tuple("Live").field(&client.name()).finish(),
        }
    }
}

impl From<Box<dyn RemoteClient>> for RemoteHandle {
    fn from(client: Box<dyn RemoteClient>) -> Self {
        RemoteHandle::Live(client)
    }
}
