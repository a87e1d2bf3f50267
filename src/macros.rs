//! Logging macros for structured fields.
//!
//! Fields are written as `key => value` pairs; both sides only need to
//! implement `ToString`.
//!
//! # Examples
//!
//! ```
//! use rust_fallback_logger::prelude::*;
//! use rust_fallback_logger::info;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::new(SystemContext::new(), &MemoryBackend::unavailable("offline"), "p", "s", sink.clone(), ());
//!
//! // Message only
//! info!(logger, "Server started");
//!
//! // With fields
//! let port = 8080;
//! info!(logger, "Server listening", "port" => port, "tls" => false);
//!
//! assert!(sink.contains("port:8080"));
//! assert!(sink.contains("tls:false"));
//! ```

/// Log a message with structured fields at the given severity.
///
/// # Examples
///
/// ```
/// # use rust_fallback_logger::prelude::*;
/// # let logger = Logger::new(SystemContext::new(), &MemoryBackend::new(), "p", "s", MemorySink::new(), ());
/// use rust_fallback_logger::log;
/// log!(logger, Severity::Notice, "Simple message");
/// log!(logger, Severity::Error, "Request failed", "code" => 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut fields = ::std::collections::BTreeMap::<::std::string::String, ::std::string::String>::new();
        $( fields.insert(::std::string::ToString::to_string(&$key), ::std::string::ToString::to_string(&$value)); )*
        $logger.log($severity, $message, $crate::Fields::Keyed(fields))
    }};
}

/// Log a debug-level message.
///
/// ```
/// # use rust_fallback_logger::prelude::*;
/// # let logger = Logger::new(SystemContext::new(), &MemoryBackend::new(), "p", "s", MemorySink::new(), ());
/// use rust_fallback_logger::debug;
/// debug!(logger, "Cache miss", "key" => "user:42");
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// # use rust_fallback_logger::prelude::*;
/// # let logger = Logger::new(SystemContext::new(), &MemoryBackend::new(), "p", "s", MemorySink::new(), ());
/// use rust_fallback_logger::warn;
/// warn!(logger, "Retry scheduled", "attempt" => 3, "of" => 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}
