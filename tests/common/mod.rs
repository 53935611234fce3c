//! Shared test utilities for the integration test suites.
//!
//! Import via `mod common;` from any test file.

#![allow(dead_code)]

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

use docbridge::{ConnectionConfig, ConnectionRegistry, MemoryConnector};

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
});

/// Install the global test subscriber once per test binary.
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

/// An in-memory store with an authenticated `default` bucket (password `pw`)
/// and a registry holding connection `c1` for it.
pub fn c1_registry() -> (Arc<MemoryConnector>, Arc<ConnectionRegistry>) {
    init_tracing();
    let connector = Arc::new(MemoryConnector::new());
    connector.add_bucket("default", Some("pw"));
    let registry = ConnectionRegistry::new(connector.clone());
    registry
        .register(
            ConnectionConfig::new("c1", ["host:8091"]).with_default_bucket("default", Some("pw")),
        )
        .unwrap();
    (connector, Arc::new(registry))
}

/// Log sink for a scoped subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Everything written so far
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    /// Run `f` with a thread-local subscriber writing here
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
