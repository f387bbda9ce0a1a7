//! Nullable object store: in-memory content-addressed objects.

use sarmenta_digest::{IpfsLocator, ObjectStore};
use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::sync::Mutex;

/// An in-memory [`ObjectStore`] keyed by object identifier.
///
/// Host and port of the locator are ignored. Every open is recorded so tests
/// can assert which objects were fetched.
#[derive(Default)]
pub struct NullObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    opened: Mutex<Vec<String>>,
}

impl NullObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`NullObjectStore::pin`].
    pub fn with_object(self, cid: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.pin(cid, content);
        self
    }

    /// Store `content` under `cid`, replacing any previous object.
    pub fn pin(&self, cid: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(cid.into(), content.into());
    }

    pub fn unpin(&self, cid: &str) {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(cid);
    }

    /// Identifiers opened so far, in order.
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ObjectStore for NullObjectStore {
    fn open(&self, locator: &IpfsLocator) -> io::Result<Box<dyn Read + Send>> {
        self.opened
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(locator.cid.clone());
        let objects = self.objects.lock().unwrap_or_else(|e| e.into_inner());
        match objects.get(&locator.cid) {
            Some(content) => Ok(Box::new(Cursor::new(content.clone()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("object {} not pinned", locator.cid),
            )),
        }
    }

    fn name(&self) -> &str {
        "null-object-store"
    }
}
