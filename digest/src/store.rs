//! Content-addressed object stores.
//!
//! Fetching objects over the network is the caller's concern; the digest
//! scheme only needs a readable stream for a locator.

use crate::uri::IpfsLocator;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

/// Opens content-addressed objects as byte streams.
pub trait ObjectStore: Send + Sync {
    /// Open the object at `locator` for streaming.
    fn open(&self, locator: &IpfsLocator) -> io::Result<Box<dyn Read + Send>>;

    /// Human-readable name of this store.
    fn name(&self) -> &str;
}

/// Objects pinned in a local directory, one file per object path.
///
/// `ipfs://host/QmABC/out.txt` resolves to `<root>/QmABC/out.txt`; host and
/// port are ignored.
#[derive(Clone, Debug)]
pub struct DirectoryObjectStore {
    root: PathBuf,
}

impl DirectoryObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl ObjectStore for DirectoryObjectStore {
    fn open(&self, locator: &IpfsLocator) -> io::Result<Box<dyn Read + Send>> {
        let path = locator
            .cid
            .split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment));
        Ok(Box::new(File::open(path)?))
    }

    fn name(&self) -> &str {
        "directory"
    }
}
