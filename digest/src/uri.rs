//! Content URIs of the form `scheme://value`.
//!
//! The scheme selects how `value` is interpreted. Parsing splits on the first
//! occurrence of [`SCHEME_SEPARATOR`]; everything after it is the value, even
//! if it contains further separators.

use crate::error::DigestError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Separator between resource type and value.
pub const SCHEME_SEPARATOR: &str = "://";

/// Default API port for content-addressed object gateways.
pub const DEFAULT_IPFS_PORT: u16 = 5001;

/// How committed content is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// Hex-encoded raw bytes.
    Raw,
    /// UTF-8 text, hashed as its bytes.
    Str,
    /// A file on the local filesystem, streamed.
    File,
    /// A content-addressed object, resolved through an [`ObjectStore`](crate::ObjectStore).
    Ipfs,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Str => "str",
            Self::File => "file",
            Self::Ipfs => "ipfs",
        }
    }

    pub fn from_scheme(scheme: &str) -> Result<Self, DigestError> {
        match scheme {
            "raw" => Ok(Self::Raw),
            "str" => Ok(Self::Str),
            "file" => Ok(Self::File),
            "ipfs" => Ok(Self::Ipfs),
            other => Err(DigestError::UnsupportedScheme(other.to_string())),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed content URI.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContentUri {
    resource_type: ResourceType,
    value: String,
}

impl ContentUri {
    /// Parse `scheme://value`.
    pub fn parse(input: &str) -> Result<Self, DigestError> {
        let (scheme, value) = input
            .split_once(SCHEME_SEPARATOR)
            .ok_or_else(|| DigestError::MissingScheme(input.to_string()))?;
        Self::new(ResourceType::from_scheme(scheme)?, value)
    }

    /// Build a URI from its parts, validating `value` for the resource type.
    ///
    /// Validation is syntactic only; whether a file or object exists is
    /// checked when the content is read.
    pub fn new(resource_type: ResourceType, value: impl Into<String>) -> Result<Self, DigestError> {
        let value = value.into();
        match resource_type {
            ResourceType::Raw => {
                hex::decode(&value).map_err(|e| DigestError::malformed("raw", e))?;
            }
            ResourceType::Str => {}
            ResourceType::File => {
                if value.is_empty() {
                    return Err(DigestError::malformed("file", "empty path"));
                }
            }
            ResourceType::Ipfs => {
                IpfsLocator::parse(&value)?;
            }
        }
        Ok(Self {
            resource_type,
            value,
        })
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Filesystem path for `file://` URIs.
    pub fn path(&self) -> Option<PathBuf> {
        match self.resource_type {
            ResourceType::File => Some(PathBuf::from(&self.value)),
            _ => None,
        }
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.resource_type, SCHEME_SEPARATOR, self.value)
    }
}

/// Location of a content-addressed object: `[host[:port]/]cid`.
///
/// Everything before the first `/` is the authority. A value without `/` is
/// a bare cid on `localhost`. Addressing a sub-path below an object needs
/// an explicit host: `localhost/QmOut/result.bin`, since `QmOut/result.bin`
/// reads as host `QmOut` and cid `result.bin`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IpfsLocator {
    pub host: String,
    pub port: u16,
    /// Object identifier, including any sub-path below the root object.
    pub cid: String,
}

impl IpfsLocator {
    pub fn parse(value: &str) -> Result<Self, DigestError> {
        let (authority, cid) = match value.split_once('/') {
            Some((authority, rest)) => (authority, rest),
            None => ("", value),
        };

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|e| DigestError::malformed("ipfs", format!("bad port {port:?}: {e}")))?;
                (host, port)
            }
            None => (authority, DEFAULT_IPFS_PORT),
        };

        if cid.is_empty() {
            return Err(DigestError::malformed("ipfs", "missing object identifier"));
        }
        if cid.split('/').any(|segment| segment.is_empty() || segment == "..") {
            return Err(DigestError::malformed("ipfs", format!("invalid object path {cid:?}")));
        }

        Ok(Self {
            host: if host.is_empty() {
                "localhost".to_string()
            } else {
                host.to_string()
            },
            port,
            cid: cid.to_string(),
        })
    }
}
