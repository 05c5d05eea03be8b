//! Content-addressed identity of tree positions.
//!
//! A node's position is the `/`-joined tag sequence from the root down to it.
//! Hashing that string gives a key that is identical for the same position in
//! any run, on any machine.

use crate::utils::config::PATH_SEPARATOR;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// Identity block attached to every flattened record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indices {
    pub tag: String,
    pub tag_hash: String,
    /// Root-to-node tag sequence, e.g. `/whole-program/assembly`
    pub path: String,
    pub path_hash: String,
    /// Path of the parent node (empty at the root)
    pub parent: String,
    pub parent_hash: String,
}

impl Indices {
    /// Build the identity of `tag` placed under `parent`
    pub fn new(tag: &str, parent: &str) -> Self {
        let path = child_path(parent, tag);

        Self {
            tag: tag.to_string(),
            tag_hash: md5_hex(tag),
            path_hash: md5_hex(&path),
            path,
            parent: parent.to_string(),
            parent_hash: md5_hex(parent),
        }
    }
}

/// Path of a child `tag` below `parent`
pub fn child_path(parent: &str, tag: &str) -> String {
    format!("{}{}{}", parent, PATH_SEPARATOR, tag)
}

/// Lowercase hex MD5 digest of a UTF-8 string
pub fn md5_hex(s: &str) -> String {
    let hash = Md5::digest(s.as_bytes());
    format!("{:x}", hash)
}
