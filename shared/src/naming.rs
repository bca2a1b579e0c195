//! Order document naming
//!
//! The server uploads `<prefix>_<id>.<ext>` and the client downloads the
//! same key, so both sides go through [`OrderFileNaming`].

/// Default file name prefix
pub const DEFAULT_PREFIX: &str = "order";
/// Default file extension (plain-text ticket)
pub const DEFAULT_EXT: &str = "txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFileNaming {
    prefix: String,
    ext: String,
}

impl OrderFileNaming {
    pub fn new(prefix: impl Into<String>, ext: impl Into<String>) -> Self {
        let ext = ext.into();
        Self {
            prefix: prefix.into(),
            ext: ext.trim_start_matches('.').to_string(),
        }
    }

    /// `order_12.txt`
    pub fn file_name(&self, id: u64) -> String {
        format!("{}_{}.{}", self.prefix, id, self.ext)
    }
}

impl Default for OrderFileNaming {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, DEFAULT_EXT)
    }
}
