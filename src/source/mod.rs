//! Fetching raw table text from local files or an HTTP endpoint.
//!
//! The store only needs `fetch(location) -> text`; everything about
//! where the bytes come from stays behind [`DataSource`].

pub mod file;
pub mod http;

pub use file::FileSource;
pub use http::HttpSource;

use crate::utils::error::SourceError;
use std::sync::Arc;

/// A place table text can be fetched from
pub trait DataSource: Send + Sync {
    /// Fetch the full text stored at `location`
    fn fetch(&self, location: &str) -> Result<String, SourceError>;

    /// Human-readable origin, for logs and reports
    fn describe(&self) -> String;
}

impl<S: DataSource + ?Sized> DataSource for Box<S> {
    fn fetch(&self, location: &str) -> Result<String, SourceError> {
        (**self).fetch(location)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<S: DataSource + ?Sized> DataSource for Arc<S> {
    fn fetch(&self, location: &str) -> Result<String, SourceError> {
        (**self).fetch(location)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Pick an HTTP source for `http(s)://` roots, a file source otherwise
pub fn open_source(root: &str) -> Result<Box<dyn DataSource>, SourceError> {
    if root.starts_with("http://") || root.starts_with("https://") {
        Ok(Box::new(HttpSource::new(root)?))
    } else {
        Ok(Box::new(FileSource::new(root)))
    }
}
