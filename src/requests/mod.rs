pub mod models;

pub use models::*;

use std::io::{self, Read};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed input document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decodes an input document from `reader`.
pub fn load(reader: impl Read) -> Result<InputDocument, Error> {
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_rejects_garbage_test() {
        assert!(load("not a document".as_bytes()).is_err());
    }

    #[test]
    fn load_minimal_document_test() {
        let doc = load(r#"{"serialization_settings": {"file": "db.bin"}}"#.as_bytes()).unwrap();
        assert!(doc.base_requests.is_empty());
        assert!(doc.stat_requests.is_empty());
        assert!(doc.routing_settings.is_none());
    }
}
