//! JSON serialization for the panconfig IR format.
//!
//! This provides a simple JSON format for reading and writing documents in
//! the panconfig IR. This is useful for:
//! - Debugging translations by inspecting the intermediate representation
//! - Exchanging documents between panconfig instances
//! - Exercising both plugin contracts from a single lossless format

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::model::Document;
use crate::error::PanconfigError;

/// Reads a document from a JSON file in the panconfig IR format.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_ir_json(path: &Path) -> Result<Document, PanconfigError> {
    let file = File::open(path).map_err(PanconfigError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| PanconfigError::IrJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a document to a JSON file in the panconfig IR format.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_ir_json(path: &Path, document: &Document) -> Result<(), PanconfigError> {
    let file = File::create(path).map_err(PanconfigError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, document).map_err(|source| PanconfigError::IrJsonWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a document from a JSON string in the panconfig IR format.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<Document, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a document from JSON bytes.
pub fn from_json_slice(json: &[u8]) -> Result<Document, serde_json::Error> {
    serde_json::from_slice(json)
}

/// Writes a document to a JSON string in the panconfig IR format.
///
/// Useful for testing without file I/O.
pub fn to_json_string(document: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Expression, Output, Resource, Variable};

    fn sample_document() -> Document {
        Document {
            resources: vec![
                Resource::new("aws_s3_bucket", "assets")
                    .with_property("bucket", "my-test-bucket")
                    .with_property("acl", "private")
                    .with_dependency("role_a"),
                Resource::new("aws_iam_role", "role_a"),
            ],
            variables: vec![Variable::new("region", "string")
                .with_default("us-east-1")
                .with_description("Deployment region")],
            outputs: vec![Output::new(
                "bucket_name",
                Expression::reference("aws_s3_bucket.assets.bucket"),
            )],
            ..Default::default()
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let original = sample_document();

        let json = to_json_string(&original).expect("serialization failed");
        let restored = from_json_str(&json).expect("deserialization failed");

        assert_eq!(original, restored);
    }

    #[test]
    fn test_json_format() {
        let document = sample_document();
        let json = to_json_string(&document).expect("serialization failed");

        assert!(json.contains("\"resources\""));
        assert!(json.contains("\"variables\""));
        assert!(json.contains("\"outputs\""));
        assert!(json.contains("\"my-test-bucket\""));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(from_json_str("{\"resources\": [").is_err());
        assert!(from_json_slice(b"\xff\xfe").is_err());
    }
}
