//! Specification fetching and decoding
//!
//! A run reads the specification exactly once, either over HTTP(S) or from a
//! local file. Payloads are gunzipped when either the content encoding says
//! so or the bytes carry the gzip magic number. There is no retry.

use cfn_schema_generator_common::{GeneratorError, Result, Specification};
use flate2::read::GzDecoder;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Published us-east-1 resource specification, served gzip-encoded
pub const DEFAULT_SPEC_URL: &str =
    "https://d1uauaxba7bl26.cloudfront.net/latest/gzip/CloudFormationResourceSpecification.json";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Raw bytes as returned by a source, before decompression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPayload {
    pub bytes: Vec<u8>,

    /// Content encoding reported by the transport, if any
    pub content_encoding: Option<String>,
}

impl RawPayload {
    /// Whether the payload has to be gunzipped before parsing
    pub fn is_gzip(&self) -> bool {
        let declared = self
            .content_encoding
            .as_deref()
            .is_some_and(|encoding| encoding.trim().eq_ignore_ascii_case("gzip"));

        declared || self.bytes.starts_with(&GZIP_MAGIC)
    }
}

/// Where a specification document comes from
#[cfg_attr(test, mockall::automock)]
pub trait SpecSource {
    /// Human readable location, used in error messages
    fn describe(&self) -> String;

    /// Read the raw payload
    fn fetch(&self) -> Result<RawPayload>;
}

/// Fetch a specification with a single HTTP GET
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }
}

impl SpecSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<RawPayload> {
        let response = ureq::get(&self.url).call().map_err(|e| {
            GeneratorError::Fetch(format!("Failed to download {}: {}", self.url, e))
        })?;

        let content_encoding = response.header("Content-Encoding").map(String::from);

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| {
                GeneratorError::Fetch(format!("Failed to read response from {}: {}", self.url, e))
            })?;

        Ok(RawPayload {
            bytes,
            content_encoding,
        })
    }
}

/// Read a specification from the local filesystem
///
/// A `.gz` extension marks the file as gzip-encoded.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SpecSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<RawPayload> {
        let bytes = fs::read(&self.path).map_err(|e| {
            GeneratorError::Fetch(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        let content_encoding = match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("gz") => Some("gzip".to_string()),
            _ => None,
        };

        Ok(RawPayload {
            bytes,
            content_encoding,
        })
    }
}

/// Parsed form of a `--spec` argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecLocation {
    Url(String),
    Path(PathBuf),
}

impl SpecLocation {
    /// `http://` and `https://` locations are URLs, everything else is a path
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SpecLocation::Url(location.to_string())
        } else {
            SpecLocation::Path(PathBuf::from(location))
        }
    }

    pub fn into_source(self) -> Box<dyn SpecSource> {
        match self {
            SpecLocation::Url(url) => Box::new(HttpSource::new(&url)),
            SpecLocation::Path(path) => Box::new(FileSource::new(path)),
        }
    }
}

impl fmt::Display for SpecLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecLocation::Url(url) => write!(f, "{}", url),
            SpecLocation::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Turns a source's payload into a `Specification`
pub struct SpecFetcher;

impl SpecFetcher {
    /// Fetch, decompress and deserialize
    pub fn load(source: &dyn SpecSource) -> Result<Specification> {
        let payload = source.fetch()?;
        let bytes = Self::decode(payload, &source.describe())?;
        Self::parse(&bytes, &source.describe())
    }

    /// Gunzip the payload if needed
    pub fn decode(payload: RawPayload, origin: &str) -> Result<Vec<u8>> {
        if !payload.is_gzip() {
            return Ok(payload.bytes);
        }

        let mut decoded = Vec::new();
        GzDecoder::new(payload.bytes.as_slice())
            .read_to_end(&mut decoded)
            .map_err(|e| {
                GeneratorError::Decompress(format!("Failed to gunzip {}: {}", origin, e))
            })?;

        Ok(decoded)
    }

    pub fn parse(bytes: &[u8], origin: &str) -> Result<Specification> {
        serde_json::from_slice(bytes).map_err(|e| {
            GeneratorError::Deserialize(format!(
                "Failed to parse specification from {}: {}",
                origin, e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const MINIMAL_SPEC: &str = r#"{
        "ResourceSpecificationVersion": "1.0.0",
        "ResourceTypes": {
            "AWS::SNS::Topic": {
                "Properties": {
                    "TopicName": { "PrimitiveType": "String", "Required": false }
                }
            }
        },
        "PropertyTypes": {}
    }"#;

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    fn mock_source(payload: RawPayload) -> MockSpecSource {
        let mut source = MockSpecSource::new();
        source
            .expect_describe()
            .returning(|| "mock://spec".to_string());
        source.expect_fetch().times(1).return_once(move || Ok(payload));
        source
    }

    #[test]
    fn test_load_plain_payload() {
        let source = mock_source(RawPayload {
            bytes: MINIMAL_SPEC.as_bytes().to_vec(),
            content_encoding: None,
        });

        let spec = SpecFetcher::load(&source).unwrap();
        assert_eq!(spec.resource_specification_version, "1.0.0");
        assert!(spec.resources.contains_key("AWS::SNS::Topic"));
    }

    #[test]
    fn test_load_gzip_by_content_encoding() {
        let source = mock_source(RawPayload {
            bytes: gzip(MINIMAL_SPEC.as_bytes()),
            content_encoding: Some("gzip".to_string()),
        });

        let spec = SpecFetcher::load(&source).unwrap();
        assert_eq!(spec.resources.len(), 1);
    }

    #[test]
    fn test_load_gzip_by_magic_bytes() {
        let source = mock_source(RawPayload {
            bytes: gzip(MINIMAL_SPEC.as_bytes()),
            content_encoding: None,
        });

        let spec = SpecFetcher::load(&source).unwrap();
        assert_eq!(spec.resources.len(), 1);
    }

    #[test]
    fn test_declared_gzip_with_plain_body_is_decompress_error() {
        let source = mock_source(RawPayload {
            bytes: MINIMAL_SPEC.as_bytes().to_vec(),
            content_encoding: Some("GZIP".to_string()),
        });

        let err = SpecFetcher::load(&source).unwrap_err();
        assert!(matches!(err, GeneratorError::Decompress(_)), "{:?}", err);
        assert!(err.to_string().contains("mock://spec"));
    }

    #[test]
    fn test_malformed_document_is_deserialize_error() {
        let source = mock_source(RawPayload {
            bytes: b"{\"ResourceTypes\": [".to_vec(),
            content_encoding: None,
        });

        let err = SpecFetcher::load(&source).unwrap_err();
        assert!(matches!(err, GeneratorError::Deserialize(_)), "{:?}", err);
    }

    #[test]
    fn test_fetch_failure_is_propagated() {
        let mut source = MockSpecSource::new();
        source
            .expect_describe()
            .returning(|| "mock://spec".to_string());
        source
            .expect_fetch()
            .return_once(|| Err(GeneratorError::Fetch("connection refused".to_string())));

        let err = SpecFetcher::load(&source).unwrap_err();
        assert!(matches!(err, GeneratorError::Fetch(_)));
    }

    #[test]
    fn test_spec_location_parse() {
        assert_eq!(
            SpecLocation::parse(DEFAULT_SPEC_URL),
            SpecLocation::Url(DEFAULT_SPEC_URL.to_string())
        );
        assert_eq!(
            SpecLocation::parse("HTTP://localhost/spec.json"),
            SpecLocation::Url("HTTP://localhost/spec.json".to_string())
        );
        assert_eq!(
            SpecLocation::parse("./spec.json.gz"),
            SpecLocation::Path(PathBuf::from("./spec.json.gz"))
        );
    }

    #[test]
    fn test_missing_file_is_fetch_error() {
        let source = FileSource::new("/nonexistent/spec.json");
        let err = SpecFetcher::load(&source).unwrap_err();
        assert!(matches!(err, GeneratorError::Fetch(_)));
    }
}
