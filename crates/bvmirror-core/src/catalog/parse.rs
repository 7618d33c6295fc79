//! Bucket listing XML structures (S3-style `ListBucketResult`).
//!
//! A page carries either virtual sub-prefixes (directory level) or leaf
//! object keys, never both, plus a truncation flag and continuation marker.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListBucketResult {
    /// The archive serves this as the literal string "true" / "false".
    #[serde(rename = "IsTruncated")]
    pub is_truncated: String,
    #[serde(rename = "NextMarker")]
    pub next_marker: Option<String>,
    #[serde(rename = "CommonPrefixes", default)]
    pub common_prefixes: Vec<CommonPrefix>,
    #[serde(rename = "Contents", default)]
    pub contents: Vec<Contents>,
}

#[derive(Debug, Deserialize)]
pub struct CommonPrefix {
    #[serde(rename = "Prefix")]
    pub prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct Contents {
    #[serde(rename = "Key")]
    pub key: String,
}

impl ListBucketResult {
    pub fn is_truncated(&self) -> bool {
        self.is_truncated == "true"
    }

    /// Entries of this page: sub-prefixes at directory level, keys at leaf level.
    pub fn entries(&self) -> Vec<String> {
        if !self.common_prefixes.is_empty() {
            self.common_prefixes.iter().map(|p| p.prefix.clone()).collect()
        } else {
            self.contents.iter().map(|c| c.key.clone()).collect()
        }
    }
}

pub fn parse_listing(xml: &str) -> Result<ListBucketResult, quick_xml::DeError> {
    quick_xml::de::from_str(xml)
}
