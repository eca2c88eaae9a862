//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// Blob storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all runtime data.
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Directory for uploaded file blobs, relative to nothing (absolute or
    /// relative to the working directory).
    #[serde(default = "default_upload_root")]
    pub upload_root: String,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// MIME types accepted for departmental data files.
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            upload_root: default_upload_root(),
            max_upload_size_bytes: default_max_upload(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

fn default_data_root() -> String {
    "./data".to_string()
}

fn default_upload_root() -> String {
    "./data/uploads".to_string()
}

fn default_max_upload() -> u64 {
    52_428_800 // 50 MB
}

fn default_allowed_mime_types() -> Vec<String> {
    vec![
        "text/csv".to_string(),
        "application/vnd.ms-excel".to_string(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_mime_defaults_cover_csv_and_xlsx() {
        let cfg = StorageConfig::default();
        assert!(cfg.allowed_mime_types.iter().any(|m| m == "text/csv"));
        assert!(
            cfg.allowed_mime_types
                .iter()
                .any(|m| m.ends_with("spreadsheetml.sheet"))
        );
    }
}
