//! Upload and default-folder provisioning configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest accepted default folder name, in characters.
const MAX_FOLDER_NAME_LEN: usize = 255;

/// How the provisioner finds the current default upload folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultFolderLookup {
    /// Use the folder carrying the `default_upload` role. A folder created by
    /// hand with the default name is never adopted.
    #[default]
    Designated,
    /// Use any root folder whose name equals the default folder name.
    ByName,
}

/// Upload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Name given to the automatically provisioned root folder.
    #[serde(default = "default_folder_name")]
    pub default_folder_name: String,
    /// Lookup strategy for the default folder.
    #[serde(default)]
    pub default_folder_lookup: DefaultFolderLookup,
    /// How many times provisioning restarts after losing a creation race.
    #[serde(default = "default_provision_retries")]
    pub provision_retries: u32,
    /// Maximum upload size in bytes (default 200 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            default_folder_name: default_folder_name(),
            default_folder_lookup: DefaultFolderLookup::default(),
            provision_retries: default_provision_retries(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

impl UploadConfig {
    /// Reject settings the provisioner could never act on.
    ///
    /// The default folder name follows the rules for user-created folder
    /// names, and must already be trimmed.
    pub fn validate(&self) -> Result<(), AppError> {
        let name = self.default_folder_name.as_str();
        if name.trim().is_empty() {
            return Err(AppError::configuration(
                "upload.default_folder_name must not be empty",
            ));
        }
        if name.trim() != name {
            return Err(AppError::configuration(
                "upload.default_folder_name must not start or end with whitespace",
            ));
        }
        if name.chars().count() > MAX_FOLDER_NAME_LEN {
            return Err(AppError::configuration(format!(
                "upload.default_folder_name must be at most {MAX_FOLDER_NAME_LEN} characters"
            )));
        }
        if name.contains('/') {
            return Err(AppError::configuration(
                "upload.default_folder_name must not contain '/'",
            ));
        }
        Ok(())
    }
}

fn default_folder_name() -> String {
    "Uploads".to_string()
}

fn default_provision_retries() -> u32 {
    3
}

fn default_max_upload() -> u64 {
    209_715_200 // 200 MB
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;

    use super::*;

    fn named(name: &str) -> UploadConfig {
        UploadConfig {
            default_folder_name: name.to_string(),
            ..UploadConfig::default()
        }
    }

    #[test]
    fn test_default_name_is_valid() {
        assert!(UploadConfig::default().validate().is_ok());
        assert!(named("Incoming media").validate().is_ok());
    }

    #[test]
    fn test_bad_default_names_are_rejected() {
        let long = "x".repeat(MAX_FOLDER_NAME_LEN + 1);
        for bad in ["", "   ", " Uploads", "a/b", long.as_str()] {
            let err = named(bad).validate().unwrap_err();
            assert_eq!(err.kind, ErrorKind::Configuration, "{bad:?}");
        }
    }
}
