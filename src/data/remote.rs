//! Download raw register exports from the municipal open-data portal.
//!
//! The portal serves plain CSV resources over HTTPS with no credentials, so
//! the client is deliberately small: GET the resource, stream it to the data
//! directory, and let the `clean` subcommand take it from there.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::AppError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub struct DatasetClient {
    client: Client,
}

impl DatasetClient {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("poptrend/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Download one CSV resource into `output_dir`, returning the saved path.
    ///
    /// The file name is taken from the last URL path segment (the portal
    /// exposes resources as `/download/<name>.csv`).
    pub fn download(&self, url: &str, output_dir: &Path) -> Result<PathBuf, AppError> {
        std::fs::create_dir_all(output_dir).map_err(|e| {
            AppError::new(
                2,
                format!("Failed to create output dir '{}': {e}", output_dir.display()),
            )
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| AppError::new(2, format!("Download failed for '{url}': {e}")))?;

        let path = output_dir.join(file_name_from_url(url));
        let bytes = response
            .bytes()
            .map_err(|e| AppError::new(2, format!("Download failed for '{url}': {e}")))?;

        let mut file = File::create(&path)
            .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
        file.write_all(&bytes)
            .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;

        Ok(path)
    }
}

fn file_name_from_url(url: &str) -> String {
    let trimmed = url.split(['?', '#']).next().unwrap_or(url);
    let name = trimmed.rsplit('/').find(|segment| !segment.is_empty());
    match name {
        Some(name) if name.contains('.') => name.to_string(),
        Some(name) => format!("{name}.csv"),
        None => "export.csv".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_comes_from_last_path_segment() {
        assert_eq!(
            file_name_from_url("https://example.org/download/pad_mdbas_2023.csv?format=raw"),
            "pad_mdbas_2023.csv"
        );
        assert_eq!(file_name_from_url("https://example.org/download/export/"), "export.csv");
        assert_eq!(file_name_from_url("https://example.org/resource"), "resource.csv");
    }
}
