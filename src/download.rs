//! Remote image retrieval for url-based cases
//!
//! Uses ureq for synchronous HTTP requests. Images land in a temp file that
//! deletes itself when the returned handle drops.

use crate::error::HarnessError;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempPath;

/// Retrieves a URL into a local file owned by the caller
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<TempPath, HarnessError>;
}

pub struct HttpFetcher {
    agent: ureq::Agent,
    scratch: PathBuf,
    progress: bool,
}

impl HttpFetcher {
    /// `timeout` bounds the whole request, body included
    pub fn new(scratch: &Path, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("image-info-harness/", env!("CARGO_PKG_VERSION")))
            .build();

        Self {
            agent,
            scratch: scratch.to_path_buf(),
            progress: std::io::stderr().is_terminal(),
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<TempPath, HarnessError> {
        let network = |reason: String| HarnessError::Network {
            url: url.to_string(),
            reason,
        };

        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(network(format!("HTTP {}", code))),
            Err(e) => return Err(network(e.to_string())),
        };

        if response.status() != 200 {
            return Err(network(format!("HTTP {}", response.status())));
        }

        let content_length: u64 = response
            .header("Content-Length")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        std::fs::create_dir_all(&self.scratch).map_err(|e| {
            HarnessError::io(format!("Failed to create scratch dir {}", self.scratch.display()), e)
        })?;

        let mut file = tempfile::Builder::new()
            .prefix("image-info-")
            .suffix(&url_suffix(url))
            .tempfile_in(&self.scratch)
            .map_err(|e| HarnessError::io("Failed to create download file", e))?;

        let pb = progress_bar(self.progress, content_length);

        let mut reader = response.into_reader();
        let mut buffer = [0u8; 8192];
        let mut downloaded: u64 = 0;

        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .map_err(|e| network(format!("read failed after {} bytes: {}", downloaded, e)))?;
            if bytes_read == 0 {
                break;
            }

            file.write_all(&buffer[..bytes_read])
                .map_err(|e| HarnessError::io("Failed to write download file", e))?;
            downloaded += bytes_read as u64;
            pb.set_position(downloaded);
        }

        file.flush()
            .map_err(|e| HarnessError::io("Failed to write download file", e))?;
        pb.finish_and_clear();

        tracing::debug!(url, bytes = downloaded, path = %file.path().display(), "downloaded");
        Ok(file.into_temp_path())
    }
}

fn progress_bar(visible: bool, content_length: u64) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    if content_length > 0 {
        let pb = ProgressBar::new(content_length);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {bytes}")
        {
            pb.set_style(style);
        }
        pb
    }
}

/// Keep the remote file's extension so format sniffing still has a hint
fn url_suffix(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.rsplit('/').next().unwrap_or("");
    match name.rfind('.') {
        Some(i) if i > 0 && i + 1 < name.len() => name[i..].to_string(),
        _ => String::new(),
    }
}
