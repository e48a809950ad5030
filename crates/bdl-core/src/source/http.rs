//! HTTP GET source backed by libcurl.
//!
//! Writes the response body sequentially into the caller's writer.

use std::io::{self, Write};
use std::time::Duration;

use super::ResourceSource;
use crate::config::BdlConfig;
use crate::error::TransferError;

/// Fetches resource `index` from a URL template such as
/// `https://picsum.photos/{width}/{height}`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url_template: String,
    width: u32,
    height: u32,
    connect_timeout: Duration,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url_template: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url_template: url_template.into(),
            width,
            height,
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(300),
        }
    }

    pub fn from_config(cfg: &BdlConfig) -> Self {
        Self::new(cfg.url_template.clone(), cfg.width, cfg.height)
            .with_timeouts(cfg.transfer.connect_timeout(), cfg.transfer.timeout())
    }

    pub fn with_timeouts(mut self, connect: Duration, total: Duration) -> Self {
        self.connect_timeout = connect;
        self.timeout = total;
        self
    }

    /// URL requested for `index`.
    pub fn url_for(&self, index: usize) -> String {
        self.url_template
            .replace("{width}", &self.width.to_string())
            .replace("{height}", &self.height.to_string())
            .replace("{index}", &index.to_string())
    }
}

impl ResourceSource for HttpSource {
    fn fetch(&self, index: usize, out: &mut dyn Write) -> Result<u64, TransferError> {
        let url = self.url_for(index);
        let mut written = 0u64;
        let mut write_err: Option<io::Error> = None;

        let mut easy = curl::easy::Easy::new();
        easy.url(&url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match out.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_err {
            return Err(TransferError::Io(e));
        }
        performed?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(TransferError::Http(code));
        }
        tracing::debug!(index, bytes = written, %url, "GET complete");
        Ok(written)
    }
}
