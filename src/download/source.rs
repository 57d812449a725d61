//! Fetching résumé files from the backend.

use std::future::Future;

use reqwest::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};

use super::filename::parse_content_disposition;
use super::DownloadFormat;
use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// A fetched file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    /// Body bytes
    pub bytes: Vec<u8>,
    /// Filename from `Content-Disposition`, if any
    pub filename: Option<String>,
    /// `Content-Type`, if any
    pub content_type: Option<String>,
}

impl FetchedFile {
    /// A file with no headers.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            filename: None,
            content_type: None,
        }
    }

    /// Set the filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Where résumés come from.
pub trait ResumeSource: Send + Sync {
    /// Fetch one résumé in the given stored format (`Pdf` or `Docx`).
    fn fetch(
        &self,
        candidate_id: &str,
        job_id: &str,
        format: DownloadFormat,
    ) -> impl Future<Output = Result<FetchedFile>> + Send;
}

/// [`ResumeSource`] backed by the ATS REST API.
#[derive(Debug, Clone)]
pub struct HttpResumeSource {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpResumeSource {
    /// Build an HTTP client from a config.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Endpoint URL for one résumé.
    pub fn resume_url(&self, candidate_id: &str, job_id: &str, format: DownloadFormat) -> String {
        format!(
            "{}/candidate/download-resume/{}/{}?format={}",
            self.config.base_url,
            urlencoding::encode(candidate_id),
            urlencoding::encode(job_id),
            format.query_value()
        )
    }
}

impl ResumeSource for HttpResumeSource {
    async fn fetch(
        &self,
        candidate_id: &str,
        job_id: &str,
        format: DownloadFormat,
    ) -> Result<FetchedFile> {
        let url = self.resume_url(candidate_id, job_id, format);
        log::info!("Fetching {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let filename = header(CONTENT_DISPOSITION).and_then(|v| parse_content_disposition(&v));
        let content_type = header(CONTENT_TYPE);

        let bytes = response.bytes().await?.to_vec();
        log::debug!(
            "Fetched {} bytes (filename {:?}, type {:?})",
            bytes.len(),
            filename,
            content_type
        );

        Ok(FetchedFile {
            bytes,
            filename,
            content_type,
        })
    }
}
