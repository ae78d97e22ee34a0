//! Input resolution: turn a user-supplied path or URL into document bytes.
//!
//! Converters work on byte slices, so a URL is downloaded straight into
//! memory. The filename is kept alongside the bytes because format
//! dispatch is by extension.
//!
//! Both sources honour a byte ceiling: local files are checked against
//! their metadata before reading, downloads are refused on an oversized
//! `Content-Length` and otherwise streamed with a running cap.

use crate::error::ReaderError;
use futures::{Stream, StreamExt};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Filename used when a URL carries none.
const FALLBACK_FILENAME: &str = "download.txt";

/// Where the bytes came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Local(PathBuf),
    Url(String),
}

/// A resolved document, ready for the orchestrator.
#[derive(Debug, Clone)]
pub struct InputDocument {
    pub bytes: Vec<u8>,
    /// Name used for extension dispatch and reported in the output.
    pub filename: String,
    pub source: InputSource,
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve `input` to bytes.
///
/// URLs are downloaded with `timeout_secs` as the whole-request timeout;
/// anything else is read as a local file. Inputs larger than `max_bytes`
/// fail with [`ReaderError::FileTooLarge`] without being held in memory.
pub async fn resolve_input(
    input: &str,
    timeout_secs: u64,
    max_bytes: usize,
) -> Result<InputDocument, ReaderError> {
    if is_url(input) {
        download_url(input, timeout_secs, max_bytes).await
    } else if input.trim().is_empty() {
        Err(ReaderError::InvalidInput {
            input: input.to_string(),
        })
    } else {
        read_local(Path::new(input), max_bytes).await
    }
}

async fn read_local(path: &Path, max_bytes: usize) -> Result<InputDocument, ReaderError> {
    let io_err = |e: std::io::Error| match e.kind() {
        std::io::ErrorKind::PermissionDenied => ReaderError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ReaderError::FileNotFound {
            path: path.to_path_buf(),
        },
    };

    let size = tokio::fs::metadata(path).await.map_err(io_err)?.len();
    let size = usize::try_from(size).unwrap_or(usize::MAX);
    if size > max_bytes {
        return Err(ReaderError::FileTooLarge {
            size,
            limit: max_bytes,
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(io_err)?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ReaderError::InvalidInput {
            input: path.display().to_string(),
        })?;

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(InputDocument {
        bytes,
        filename,
        source: InputSource::Local(path.to_path_buf()),
    })
}

async fn download_url(
    url: &str,
    timeout_secs: u64,
    max_bytes: usize,
) -> Result<InputDocument, ReaderError> {
    info!("Downloading document from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ReaderError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let map_err = |e: reqwest::Error| {
        if e.is_timeout() {
            ReaderError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ReaderError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    };

    let response = client.get(url).send().await.map_err(map_err)?;

    if !response.status().is_success() {
        return Err(ReaderError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let disposition = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let filename = extract_filename(url, disposition.as_deref());

    let declared = response
        .content_length()
        .map(|len| usize::try_from(len).unwrap_or(usize::MAX));
    if let Some(size) = declared.filter(|&size| size > max_bytes) {
        return Err(ReaderError::FileTooLarge {
            size,
            limit: max_bytes,
        });
    }

    let stream = response.bytes_stream().map(|chunk| chunk.map_err(map_err));
    let bytes = collect_capped(stream, max_bytes, declared).await?;
    info!("Downloaded {} bytes as '{}'", bytes.len(), filename);

    Ok(InputDocument {
        bytes,
        filename,
        source: InputSource::Url(url.to_string()),
    })
}

/// Collect a body stream, failing as soon as more than `max_bytes` arrive.
///
/// `size_hint` only pre-sizes the buffer.
async fn collect_capped<S, B>(
    stream: S,
    max_bytes: usize,
    size_hint: Option<usize>,
) -> Result<Vec<u8>, ReaderError>
where
    S: Stream<Item = Result<B, ReaderError>>,
    B: AsRef<[u8]>,
{
    let mut stream = std::pin::pin!(stream);
    let mut buf = Vec::with_capacity(size_hint.unwrap_or(0).min(max_bytes));

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let chunk = chunk.as_ref();
        let size = buf.len().saturating_add(chunk.len());
        if size > max_bytes {
            return Err(ReaderError::FileTooLarge {
                size,
                limit: max_bytes,
            });
        }
        buf.extend_from_slice(chunk);
    }

    Ok(buf)
}

/// Pick a filename from `Content-Disposition`, else the last URL path
/// segment, else a fallback.
fn extract_filename(url: &str, content_disposition: Option<&str>) -> String {
    if let Some(name) = content_disposition.and_then(disposition_filename) {
        return name;
    }

    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    FALLBACK_FILENAME.to_string()
}

fn disposition_filename(header: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|part| {
        let value = part.strip_prefix("filename=")?;
        let value = value.trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}
