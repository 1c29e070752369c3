//! Append-only submission log.
//!
//! Every line is `[YYYY-MM-DD HH:MM:SS] [level] message`. Lines written before
//! the level tag existed carry no tag; their level is inferred from the text.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::Local;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DOWNLOAD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";
pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 1000;

static LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]\s*(.*)$").expect("Invalid regex pattern"));

static LEVEL_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(info|warning|error|success)\]\s?(.*)$").expect("Invalid regex pattern")
});

static POST_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"post_id[:\s]+(\d+)").expect("Invalid regex pattern"));

static ENDPOINT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"endpoint[:\s]+(https?://[^\s]+)").expect("Invalid regex pattern")
});

static RESPONSE_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"response \((\d+)\)").expect("Invalid regex pattern"));

#[derive(Debug, thiserror::Error)]
pub enum LogStoreError {
    #[error("Log file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Log file {} could not be accessed: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Success => "success",
        }
    }

    /// Level of an untagged line, guessed from its text
    pub fn infer(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("error") || lower.contains("failed") {
            LogLevel::Error
        } else if lower.contains("warning") {
            LogLevel::Warning
        } else if lower.contains("success") || lower.contains("response (200)") {
            LogLevel::Success
        } else {
            LogLevel::Info
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(LogLevel::Info),
            "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "success" => Ok(LogLevel::Success),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub message: String,
    pub level: LogLevel,
    pub form_id: Option<u64>,
    pub endpoint: Option<String>,
    pub response_code: Option<u16>,
    pub raw: String,
}

impl LogEntry {
    /// Parse one log line. Lines without a leading `[timestamp]` are not entries.
    pub fn parse(line: &str) -> Option<LogEntry> {
        let captures = LINE_REGEX.captures(line)?;
        let timestamp = captures.get(1)?.as_str().to_string();
        let rest = captures.get(2).map_or("", |m| m.as_str());

        let (level, message) = match LEVEL_TAG_REGEX.captures(rest) {
            Some(tagged) => {
                let message = tagged.get(2).map_or("", |m| m.as_str()).to_string();
                let level = tagged
                    .get(1)
                    .and_then(|m| m.as_str().parse().ok())
                    .unwrap_or_else(|| LogLevel::infer(&message));
                (level, message)
            }
            None => (LogLevel::infer(rest), rest.to_string()),
        };

        let form_id = POST_ID_REGEX
            .captures(&message)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok());
        let endpoint = ENDPOINT_REGEX
            .captures(&message)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());
        let response_code = RESPONSE_CODE_REGEX
            .captures(&message)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok());

        Some(LogEntry {
            timestamp,
            message,
            level,
            form_id,
            endpoint,
            response_code,
            raw: line.to_string(),
        })
    }
}

/// Query parameters of the log viewer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    /// Case-insensitive substring of the message
    pub filter: Option<String>,
    /// `all` or a level name
    pub log_level: Option<String>,
}

impl LogQuery {
    fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    fn per_page(&self) -> usize {
        self.per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    fn matches(&self, entry: &LogEntry) -> bool {
        let level_ok = match self.log_level.as_deref().map(str::trim) {
            None | Some("") | Some("all") => true,
            Some(level) => entry.level.as_str() == level.to_lowercase(),
        };
        let filter_ok = match self.filter.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(filter) => entry
                .message
                .to_lowercase()
                .contains(&filter.to_lowercase()),
        };
        level_ok && filter_ok
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPage {
    pub entries: Vec<LogEntry>,
    pub total: usize,
    pub pages: usize,
    pub current_page: usize,
}

/// Raw log content served as a file download
#[derive(Debug, Clone)]
pub struct LogDownload {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Format one log line, including the trailing newline
pub fn format_line(timestamp: &str, level: LogLevel, message: &str) -> String {
    // one entry per line
    let message = message.replace(['\r', '\n'], " ");
    format!("[{}] [{}] {}\n", timestamp, level, message)
}

#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> LogStoreError {
        LogStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Append one line with a single write
    pub async fn append(&self, level: LogLevel, message: &str) -> Result<(), LogStoreError> {
        let line = format_line(&Local::now().format(TIMESTAMP_FORMAT).to_string(), level, message);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))
    }

    /// Append and mirror the line to diagnostics. A failed write is reported
    /// through tracing and otherwise ignored.
    pub async fn record(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => error!(target: "anbridge::submission", "{}", message),
            LogLevel::Warning => warn!(target: "anbridge::submission", "{}", message),
            LogLevel::Info | LogLevel::Success => {
                info!(target: "anbridge::submission", "{}", message)
            }
        }

        if let Err(e) = self.append(level, message).await {
            error!("Could not write to submission log: {}", e);
        }
    }

    /// All parsed entries in file order. A missing file has no entries.
    pub async fn read_entries(&self) -> Result<Vec<LogEntry>, LogStoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(LogEntry::parse)
            .collect())
    }

    /// One page of matching entries, newest first
    pub async fn query(&self, query: &LogQuery) -> Result<LogPage, LogStoreError> {
        let page = query.page();
        let per_page = query.per_page();

        let mut entries: Vec<LogEntry> = self
            .read_entries()
            .await?
            .into_iter()
            .filter(|entry| query.matches(entry))
            .collect();
        entries.reverse();

        let total = entries.len();
        let pages = total.div_ceil(per_page);
        let entries = entries
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        Ok(LogPage {
            entries,
            total,
            pages,
            current_page: page,
        })
    }

    /// Truncate the log
    pub async fn clear(&self) -> Result<(), LogStoreError> {
        tokio::fs::write(&self.path, b"")
            .await
            .map_err(|e| self.io_error(e))
    }

    pub async fn download(&self) -> Result<LogDownload, LogStoreError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LogStoreError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(self.io_error(e)),
        };

        Ok(LogDownload {
            filename: format!(
                "anbridge-logs-{}.txt",
                Local::now().format(DOWNLOAD_TIMESTAMP_FORMAT)
            ),
            content,
        })
    }
}
