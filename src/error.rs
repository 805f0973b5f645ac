use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Failed to parse fixture {}: {source}", path.display())]
    FixtureParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid fixture {name}: {reason}")]
    InvalidFixture { name: String, reason: String },

    #[error("{tool} exited with {}", describe_status(*status))]
    Execution {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("{tool} produced unusable output: {reason}")]
    InvalidOutput {
        tool: String,
        reason: String,
        stderr: String,
    },

    #[error("Failed to retrieve {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Interrupted")]
    Cancelled,

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        HarnessError::Io {
            context: context.into(),
            source,
        }
    }

    /// Diagnostic output captured from a failing tool, if any
    pub fn tool_stderr(&self) -> Option<&str> {
        match self {
            HarnessError::Execution { stderr, .. } | HarnessError::InvalidOutput { stderr, .. } => {
                Some(stderr.as_str()).filter(|s| !s.trim().is_empty())
            }
            _ => None,
        }
    }
}

fn describe_status(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}
