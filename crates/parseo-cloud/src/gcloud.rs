//! Failure modes shared by every gcloud invocation.

#[derive(Debug, thiserror::Error)]
pub enum GcloudError {
    #[error("could not run gcloud; install the Cloud SDK: https://cloud.google.com/sdk/docs/install")]
    NotFound { source: std::io::Error },

    #[error("gcloud {args:?} failed:\n{stderr}")]
    CommandFailed { args: Vec<String>, stderr: String },

    #[error("gcloud produced output that is not valid UTF-8")]
    InvalidUtf8 { source: std::string::FromUtf8Error },
}
