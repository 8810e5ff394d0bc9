//! Vimeo API access for vimirror.
//!
//! Two remote operations feed the mirror: asking the API which renditions of a
//! video can be downloaded, and downloading one of them. Both sit behind the
//! [`VideoSource`] trait so the orchestration can be exercised without a network.
//!
//! Every call is a single attempt with bounded timeouts; failures are returned
//! as [`FetchError`](vimirror_error::FetchError) or
//! [`DownloadError`](vimirror_error::DownloadError) and never retried here.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod response;
mod source;

pub use client::{DEFAULT_API_BASE_URL, DEFAULT_DOWNLOAD_TIMEOUT, DEFAULT_TIMEOUT, VimeoClient};
pub use response::parse_metadata;
pub use source::VideoSource;
