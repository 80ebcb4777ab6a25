//! Exchange a Microsoft Entra ID authorization code for tokens and persist them in the
//! ROADtools credential cache format.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod cache;
pub mod error;
pub mod exchange;
pub mod flow;
pub mod jwt;
pub mod obs;
pub mod token;

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
	};

	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
// Consumed by the binary target and the test harness rather than the library itself.
use {clap as _, color_eyre as _, tokio as _, tracing_subscriber as _};
#[cfg(test)] use httpmock as _;
