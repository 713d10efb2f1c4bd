//! Audited outbound REST pipeline: describe provider endpoints as strategies, decorate them with
//! bearer tokens and status-envelope checks, and record exactly one sanitized audit trail entry
//! for every call.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod audit;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod http;
pub mod obs;
pub mod provider;
pub mod store;
pub mod strategy;
pub mod token;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		error::TransportError,
		http::{HttpRequest, HttpResponse, HttpTransport, TransportFuture},
	};
	#[cfg(feature = "reqwest")]
	use crate::{
		executor::Executor,
		http::ReqwestHttpClient,
		store::{AuditStore, MemoryAuditStore},
	};

	/// Executor type alias used by reqwest-backed integration tests.
	#[cfg(feature = "reqwest")]
	pub type ReqwestTestExecutor = Executor<ReqwestHttpClient>;

	/// In-process transport that records every request and answers with a canned reply.
	#[derive(Debug)]
	pub struct RecordingTransport {
		reply: std::result::Result<HttpResponse, String>,
		requests: Mutex<Vec<HttpRequest>>,
	}
	impl RecordingTransport {
		/// Answers every request with `response`.
		pub fn replying(response: HttpResponse) -> Self {
			Self { reply: Ok(response), requests: Mutex::new(Vec::new()) }
		}

		/// Fails every request with a network error carrying `message`.
		pub fn failing(message: impl Into<String>) -> Self {
			Self { reply: Err(message.into()), requests: Mutex::new(Vec::new()) }
		}

		/// Requests received so far, oldest first.
		pub fn requests(&self) -> Vec<HttpRequest> {
			self.requests.lock().clone()
		}
	}
	impl HttpTransport for RecordingTransport {
		fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
			let url = request.url.clone();

			self.requests.lock().push(request);

			let reply = match &self.reply {
				Ok(response) => Ok(response.clone()),
				Err(message) =>
					Err(TransportError::network(url, std::io::Error::other(message.clone()))),
			};

			Box::pin(async move { reply })
		}
	}

	/// Builds a reqwest HTTP client with a short timeout so a stuck mock server fails the test
	/// instead of hanging it.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.timeout(std::time::Duration::from_secs(10))
			.build()
			.expect("Failed to build Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs an [`Executor`] backed by an in-memory audit store and the reqwest transport
	/// used across integration tests.
	#[cfg(feature = "reqwest")]
	pub fn build_reqwest_test_executor() -> (ReqwestTestExecutor, Arc<MemoryAuditStore>) {
		let store_backend = Arc::new(MemoryAuditStore::default());
		let store: Arc<dyn AuditStore> = store_backend.clone();
		let executor = Executor::with_http_client(store, test_reqwest_http_client());

		(executor, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
#[cfg(test)] use {color_eyre as _, httpmock as _};
