//! Demonstrates plugging a custom [`HttpTransport`] into the executor.
//!
//! 1. Implement [`HttpTransport`] for any client; here an in-process table of canned replies.
//! 2. Wrap it in `Arc` and pass it to [`Executor::with_http_client`].
//! 3. Failures from every stage still produce exactly one audit record per call.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
// self
use rest_foundation::{
	error::TransportError,
	executor::Executor,
	http::{HttpRequest, HttpResponse, HttpTransport, Method, TransportFuture},
	store::{AuditStore, MemoryAuditStore},
	strategy::{CheckAccount, DecoratedStrategy},
	token::StaticTokenSource,
};

const BASE_URL: &str = "mock://provider-x";

/// Answers Provider X account checks from memory.
#[derive(Debug, Default)]
struct CannedTransport;
impl HttpTransport for CannedTransport {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			if request.method != Method::POST {
				return Err(TransportError::invalid_request(request.url, "only POST is supported"));
			}

			let body = request.body.unwrap_or_default();
			let reply = if body.contains("ACC-BLOCKED") {
				r#"{"statusCode":"FAILED","statusMessage":"Account is blocked"}"#
			} else {
				r#"{"statusCode":"SUCCESS","isActive":true,"accountHolderName":"Jane Roe"}"#
			};

			Ok(HttpResponse::new(200, reply))
		})
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let store = Arc::new(MemoryAuditStore::default());
	let executor: Executor<CannedTransport> =
		Executor::with_http_client(store.clone(), Arc::new(CannedTransport));
	let token_source = Arc::new(StaticTokenSource::new("demo-token"));

	for account_no in ["ACC-1001", "ACC-BLOCKED"] {
		let strategy =
			DecoratedStrategy::new(CheckAccount::new(account_no), token_source.clone(), BASE_URL);

		match executor.execute(&strategy).await {
			Ok(account) => println!(
				"{account_no}: holder {}.",
				account.account_holder_name.unwrap_or_default()
			),
			Err(e) => println!("{account_no}: {} ({}).", e, e.kind()),
		}
	}

	for record in store.find_all().await? {
		println!(
			"Audit #{}: {} error={:?}.",
			record.id.unwrap_or_default(),
			record.status,
			record.error_message
		);
	}

	Ok(())
}
