//! Demonstrates checking a Provider X account through a gateway backed by the default reqwest
//! transport, then reading the resulting audit record back from the in-memory store.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use rest_foundation::{
	executor::Executor,
	gateway::ProviderGateway,
	http::ReqwestHttpClient,
	provider::{Provider, ProviderDescriptor},
	reqwest::Client,
	store::{AuditStore, MemoryAuditStore},
	strategy::CheckAccount,
	token::{StaticTokenSource, TokenSourceRegistry},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let account_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/account/check").header("authorization", "Bearer demo-token");
			then.status(200).header("content-type", "application/json").body(
				"{\"statusCode\":\"SUCCESS\",\"isActive\":true,\"accountHolderName\":\"Jane Roe\"}",
			);
		})
		.await;
	let store = Arc::new(MemoryAuditStore::default());
	let http_client = ReqwestHttpClient::with_client(
		Client::builder().timeout(std::time::Duration::from_secs(5)).build()?,
	);
	let executor = <Executor<ReqwestHttpClient>>::with_http_client(store.clone(), http_client)
		.with_auditor("demo");
	let registry = TokenSourceRegistry::builder()
		.register(Provider::ProviderX, StaticTokenSource::new("demo-token"))
		.build();
	let descriptor =
		ProviderDescriptor::builder(Provider::ProviderX).base_url(server.base_url()).build()?;
	let gateway = ProviderGateway::new(Arc::new(executor), Arc::new(registry), descriptor);
	let account = gateway.execute(CheckAccount::new("ACC-1001")).await?;

	println!(
		"Account holder {} is active: {}.",
		account.account_holder_name.unwrap_or_default(),
		account.is_active.unwrap_or_default()
	);

	account_mock.assert_async().await;

	for record in store.find_all().await? {
		println!(
			"Audit #{}: {} {} -> {} in {}ms.",
			record.id.unwrap_or_default(),
			record.method.as_deref().unwrap_or("-"),
			record.url.unwrap_or_default(),
			record.status,
			record.duration_ms
		);
	}

	Ok(())
}
