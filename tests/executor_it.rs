// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use rest_foundation::{
	_preludet::*,
	audit::AuditStatus,
	error::ErrorKind,
	http::Method,
	strategy::{CheckAccount, DecoratedStrategy, OutboundRequest, RequestStrategy, StrategyFuture},
	token::StaticTokenSource,
};

#[derive(Debug, Serialize)]
struct LookupQuery {
	id: String,
	flag: bool,
}

struct Lookup {
	url: String,
}
impl RequestStrategy for Lookup {
	type Request = LookupQuery;
	type Response = JsonValue;

	fn url(&self) -> Result<String> {
		Ok(self.url.clone())
	}

	fn method(&self) -> Result<Method> {
		Ok(Method::GET)
	}

	fn build_request(&self) -> StrategyFuture<'_, OutboundRequest<Self::Request>> {
		Box::pin(async { Ok(OutboundRequest::new(LookupQuery { id: "42".into(), flag: true })) })
	}

	fn process_result(&self, _: &Self::Response) -> Result<()> {
		Ok(())
	}
}

struct Ping {
	url: String,
}
impl RequestStrategy for Ping {
	type Request = ();
	type Response = String;

	fn url(&self) -> Result<String> {
		Ok(self.url.clone())
	}

	fn method(&self) -> Result<Method> {
		Ok(Method::POST)
	}

	fn build_request(&self) -> StrategyFuture<'_, OutboundRequest<Self::Request>> {
		Box::pin(async { Ok(OutboundRequest::new(())) })
	}

	fn process_result(&self, _: &Self::Response) -> Result<()> {
		Ok(())
	}
}

fn check_account(server: &MockServer) -> DecoratedStrategy<CheckAccount> {
	DecoratedStrategy::new(
		CheckAccount::new("ACC-1"),
		Arc::new(StaticTokenSource::new("abc123")),
		server.base_url(),
	)
}

#[tokio::test]
async fn decorated_post_succeeds_and_audits_sanitized_request() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/account/check")
				.header("authorization", "Bearer abc123")
				.header("content-type", "application/json")
				.json_body(json!({ "accountNo": "ACC-1" }));
			then.status(200).header("content-type", "application/json").body(
				r#"{"statusCode":"SUCCESS","isActive":true,"accountHolderName":"Jane Roe"}"#,
			);
		})
		.await;
	let (executor, store) = build_reqwest_test_executor();
	let response = executor
		.execute(&check_account(&server))
		.await
		.expect("Account check should succeed against the mock provider.");

	mock.assert_async().await;

	assert_eq!(response.account_holder_name.as_deref(), Some("Jane Roe"));
	assert_eq!(response.is_active, Some(true));

	let records = store.records();

	assert_eq!(records.len(), 1);

	let record = &records[0];

	assert_eq!(record.status, AuditStatus::Success);
	assert_eq!(record.method.as_deref(), Some("POST"));
	assert_eq!(record.url.as_deref(), Some(server.url("/account/check").as_str()));
	assert_eq!(record.request_headers.as_deref(), Some(r#"{"authorization":"***"}"#));
	assert_eq!(record.request_body.as_deref(), Some(r#"{"accountNo":"ACC-1"}"#));
	assert_eq!(record.response_status, Some(200));
	assert!(
		record
			.response_headers
			.as_deref()
			.is_some_and(|headers| headers.contains("application/json"))
	);
	assert!(record.error_message.is_none());
	assert!(record.id.is_some());
}

#[tokio::test]
async fn get_flattens_request_into_query_string() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/items").query_param("id", "42").query_param("flag", "true");
			then.status(200).header("content-type", "application/json").body(r#"{"found":true}"#);
		})
		.await;
	let (executor, store) = build_reqwest_test_executor();
	let response = executor
		.execute(&Lookup { url: server.url("/items") })
		.await
		.expect("Lookup should succeed.");

	mock.assert_async().await;

	assert_eq!(response, json!({ "found": true }));

	let record = store.records().pop().expect("Lookup should be audited.");

	assert_eq!(record.url.as_deref(), Some(server.url("/items").as_str()));
	assert_eq!(record.request_body.as_deref(), Some(r#"{"id":"42","flag":true}"#));
}

#[tokio::test]
async fn envelope_failure_surfaces_provider_message() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/account/check");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"statusCode":"FAILED","statusMessage":"bad account"}"#);
		})
		.await;
	let (executor, store) = build_reqwest_test_executor();
	let err = executor
		.execute(&check_account(&server))
		.await
		.expect_err("Failed envelopes should fail the call.");

	mock.assert_async().await;

	assert_eq!(err.kind(), ErrorKind::Envelope);
	assert_eq!(err.to_string(), "bad account");

	let records = store.records();

	assert_eq!(records.len(), 1);
	assert_eq!(records[0].status, AuditStatus::Failed);
	assert_eq!(records[0].error_message.as_deref(), Some("bad account"));
	assert_eq!(records[0].response_status, Some(200));
}

#[tokio::test]
async fn non_json_body_is_a_deserialization_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/account/check");
			then.status(200).header("content-type", "text/plain").body("maintenance window");
		})
		.await;
	let (executor, store) = build_reqwest_test_executor();
	let err = executor
		.execute(&check_account(&server))
		.await
		.expect_err("Plain text cannot map onto the account response.");

	mock.assert_async().await;

	assert_eq!(err.kind(), ErrorKind::Deserialization);
	assert_eq!(err.to_string(), "Failed to map response to target type.");

	let record = store.records().pop().expect("The failed call should be audited.");

	assert_eq!(record.status, AuditStatus::Failed);
	assert_eq!(record.response_body.as_deref(), Some("maintenance window"));
	assert!(
		record
			.error_message
			.as_deref()
			.is_some_and(|message| message.starts_with("Deserialization error: ")),
		"unexpected audit message: {:?}",
		record.error_message
	);
}

#[tokio::test]
async fn server_errors_are_recorded_with_masked_bodies() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/account/check");
			then.status(500)
				.header("content-type", "application/json")
				.body(r#"{"error":"boom","secret":"s3cr3t"}"#);
		})
		.await;
	let (executor, store) = build_reqwest_test_executor();
	let err = executor
		.execute(&check_account(&server))
		.await
		.expect_err("HTTP 500 should fail the call.");

	mock.assert_async().await;

	assert_eq!(err.kind(), ErrorKind::Transport);

	let record = store.records().pop().expect("The failed call should be audited.");

	assert_eq!(record.status, AuditStatus::Failed);
	assert_eq!(record.response_status, Some(500));
	assert_eq!(record.response_body.as_deref(), Some(r#"{"error":"boom","secret":"***"}"#));
	assert_eq!(record.error_message.as_deref(), Some("Provider responded with HTTP 500."));
}

#[tokio::test]
async fn duration_covers_the_network_call() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/items");
			then.status(200)
				.header("content-type", "application/json")
				.body("{}")
				.delay(std::time::Duration::from_millis(60));
		})
		.await;

	let (executor, store) = build_reqwest_test_executor();

	executor.execute(&Lookup { url: server.url("/items") }).await.expect("Lookup should succeed.");

	let record = store.records().pop().expect("Lookup should be audited.");

	assert!(record.duration_ms >= 60, "duration was {}ms", record.duration_ms);
}

#[tokio::test]
async fn unreachable_hosts_are_transport_errors() {
	let (executor, store) = build_reqwest_test_executor();
	let err = executor
		.execute(&Lookup { url: "http://127.0.0.1:9/items".into() })
		.await
		.expect_err("Nothing listens on the discard port.");

	assert_eq!(err.kind(), ErrorKind::Transport);

	let record = store.records().pop().expect("The failed call should be audited.");

	assert_eq!(record.status, AuditStatus::Failed);
	assert!(record.response_status.is_none());
	let message = record.error_message.expect("Failed calls carry a message.");

	assert!(message.contains("http://127.0.0.1:9/items"), "unexpected message: {message}");
	assert!(!message.contains("id=42"), "query values leaked: {message}");
}

#[tokio::test]
async fn empty_bodies_map_onto_text_responses() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/ping");
			then.status(204);
		})
		.await;
	let (executor, store) = build_reqwest_test_executor();
	let text = executor
		.execute(&Ping { url: server.url("/ping") })
		.await
		.expect("An empty body is an empty string.");

	mock.assert_async().await;

	assert_eq!(text, "");

	let record = store.records().pop().expect("Ping should be audited.");

	assert_eq!(record.status, AuditStatus::Success);
	assert_eq!(record.response_status, Some(204));
}
