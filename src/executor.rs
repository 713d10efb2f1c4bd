//! Strategy executor that performs one audited outbound call.
//!
//! [`Executor::execute`] resolves a [`RequestStrategy`], adapts it to the wire, calls the
//! transport exactly once, decodes and validates the response, and persists exactly one
//! sanitized [`AuditRecord`](crate::audit::AuditRecord) whatever the outcome.

// self
use crate::{
	_prelude::*,
	audit::{AuditDraft, AuditRecord, CorrelationId, Sanitizer},
	error::TransportError,
	http::{
		self, ACCEPT, APPLICATION_JSON, CONTENT_TYPE, HeaderMap, HeaderValue, HttpRequest,
		HttpTransport, Method,
	},
	obs::{self, CallOutcome, CallSpan},
	store::AuditStore,
	strategy::{OutboundRequest, RequestStrategy},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

const UNRESOLVED_METHOD: &str = "UNRESOLVED";

#[cfg(feature = "reqwest")]
/// Executor specialized for the crate's default reqwest transport.
pub type ReqwestExecutor = Executor<ReqwestHttpClient>;

/// Runs request strategies against an HTTP transport and records an audit trail.
///
/// The executor holds no per-call state: one instance can serve any number of concurrent calls
/// as long as the transport and the audit store tolerate concurrent use. No retries are
/// performed and no timeouts are imposed beyond what the transport enforces.
#[derive(Clone)]
pub struct Executor<C>
where
	C: ?Sized + HttpTransport,
{
	/// HTTP transport used for every outbound call.
	pub http_client: Arc<C>,
	/// Audit store receiving one record per call.
	pub audit_store: Arc<dyn AuditStore>,
	/// Masks sensitive headers and fields before they reach the audit store.
	pub sanitizer: Sanitizer,
	/// Actor stamped into the audit metadata.
	pub auditor: Option<String>,
}
impl<C> Executor<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates an executor that reuses the caller-provided transport.
	pub fn with_http_client(
		audit_store: Arc<dyn AuditStore>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			audit_store,
			sanitizer: Sanitizer::default(),
			auditor: None,
		}
	}

	/// Replaces the sanitizer applied to audit payloads.
	pub fn with_sanitizer(mut self, sanitizer: Sanitizer) -> Self {
		self.sanitizer = sanitizer;

		self
	}

	/// Sets the actor stamped into `created_by`/`updated_by`.
	pub fn with_auditor(mut self, auditor: impl Into<String>) -> Self {
		self.auditor = Some(auditor.into());

		self
	}

	/// Executes `strategy` under a freshly generated correlation id.
	pub async fn execute<S>(&self, strategy: &S) -> Result<S::Response>
	where
		S: RequestStrategy,
	{
		self.execute_correlated(strategy, CorrelationId::generate()).await
	}

	/// Executes `strategy` and tags its audit record with `correlation_id`.
	///
	/// Errors from every stage are surfaced to the caller after the audit record has been
	/// persisted. A failure to persist the record is logged and never replaces the call outcome.
	pub async fn execute_correlated<S>(
		&self,
		strategy: &S,
		correlation_id: CorrelationId,
	) -> Result<S::Response>
	where
		S: RequestStrategy,
	{
		let span = CallSpan::new(&correlation_id);
		let mut draft = AuditDraft::begin(correlation_id, OffsetDateTime::now_utc());

		draft.auditor(self.auditor.as_deref());

		let result = span.instrument(self.run(strategy, &mut draft, &span)).await;
		let method = draft.recorded_method().unwrap_or(UNRESOLVED_METHOD).to_owned();

		match &result {
			Ok(_) => obs::record_call_outcome(&method, CallOutcome::Success),
			Err(e) => {
				draft.fail(e.to_string());

				span.in_scope(|| {
					tracing::error!(kind = %e.kind(), error = %e, "Outbound call failed.")
				});
				obs::record_call_outcome(&method, CallOutcome::Failure);
			},
		}

		span.instrument(self.persist(draft.finish())).await;

		result
	}

	async fn run<S>(
		&self,
		strategy: &S,
		draft: &mut AuditDraft,
		span: &CallSpan,
	) -> Result<S::Response>
	where
		S: RequestStrategy,
	{
		let url = strategy.url()?;

		draft.url(url.as_str());

		let method = strategy.method()?;

		draft.method(&method);
		span.record_target(method.as_str(), http::strip_query(&url));
		obs::record_call_outcome(method.as_str(), CallOutcome::Attempt);

		let OutboundRequest { headers, body } = strategy.build_request().await?;
		let body = serde_json::to_value(&body).map_err(|e| {
			Error::strategy_resolution(format!("Request entity could not be serialized: {e}."))
		})?;

		draft.request(
			self.sanitizer.to_audit_json(&http::headers_to_json(&headers)),
			self.sanitizer.to_audit_json(&body),
		);

		let response_type = strategy.response_type()?;
		let request = wire_request(method, url, headers, body)?;

		tracing::debug!(
			url = http::strip_query(&request.url),
			has_body = request.body.is_some(),
			"Dispatching request."
		);

		let response = self.http_client.send(request).await?;

		draft.response(
			response.status,
			self.sanitizer.to_audit_json(&http::headers_to_json(&response.headers)),
			self.sanitizer.sanitize_text(&response.body),
		);
		tracing::debug!(status = response.status, "Received response.");

		if !response.is_success() {
			return Err(TransportError::UnexpectedStatus { status: response.status }.into());
		}

		let decoded = match response_type.decode(&response.body) {
			Ok(decoded) => decoded,
			Err(e) => {
				let message = e.audit_message(&self.sanitizer);

				tracing::debug!(
					target_type = response_type.name(),
					error = %message,
					"Decoding failed."
				);
				draft.fail(format!("Deserialization error: {message}"));

				return Err(Error::Deserialization);
			},
		};

		strategy.process_result(&decoded)?;

		Ok(decoded)
	}

	async fn persist(&self, record: AuditRecord) {
		let correlation_id = record.correlation_id.clone();

		match self.audit_store.save(record).await {
			Ok(saved) => tracing::info!(
				audit_id = saved.id,
				status = %saved.status,
				duration_ms = saved.duration_ms,
				"Audit record persisted."
			),
			Err(e) => tracing::error!(
				%correlation_id,
				error = %e,
				"Failed to persist audit record."
			),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Executor<ReqwestHttpClient> {
	/// Creates an executor backed by a default reqwest client.
	///
	/// The default client imposes no timeout; use [`Executor::with_http_client`] with a
	/// configured [`ReqwestHttpClient`] when calls must be bounded.
	pub fn new(audit_store: Arc<dyn AuditStore>) -> Self {
		Self::with_http_client(audit_store, ReqwestHttpClient::default())
	}
}
impl<C> Debug for Executor<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Executor")
			.field("sanitizer", &self.sanitizer)
			.field("auditor", &self.auditor)
			.finish_non_exhaustive()
	}
}

/// Adapts a resolved request to the wire.
///
/// `GET` calls move the top-level scalar fields of the body into the query string and never
/// carry a body. Other methods send the JSON body unless it serialized to `null`.
fn wire_request(
	method: Method,
	url: String,
	mut headers: HeaderMap,
	body: JsonValue,
) -> Result<HttpRequest> {
	let (url, body) = if method == Method::GET {
		(http::append_query(&url, &http::flatten_query_params(&body)), None)
	} else if body.is_null() {
		(url, None)
	} else {
		let text = serde_json::to_string(&body).map_err(|e| {
			Error::strategy_resolution(format!("Request entity could not be serialized: {e}."))
		})?;

		(url, Some(text))
	};

	headers.entry(ACCEPT).or_insert(HeaderValue::from_static(APPLICATION_JSON));

	if body.is_some() {
		headers.entry(CONTENT_TYPE).or_insert(HeaderValue::from_static(APPLICATION_JSON));
	}

	Ok(HttpRequest { method, url, headers, body })
}


#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::{
		_preludet::RecordingTransport,
		audit::{AuditId, AuditStatus},
		error::ErrorKind,
		http::{AUTHORIZATION, HttpResponse},
		store::{MemoryAuditStore, StoreError, StoreFuture},
		strategy::{DecoratedStrategy, StrategyFuture},
		token::StaticTokenSource,
	};

	#[derive(Debug, PartialEq, Serialize, Deserialize)]
	struct Echo {
		value: String,
	}

	#[derive(Debug, Serialize, Deserialize)]
	struct Session {
		token: u64,
	}

	struct Fixed {
		method: Method,
		body: JsonValue,
	}
	impl RequestStrategy for Fixed {
		type Request = JsonValue;
		type Response = Echo;

		fn url(&self) -> Result<String> {
			Ok("https://api.example.com/echo".into())
		}

		fn method(&self) -> Result<Method> {
			Ok(self.method.clone())
		}

		fn build_request(&self) -> StrategyFuture<'_, OutboundRequest<Self::Request>> {
			Box::pin(async {
				Ok(OutboundRequest::new(self.body.clone())
					.with_header(AUTHORIZATION, HeaderValue::from_static("Basic k")))
			})
		}

		fn process_result(&self, response: &Self::Response) -> Result<()> {
			if response.value.is_empty() {
				return Err(Error::validation("Value is missing"));
			}

			Ok(())
		}
	}

	/// Returns the raw body text.
	struct Ping;
	impl RequestStrategy for Ping {
		type Request = ();
		type Response = String;

		fn url(&self) -> Result<String> {
			Ok("https://api.example.com/ping".into())
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

	struct Login;
	impl RequestStrategy for Login {
		type Request = ();
		type Response = Session;

		fn url(&self) -> Result<String> {
			Ok("https://api.example.com/login".into())
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

	struct Unresolvable;
	impl RequestStrategy for Unresolvable {
		type Request = ();
		type Response = String;

		fn url(&self) -> Result<String> {
			Err(Error::strategy_resolution("No endpoint configured"))
		}

		fn method(&self) -> Result<Method> {
			Ok(Method::GET)
		}

		fn build_request(&self) -> StrategyFuture<'_, OutboundRequest<Self::Request>> {
			Box::pin(async { Ok(OutboundRequest::new(())) })
		}

		fn process_result(&self, _: &Self::Response) -> Result<()> {
			Ok(())
		}
	}

	/// Store whose writes always fail.
	#[derive(Default)]
	struct BrokenStore {
		saves: AtomicUsize,
	}
	impl BrokenStore {
		fn offline<T>() -> std::result::Result<T, StoreError> {
			Err(StoreError::Backend { message: "database offline".into() })
		}
	}
	impl AuditStore for BrokenStore {
		fn save(&self, _: AuditRecord) -> StoreFuture<'_, AuditRecord> {
			self.saves.fetch_add(1, Ordering::SeqCst);

			Box::pin(async { Self::offline() })
		}

		fn find_by_id(&self, _: AuditId) -> StoreFuture<'_, Option<AuditRecord>> {
			Box::pin(async { Self::offline() })
		}

		fn find_by_correlation_id<'a>(
			&'a self,
			_: &'a str,
		) -> StoreFuture<'a, Option<AuditRecord>> {
			Box::pin(async { Self::offline() })
		}

		fn find_all(&self) -> StoreFuture<'_, Vec<AuditRecord>> {
			Box::pin(async { Self::offline() })
		}

		fn update(&self, _: AuditRecord) -> StoreFuture<'_, AuditRecord> {
			Box::pin(async { Self::offline() })
		}

		fn delete_by_id(&self, _: AuditId) -> StoreFuture<'_, ()> {
			Box::pin(async { Self::offline() })
		}
	}

	fn executor_with(
		transport: RecordingTransport,
	) -> (Executor<RecordingTransport>, Arc<RecordingTransport>, Arc<MemoryAuditStore>) {
		let transport = Arc::new(transport);
		let store = Arc::new(MemoryAuditStore::default());
		let executor = Executor::with_http_client(store.clone(), transport.clone());

		(executor, transport, store)
	}

	fn executor(
		response: HttpResponse,
	) -> (Executor<RecordingTransport>, Arc<RecordingTransport>, Arc<MemoryAuditStore>) {
		executor_with(RecordingTransport::replying(response))
	}

	#[tokio::test]
	async fn successful_call_persists_one_success_record() {
		let mut response_headers = HeaderMap::new();

		response_headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));

		let (executor, transport, store) = executor(
			HttpResponse::new(200, r#"{"value":"pong"}"#).with_headers(response_headers),
		);
		let strategy = Fixed { method: Method::POST, body: serde_json::json!({ "q": "ping" }) };
		let echo = executor.execute(&strategy).await.expect("Call should succeed.");

		assert_eq!(echo, Echo { value: "pong".into() });

		let sent = transport.requests();

		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].body.as_deref(), Some(r#"{"q":"ping"}"#));
		assert_eq!(sent[0].headers[CONTENT_TYPE], APPLICATION_JSON);
		assert_eq!(sent[0].headers[ACCEPT], APPLICATION_JSON);

		let records = store.records();

		assert_eq!(records.len(), 1);
		assert_eq!(records[0].status, AuditStatus::Success);
		assert_eq!(records[0].method.as_deref(), Some("POST"));
		assert_eq!(records[0].response_status, Some(200));
		assert_eq!(records[0].request_headers.as_deref(), Some(r#"{"authorization":"***"}"#));
		assert_eq!(
			records[0].response_headers.as_deref(),
			Some(r#"{"content-type":"application/json"}"#)
		);
		assert!(records[0].error_message.is_none());
	}

	#[tokio::test]
	async fn get_moves_body_into_query() {
		let (executor, transport, _) = executor(HttpResponse::new(200, r#"{"value":"ok"}"#));
		let body = serde_json::json!({ "id": "42", "flag": true });
		let strategy = Fixed { method: Method::GET, body };

		executor.execute(&strategy).await.expect("Call should succeed.");

		let sent = transport.requests();

		assert_eq!(sent[0].url, "https://api.example.com/echo?id=42&flag=true");
		assert!(sent[0].body.is_none());
		assert!(!sent[0].headers.contains_key(CONTENT_TYPE));
	}

	#[tokio::test]
	async fn network_failures_never_record_query_values() {
		let (executor, transport, store) =
			executor_with(RecordingTransport::failing("connection refused"));
		let body = serde_json::json!({ "token": "abc", "id": "1" });
		let err = executor
			.execute(&Fixed { method: Method::GET, body })
			.await
			.expect_err("Network failures propagate.");

		assert_eq!(err.kind(), ErrorKind::Transport);
		assert_eq!(transport.requests()[0].url, "https://api.example.com/echo?token=abc&id=1");

		let record = store.records().pop().expect("A record should be persisted.");
		let message = record.error_message.expect("Failed calls carry a message.");

		assert_eq!(
			message,
			"Network error occurred while calling https://api.example.com/echo: connection refused."
		);
		assert_eq!(record.url.as_deref(), Some("https://api.example.com/echo"));
		assert_eq!(record.request_body.as_deref(), Some(r#"{"token":"***","id":"1"}"#));
	}

	#[tokio::test]
	async fn deserialization_failures_hide_details_from_callers() {
		let (executor, _, store) = executor(HttpResponse::new(200, r#"{"value":7}"#));
		let strategy = Fixed { method: Method::POST, body: JsonValue::Null };
		let err = executor.execute(&strategy).await.expect_err("Numbers are not strings.");

		assert_eq!(err.kind(), ErrorKind::Deserialization);
		assert_eq!(err.to_string(), "Failed to map response to target type.");

		let record = store.records().pop().expect("A record should be persisted.");

		assert_eq!(record.status, AuditStatus::Failed);
		assert!(
			record
				.error_message
				.as_deref()
				.is_some_and(|message| message.starts_with("Deserialization error: value")),
			"unexpected message: {:?}",
			record.error_message
		);
	}

	#[tokio::test]
	async fn deserialization_messages_mask_sensitive_values() {
		let (executor, _, store) = executor(HttpResponse::new(200, r#"{"token":"abc"}"#));
		let err = executor.execute(&Login).await.expect_err("A string token is not a number.");

		assert_eq!(err.kind(), ErrorKind::Deserialization);

		let record = store.records().pop().expect("A record should be persisted.");

		assert_eq!(
			record.error_message.as_deref(),
			Some("Deserialization error: token: invalid value ***")
		);
		assert_eq!(record.response_body.as_deref(), Some(r#"{"token":"***"}"#));
	}

	#[tokio::test]
	async fn empty_bodies_decode_into_strings() {
		let (executor, _, store) = executor(HttpResponse::new(204, ""));
		let text = executor.execute(&Ping).await.expect("Empty bodies are plain strings.");

		assert_eq!(text, "");

		let record = store.records().pop().expect("A record should be persisted.");

		assert_eq!(record.status, AuditStatus::Success);
		assert_eq!(record.response_status, Some(204));
		assert_eq!(record.response_body.as_deref(), Some(""));
	}

	#[tokio::test]
	async fn validation_failures_are_audited() {
		let (executor, _, store) = executor(HttpResponse::new(200, r#"{"value":""}"#));
		let strategy = Fixed { method: Method::PUT, body: JsonValue::Null };
		let err = executor.execute(&strategy).await.expect_err("Empty values fail validation.");

		assert_eq!(err.kind(), ErrorKind::Validation);

		let record = store.records().pop().expect("A record should be persisted.");

		assert_eq!(record.status, AuditStatus::Failed);
		assert_eq!(record.error_message.as_deref(), Some("Value is missing"));
		assert_eq!(record.response_status, Some(200));
	}

	#[tokio::test]
	async fn non_success_statuses_are_transport_errors() {
		let (executor, _, store) = executor(HttpResponse::new(503, r#"{"token":"leak"}"#));
		let strategy = Fixed { method: Method::DELETE, body: JsonValue::Null };
		let err = executor.execute(&strategy).await.expect_err("5xx responses fail.");

		assert_eq!(err.kind(), ErrorKind::Transport);

		let record = store.records().pop().expect("A record should be persisted.");

		assert_eq!(record.response_status, Some(503));
		assert_eq!(record.response_body.as_deref(), Some(r#"{"token":"***"}"#));
		assert_eq!(record.status, AuditStatus::Failed);
	}

	#[tokio::test]
	async fn resolution_failures_skip_the_transport() {
		let (executor, transport, store) = executor(HttpResponse::new(200, "unused"));
		let correlation_id = CorrelationId::new("corr-unresolvable").expect("Fixture is valid.");
		let err = executor
			.execute_correlated(&Unresolvable, correlation_id)
			.await
			.expect_err("Resolution failures abort the call.");

		assert_eq!(err.kind(), ErrorKind::StrategyResolution);
		assert!(transport.requests().is_empty());

		let record = store.records().pop().expect("A record should be persisted.");

		assert_eq!(record.correlation_id.as_ref(), "corr-unresolvable");
		assert_eq!(record.error_message.as_deref(), Some("No endpoint configured"));
		assert!(record.url.is_none());
		assert!(record.method.is_none());
		assert!(record.response_status.is_none());
	}

	#[tokio::test]
	async fn audit_store_failures_keep_the_call_outcome() {
		let store = Arc::new(BrokenStore::default());
		let transport = Arc::new(RecordingTransport::replying(HttpResponse::new(
			200,
			r#"{"value":"pong"}"#,
		)));
		let executor: Executor<RecordingTransport> =
			Executor::with_http_client(store.clone(), transport);
		let strategy = Fixed { method: Method::POST, body: JsonValue::Null };
		let echo =
			executor.execute(&strategy).await.expect("Store failures are not call failures.");

		assert_eq!(echo, Echo { value: "pong".into() });
		assert_eq!(store.saves.load(Ordering::SeqCst), 1);

		let decorated =
			DecoratedStrategy::new(strategy, Arc::new(StaticTokenSource::new("abc123")), "");
		let err = executor
			.execute(&decorated)
			.await
			.expect_err("Responses without an envelope fail the decorator.");

		assert_eq!(err.kind(), ErrorKind::Envelope);
		assert_eq!(err.to_string(), "Unknown error from provider");
		assert_eq!(store.saves.load(Ordering::SeqCst), 2);
	}
}
