//! Provider X endpoint strategies.

// self
use crate::{
	_prelude::*,
	http::Method,
	strategy::{OutboundRequest, RequestStrategy, StrategyFuture},
};

/// Path of the Provider X account-check endpoint.
pub const CHECK_ACCOUNT_PATH: &str = "/account/check";

/// Request payload for [`CheckAccount`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAccountRequest {
	/// Account number to check.
	pub account_no: String,
}

/// Response payload for [`CheckAccount`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAccountResponse {
	/// Provider outcome code.
	pub status_code: Option<String>,
	/// Provider outcome message.
	pub status_message: Option<String>,
	/// Whether the account is active.
	pub is_active: Option<bool>,
	/// Name of the account holder.
	pub account_holder_name: Option<String>,
}

/// Checks an account's status with Provider X (`POST /account/check`).
///
/// Returns a relative path; wrap it in a
/// [`DecoratedStrategy`](crate::strategy::DecoratedStrategy) to target the provider host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckAccount {
	/// Account number to check.
	pub account_no: String,
}
impl CheckAccount {
	/// Creates a check for the given account number.
	pub fn new(account_no: impl Into<String>) -> Self {
		Self { account_no: account_no.into() }
	}
}
impl RequestStrategy for CheckAccount {
	type Request = CheckAccountRequest;
	type Response = CheckAccountResponse;

	fn url(&self) -> Result<String> {
		Ok(CHECK_ACCOUNT_PATH.to_owned())
	}

	fn method(&self) -> Result<Method> {
		Ok(Method::POST)
	}

	fn build_request(&self) -> StrategyFuture<'_, OutboundRequest<Self::Request>> {
		let body = CheckAccountRequest { account_no: self.account_no.clone() };

		Box::pin(async move {
			tracing::debug!("Building Provider X account check request.");

			Ok(OutboundRequest::new(body))
		})
	}

	fn process_result(&self, response: &Self::Response) -> Result<()> {
		let Some(holder) = response.account_holder_name.as_deref().filter(|name| !name.is_empty())
		else {
			tracing::error!("Account holder name is missing in the response.");

			return Err(Error::validation("Account holder name is missing"));
		};

		if response.is_active.is_none() {
			tracing::error!("Account status is missing in the response.");

			return Err(Error::validation("Account status is missing"));
		}

		tracing::info!(account_holder = holder, "Account check passed.");

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ErrorKind;

	fn response(holder: Option<&str>, active: Option<bool>) -> CheckAccountResponse {
		CheckAccountResponse {
			status_code: Some("SUCCESS".into()),
			status_message: None,
			is_active: active,
			account_holder_name: holder.map(Into::into),
		}
	}

	#[tokio::test]
	async fn posts_the_account_number() {
		let strategy = CheckAccount::new("ACC-1");
		let request = strategy.build_request().await.expect("Request should build.");

		assert_eq!(strategy.url().expect("URL should resolve."), "/account/check");
		assert_eq!(strategy.method().expect("Method should resolve."), Method::POST);
		assert_eq!(
			serde_json::to_value(&request.body).expect("Request should serialize."),
			serde_json::json!({ "accountNo": "ACC-1" })
		);
		assert!(request.headers.is_empty());
	}

	#[test]
	fn validates_holder_then_status() {
		let strategy = CheckAccount::new("ACC-1");

		strategy
			.process_result(&response(Some("Jane Roe"), Some(false)))
			.expect("Complete responses pass.");

		for (holder, active, message) in [
			(None, Some(true), "Account holder name is missing"),
			(Some(""), None, "Account holder name is missing"),
			(Some("Jane Roe"), None, "Account status is missing"),
		] {
			let err = strategy
				.process_result(&response(holder, active))
				.expect_err("Incomplete responses fail.");

			assert_eq!(err.kind(), ErrorKind::Validation);
			assert_eq!(err.to_string(), message);
		}
	}

	#[test]
	fn response_uses_camel_case_fields() {
		let decoded: CheckAccountResponse = serde_json::from_str(
			r#"{"statusCode":"SUCCESS","isActive":true,"accountHolderName":"Jane Roe"}"#,
		)
		.expect("Provider payload should decode.");

		assert_eq!(decoded, response(Some("Jane Roe"), Some(true)));
	}
}
