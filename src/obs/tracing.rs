// self
use crate::{_prelude::*, audit::CorrelationId};

/// Future instrumented with a [`CallSpan`].
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;

/// Span wrapping one outbound call.
///
/// The span opens before the method and URL are resolved; [`CallSpan::record_target`] fills
/// those fields in once they are known.
#[derive(Clone, Debug)]
pub struct CallSpan {
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the call's correlation id.
	pub fn new(correlation_id: &CorrelationId) -> Self {
		let span = tracing::info_span!(
			"rest_foundation.call",
			correlation_id = %correlation_id,
			method = tracing::field::Empty,
			url = tracing::field::Empty
		);

		Self { span }
	}

	/// Records the resolved method and URL on the span.
	pub fn record_target(&self, method: &str, url: &str) {
		self.span.record("method", method);
		self.span.record("url", url);
	}

	/// Runs `f` inside the span.
	pub fn in_scope<F, T>(&self, f: F) -> T
	where
		F: FnOnce() -> T,
	{
		self.span.in_scope(f)
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}
