//! Tracing helpers shared by the redemption stages.

// self
use crate::_prelude::*;

/// Pipeline stages observed by the flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Authorization-code-for-token HTTP exchange.
	Exchange,
	/// Unverified id_token payload decode.
	Decode,
	/// Credential cache write.
	Persist,
}
impl Stage {
	/// Returns a stable label suitable for span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stage::Exchange => "exchange",
			Stage::Decode => "decode",
			Stage::Persist => "persist",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Span builder used by the redemption flow.
#[derive(Clone, Debug)]
pub struct StageSpan {
	span: tracing::Span,
}
impl StageSpan {
	/// Creates a new span tagged with the provided stage.
	pub fn new(stage: Stage) -> Self {
		Self { span: tracing::info_span!("roadswap.stage", stage = stage.as_str()) }
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> tracing::span::EnteredSpan {
		self.span.entered()
	}

	/// Instruments an async block without holding a guard across await points.
	pub fn instrument<Fut>(&self, fut: Fut) -> tracing::instrument::Instrumented<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}
