//! Event generators: the two alternative emitters built on the tokenizer
//! and the field binder.
//!
//! [`custom::CustomTemplateGenerator`] pre-resolves the template into a flat
//! list of literal/emit-function pairs at construction and writes straight
//! into the output buffer. [`text::TextTemplateGenerator`] compiles the
//! template with a general-purpose engine and re-executes it per event. Both
//! size their run once, at construction, by rendering a single sample event
//! against isolated state and dividing the byte budget by its length.

pub mod custom;
pub mod text;

use crate::bind::BindError;

/// Outcome of a single emit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    /// One event was appended to the output buffer.
    Emitted,
    /// The bounded event count has been reached; the buffer was not touched.
    /// This is the normal end-of-stream signal, not a failure.
    Exhausted,
}

/// Error type for generator construction and emission.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A field definition could not produce an emit function, or a bound
    /// emit function failed while rendering an event.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// The template references a field absent from the field definitions.
    #[error("template references undeclared field '{0}'")]
    UndeclaredField(String),

    /// The template is not valid UTF-8 (text-template variant only).
    #[error("template is not valid UTF-8: {0}")]
    TemplateEncoding(#[from] std::str::Utf8Error),

    /// Malformed template syntax (text-template variant only).
    #[error("failed to compile template: {0}")]
    Compile(#[from] handlebars::TemplateError),

    /// Failure during template execution, including undeclared-field
    /// lookups surfaced by the `generate` helper.
    #[error("failed to render event: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// A source of events.
///
/// Emission is synchronous and allocation-free beyond the output buffer;
/// callers drive the loop and stop on [`EmitOutcome::Exhausted`] or a fatal
/// error. A generator must not be shared across threads without external
/// serialization.
pub trait Generator {
    /// Append one event to `buf`, or report exhaustion.
    ///
    /// On error the buffer may hold a partial event; the caller should
    /// discard or truncate it.
    fn emit(&mut self, buf: &mut Vec<u8>) -> Result<EmitOutcome, GeneratorError>;

    /// Release owned resources. Neither variant owns any, so this always
    /// succeeds; it exists for symmetry with resource-owning generators.
    fn close(&mut self) -> Result<(), GeneratorError> {
        Ok(())
    }
}

/// Bounded event count for a target output size given one sample event.
///
/// Floor division, never less than one: a single empty event satisfies any
/// target. Callers handle the unbounded `target_size == 0` case before
/// rendering a sample.
pub(crate) fn events_for_target(target_size: u64, sample_len: usize) -> u64 {
    if sample_len == 0 {
        return 1;
    }
    (target_size / sample_len as u64).max(1)
}
