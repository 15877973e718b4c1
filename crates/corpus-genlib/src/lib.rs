//! Template compilation and event-emission engine for generating synthetic
//! structured events (log- and metric-like records) in bulk.
//!
//! An event template is rendered repeatedly against bound field value
//! generators until either an explicit event count or an aggregate output
//! byte budget is reached. Two emitters are available: a pre-resolved one
//! for the `{{.field}}` placeholder micro-syntax, and a general-purpose
//! template engine with a `generate` helper for everything richer.
//!
//! # Architecture
//!
//! ```text
//! template bytes          fields.yml            config.yml
//!       │                      │                     │
//!       ▼                      ▼                     ▼
//! ┌───────────┐         ┌──────────────┐       ┌──────────┐
//! │ tokenizer │         │ field binder │◄──────│  Config  │
//! └─────┬─────┘         └──────┬───────┘       └──────────┘
//!       │                      │
//!       ▼                      ▼
//!  CustomTemplateGenerator / TextTemplateGenerator
//!       │ emit(&mut buf)                │
//!       ▼                               ▼
//!  events, bounded by the one-shot size estimator
//! ```
//!
//! # Example
//!
//! ```rust
//! use corpus_genlib::{Config, CustomTemplateGenerator, EmitOutcome, Fields, Generator};
//!
//! let fields = Fields::from_yaml(
//!     r#"
//! - name: level
//!   type: keyword
//! - name: status
//!   type: long
//! "#,
//! )
//! .unwrap();
//!
//! let template = b"level={{.level}} status={{.status}}\n";
//! let mut generator =
//!     CustomTemplateGenerator::new(template, &Config::default(), &fields, 4096).unwrap();
//!
//! let mut buf = Vec::new();
//! while let EmitOutcome::Emitted = generator.emit(&mut buf).unwrap() {}
//! assert!(buf.starts_with(b"level="));
//! ```

pub mod azs;
pub mod bind;
pub mod config;
pub mod fields;
pub mod generators;
pub mod state;
pub mod tokenizer;

// Re-exports for convenience
pub use bind::{bind_buffer, bind_value, write_value, BindError, BufferEmitter, ValueEmitter};
pub use config::{Config, ConfigError, DateRange, FieldConfig, NumericRange};
pub use fields::{Field, FieldType, Fields, FieldsError};
pub use generators::custom::CustomTemplateGenerator;
pub use generators::text::TextTemplateGenerator;
pub use generators::{EmitOutcome, Generator, GeneratorError};
pub use state::GenState;
pub use tokenizer::{parse, ParsedTemplate};
