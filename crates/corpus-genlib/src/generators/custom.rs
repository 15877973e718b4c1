//! Generator that pre-resolves the template into a flat emitter list.
//!
//! Construction pays for tokenizing and binding exactly once; emission is a
//! single pass over `{prefix, emit-fn}` pairs plus the trailing literal,
//! with no template engine in the loop. Every structural problem — an
//! invalid field definition or a placeholder naming an undeclared field —
//! is detected at construction, so emission only fails if a bound emit
//! function itself fails.

use super::{events_for_target, EmitOutcome, Generator, GeneratorError};
use crate::bind::{self, BufferEmitter};
use crate::config::Config;
use crate::fields::{FieldType, Fields};
use crate::state::GenState;
use crate::tokenizer::{self, ParsedTemplate};

/// One pre-resolved template step: the literal prefix is written first, then
/// the emit function appends the field's value.
struct Emitter {
    field_name: String,
    field_type: FieldType,
    emit: BufferEmitter,
    prefix: Vec<u8>,
}

pub struct CustomTemplateGenerator {
    /// Bounded event ceiling; 0 means unbounded. Fixed at construction.
    tot_events: u64,
    emitters: Vec<Emitter>,
    trailing: Vec<u8>,
    state: GenState,
}

impl CustomTemplateGenerator {
    pub fn new(
        template: &[u8],
        cfg: &Config,
        fields: &Fields,
        tot_size: u64,
    ) -> Result<Self, GeneratorError> {
        let ParsedTemplate {
            ordered_fields,
            prefix_by_field,
            trailing,
        } = tokenizer::parse(template);

        // Bind every declared field eagerly so definition problems surface
        // here even for fields the template never references.
        let mut state = GenState::new(cfg.seed());
        for field in fields.iter() {
            bind::bind_buffer(cfg, field)?;
            state.track_field(&field.name);
        }

        let mut emitters = Vec::with_capacity(ordered_fields.len());
        for name in ordered_fields {
            let field = fields
                .get(&name)
                .ok_or_else(|| GeneratorError::UndeclaredField(name.clone()))?;
            let prefix = prefix_by_field.get(&name).cloned().unwrap_or_default();
            emitters.push(Emitter {
                emit: bind::bind_buffer(cfg, field)?,
                field_type: field.field_type,
                field_name: name,
                prefix,
            });
        }

        let tot_events = if tot_size == 0 {
            0
        } else {
            estimate(cfg.seed(), &mut emitters, &trailing, tot_size)?
        };

        Ok(Self {
            tot_events,
            emitters,
            trailing,
            state,
        })
    }

    /// Bounded event ceiling, 0 when unbounded.
    pub fn tot_events(&self) -> u64 {
        self.tot_events
    }

    /// The template's placeholder occurrences in emission order.
    pub fn resolved_fields(&self) -> impl Iterator<Item = (&str, FieldType)> + '_ {
        self.emitters
            .iter()
            .map(|e| (e.field_name.as_str(), e.field_type))
    }
}

/// Render one sample event and size the run from it. Each field draws from
/// fresh isolated state so the sample neither consumes a run value nor
/// pollutes uniqueness tracking.
fn estimate(
    seed: u64,
    emitters: &mut [Emitter],
    trailing: &[u8],
    tot_size: u64,
) -> Result<u64, GeneratorError> {
    let mut buf = Vec::new();
    for e in emitters.iter_mut() {
        buf.extend_from_slice(&e.prefix);
        let mut sample_state = GenState::new(seed);
        sample_state.track_field(&e.field_name);
        (e.emit)(&mut sample_state, &mut buf)?;
    }
    buf.extend_from_slice(trailing);
    Ok(events_for_target(tot_size, buf.len()))
}

impl Generator for CustomTemplateGenerator {
    fn emit(&mut self, buf: &mut Vec<u8>) -> Result<EmitOutcome, GeneratorError> {
        if self.tot_events != 0 && self.state.counter >= self.tot_events {
            return Ok(EmitOutcome::Exhausted);
        }

        for e in &mut self.emitters {
            buf.extend_from_slice(&e.prefix);
            (e.emit)(&mut self.state, buf)?;
        }
        buf.extend_from_slice(&self.trailing);

        self.state.counter += 1;
        Ok(EmitOutcome::Emitted)
    }
}
