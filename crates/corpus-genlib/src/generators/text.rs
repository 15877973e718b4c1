//! Generator that re-executes a general-purpose template engine per event.
//!
//! The template is compiled once by Handlebars (strict mode, HTML escaping
//! disabled) with two registered helpers: `generate "field"`, which produces
//! the next value for a bound field, and `awsAZFromRegion "region"`, which
//! resolves a random availability zone. Helpers return structured render
//! errors, so no side-channel error slot is needed: an undeclared field
//! fails the sizing render at construction when a byte budget is set, and
//! otherwise fails the first emit and every later one identically, the
//! lookup being deterministic.

use std::collections::HashMap;
use std::str;
use std::sync::{Arc, Mutex, MutexGuard};

use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, ScopedJson,
};
use serde_json::Value;

use super::{events_for_target, EmitOutcome, Generator, GeneratorError};
use crate::azs;
use crate::bind::{self, ValueEmitter};
use crate::config::Config;
use crate::fields::Fields;
use crate::state::GenState;

const EVENT_TEMPLATE: &str = "event";

type SharedFields = Arc<Mutex<HashMap<String, ValueEmitter>>>;
type SharedState = Arc<Mutex<GenState>>;

pub struct TextTemplateGenerator {
    registry: Handlebars<'static>,
    /// Bounded event ceiling; 0 means unbounded. Fixed at construction.
    tot_events: u64,
    state: SharedState,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RenderError> {
    mutex
        .lock()
        .map_err(|_| RenderError::new("generator state lock poisoned"))
}

fn field_param<'a>(h: &'a Helper<'_, '_>) -> Result<&'a str, RenderError> {
    h.param(0)
        .and_then(|p| p.value().as_str())
        .ok_or_else(|| RenderError::new("generate requires a field name argument"))
}

fn lookup_emitter<'a>(
    fields: &'a mut HashMap<String, ValueEmitter>,
    name: &str,
) -> Result<&'a mut ValueEmitter, RenderError> {
    fields.get_mut(name).ok_or_else(|| {
        RenderError::new(format!("generate called on undeclared field '{name}'"))
    })
}

/// `generate "field"` against the shared run state.
struct GenerateHelper {
    fields: SharedFields,
    state: SharedState,
}

impl HelperDef for GenerateHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'reg, 'rc>, RenderError> {
        let name = field_param(h)?;
        let mut fields = lock(&self.fields)?;
        let emit = lookup_emitter(&mut fields, name)?;
        let mut state = lock(&self.state)?;
        let value = emit(&mut state).map_err(|e| RenderError::new(e.to_string()))?;
        Ok(ScopedJson::Derived(value))
    }
}

/// `generate "field"` for the sizing render: every call draws from fresh
/// isolated state, so the sample neither consumes a run value nor pollutes
/// uniqueness tracking.
struct SampleGenerateHelper {
    fields: SharedFields,
    seed: u64,
}

impl HelperDef for SampleGenerateHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'reg, 'rc>, RenderError> {
        let name = field_param(h)?;
        let mut fields = lock(&self.fields)?;
        let emit = lookup_emitter(&mut fields, name)?;
        let mut state = GenState::new(self.seed);
        state.track_field(name);
        let value = emit(&mut state).map_err(|e| RenderError::new(e.to_string()))?;
        Ok(ScopedJson::Derived(value))
    }
}

/// `awsAZFromRegion "region"`: uniformly random zone for a known region, or
/// the "NoAZ" sentinel otherwise.
struct AwsAzHelper {
    state: SharedState,
}

impl HelperDef for AwsAzHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'reg, 'rc>, RenderError> {
        let region = h
            .param(0)
            .and_then(|p| p.value().as_str())
            .ok_or_else(|| RenderError::new("awsAZFromRegion requires a region argument"))?;
        let mut state = lock(&self.state)?;
        let zone = azs::random_zone(region, &mut state.rng);
        Ok(ScopedJson::Derived(Value::String(zone.to_string())))
    }
}

/// Compile the template into a strict, non-escaping registry. Syntax errors
/// surface here, at construction.
fn compile(template: &str) -> Result<Handlebars<'static>, GeneratorError> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(handlebars::no_escape);
    registry.register_template_string(EVENT_TEMPLATE, template)?;
    Ok(registry)
}

impl TextTemplateGenerator {
    pub fn new(
        template: &[u8],
        cfg: &Config,
        fields: &Fields,
        tot_size: u64,
    ) -> Result<Self, GeneratorError> {
        let template = str::from_utf8(template)?;

        let mut state = GenState::new(cfg.seed());
        let mut bound = HashMap::new();
        for field in fields.iter() {
            bound.insert(field.name.clone(), bind::bind_value(cfg, field)?);
            state.track_field(&field.name);
        }
        let bound: SharedFields = Arc::new(Mutex::new(bound));

        let tot_events = if tot_size == 0 {
            0
        } else {
            // Size the run from one sample render on a throw-away registry.
            let mut registry = compile(template)?;
            registry.register_helper(
                "generate",
                Box::new(SampleGenerateHelper {
                    fields: Arc::clone(&bound),
                    seed: cfg.seed(),
                }),
            );
            registry.register_helper(
                "awsAZFromRegion",
                Box::new(AwsAzHelper {
                    state: Arc::new(Mutex::new(GenState::new(cfg.seed()))),
                }),
            );
            let sample = registry.render(EVENT_TEMPLATE, &())?;
            events_for_target(tot_size, sample.len())
        };

        let state: SharedState = Arc::new(Mutex::new(state));
        let mut registry = compile(template)?;
        registry.register_helper(
            "generate",
            Box::new(GenerateHelper {
                fields: bound,
                state: Arc::clone(&state),
            }),
        );
        registry.register_helper(
            "awsAZFromRegion",
            Box::new(AwsAzHelper {
                state: Arc::clone(&state),
            }),
        );

        Ok(Self {
            registry,
            tot_events,
            state,
        })
    }

    /// Bounded event ceiling, 0 when unbounded.
    pub fn tot_events(&self) -> u64 {
        self.tot_events
    }
}

impl Generator for TextTemplateGenerator {
    fn emit(&mut self, buf: &mut Vec<u8>) -> Result<EmitOutcome, GeneratorError> {
        {
            let state = lock(&self.state)?;
            if self.tot_events != 0 && state.counter >= self.tot_events {
                return Ok(EmitOutcome::Exhausted);
            }
        }

        // The lock is released above; helpers re-acquire it per call.
        self.registry
            .render_to_write(EVENT_TEMPLATE, &(), &mut *buf)?;

        let mut state = lock(&self.state)?;
        state.counter += 1;
        Ok(EmitOutcome::Emitted)
    }
}
