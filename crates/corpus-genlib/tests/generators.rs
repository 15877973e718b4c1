//! End-to-end behavior shared by both generator variants.

use corpus_genlib::{
    Config, CustomTemplateGenerator, EmitOutcome, Fields, Generator, GeneratorError,
    TextTemplateGenerator,
};

fn demo_fields() -> Fields {
    Fields::from_yaml(
        r#"
- name: service
  type: constant_keyword
  value: checkout
- name: level
  type: keyword
- name: status
  type: long
"#,
    )
    .unwrap()
}

fn seeded_config() -> Config {
    Config::from_yaml("seed: 42").unwrap()
}

/// One constant field so the sample event size is exactly known: "AAAA" +
/// "BBBB" = 8 bytes.
fn fixed_size_setup() -> (&'static [u8], Fields) {
    let fields =
        Fields::from_yaml("- name: c\n  type: constant_keyword\n  value: BBBB\n").unwrap();
    (b"AAAA{{.c}}", fields)
}

#[test]
fn test_bounded_count_is_floor_of_target_over_sample() {
    let (template, fields) = fixed_size_setup();

    // 8-byte sample, target 8 * 5 + 3 => exactly 5 events.
    let generator =
        CustomTemplateGenerator::new(template, &Config::default(), &fields, 8 * 5 + 3).unwrap();
    assert_eq!(generator.tot_events(), 5);

    // A target smaller than one event still yields one.
    let generator =
        CustomTemplateGenerator::new(template, &Config::default(), &fields, 3).unwrap();
    assert_eq!(generator.tot_events(), 1);
}

#[test]
fn test_zero_target_means_unbounded() {
    let (template, fields) = fixed_size_setup();

    let mut generator =
        CustomTemplateGenerator::new(template, &Config::default(), &fields, 0).unwrap();
    assert_eq!(generator.tot_events(), 0);

    // Far past any plausible bound, emission keeps going.
    let mut buf = Vec::new();
    for _ in 0..100 {
        assert_eq!(generator.emit(&mut buf).unwrap(), EmitOutcome::Emitted);
    }

    let generator = TextTemplateGenerator::new(
        b"AAAA{{generate \"c\"}}",
        &Config::default(),
        &fields,
        0,
    )
    .unwrap();
    assert_eq!(generator.tot_events(), 0);
}

#[test]
fn test_emit_stops_at_bounded_count() {
    let (template, fields) = fixed_size_setup();
    let mut generator =
        CustomTemplateGenerator::new(template, &Config::default(), &fields, 43).unwrap();
    assert_eq!(generator.tot_events(), 5);

    let mut buf = Vec::new();
    for _ in 0..5 {
        assert_eq!(generator.emit(&mut buf).unwrap(), EmitOutcome::Emitted);
    }
    assert_eq!(buf.len(), 5 * 8);

    // The sixth call signals end-of-stream without touching the buffer.
    assert_eq!(generator.emit(&mut buf).unwrap(), EmitOutcome::Exhausted);
    assert_eq!(buf.len(), 5 * 8);
    assert_eq!(generator.emit(&mut buf).unwrap(), EmitOutcome::Exhausted);

    generator.close().unwrap();
}

#[test]
fn test_text_variant_stops_at_bounded_count() {
    let fields = fixed_size_setup().1;
    let mut generator = TextTemplateGenerator::new(
        b"AAAA{{generate \"c\"}}",
        &Config::default(),
        &fields,
        43,
    )
    .unwrap();
    assert_eq!(generator.tot_events(), 5);

    let mut buf = Vec::new();
    for _ in 0..5 {
        assert_eq!(generator.emit(&mut buf).unwrap(), EmitOutcome::Emitted);
    }
    assert_eq!(generator.emit(&mut buf).unwrap(), EmitOutcome::Exhausted);
    assert_eq!(buf.len(), 5 * 8);
}

#[test]
fn test_variants_produce_identical_bytes_for_the_same_seed() {
    let custom_template = b"svc={{.service}} level={{.level}} status={{.status}}\n";
    let text_template =
        b"svc={{generate \"service\"}} level={{generate \"level\"}} status={{generate \"status\"}}\n";

    let mut custom =
        CustomTemplateGenerator::new(custom_template, &seeded_config(), &demo_fields(), 0)
            .unwrap();
    let mut text =
        TextTemplateGenerator::new(text_template, &seeded_config(), &demo_fields(), 0).unwrap();

    let mut custom_out = Vec::new();
    let mut text_out = Vec::new();
    for _ in 0..20 {
        custom.emit(&mut custom_out).unwrap();
        text.emit(&mut text_out).unwrap();
    }

    assert_eq!(custom_out, text_out);
    assert!(custom_out.starts_with(b"svc=checkout level="));
}

#[test]
fn test_undeclared_field_custom_fails_at_construction() {
    let result =
        CustomTemplateGenerator::new(b"x={{.absent}}", &Config::default(), &demo_fields(), 100);
    assert!(matches!(
        result,
        Err(GeneratorError::UndeclaredField(name)) if name == "absent"
    ));
}

#[test]
fn test_undeclared_field_text_fails_during_estimation() {
    // With a byte budget the sizing render runs at construction and trips
    // the failing lookup there.
    let result = TextTemplateGenerator::new(
        b"x={{generate \"absent\"}}",
        &Config::default(),
        &demo_fields(),
        100,
    );
    assert!(matches!(result, Err(GeneratorError::Render(_))));
}

#[test]
fn test_undeclared_field_text_fails_on_every_emit_when_unbounded() {
    // Without a byte budget there is no sizing render, so the failure can
    // only surface from emit — identically, every time.
    let mut generator = TextTemplateGenerator::new(
        b"x={{generate \"absent\"}}",
        &Config::default(),
        &demo_fields(),
        0,
    )
    .unwrap();

    let mut buf = Vec::new();
    let first = generator.emit(&mut buf).unwrap_err().to_string();
    let second = generator.emit(&mut buf).unwrap_err().to_string();
    assert!(first.contains("absent"), "unexpected error: {first}");
    assert_eq!(first, second);
}

#[test]
fn test_construction_is_idempotent() {
    let (template, fields) = fixed_size_setup();

    let a = CustomTemplateGenerator::new(template, &seeded_config(), &fields, 1_000).unwrap();
    let b = CustomTemplateGenerator::new(template, &seeded_config(), &fields, 1_000).unwrap();
    assert_eq!(a.tot_events(), b.tot_events());

    let text_template: &[u8] = b"AAAA{{generate \"c\"}}";
    let a = TextTemplateGenerator::new(text_template, &seeded_config(), &fields, 1_000).unwrap();
    let b = TextTemplateGenerator::new(text_template, &seeded_config(), &fields, 1_000).unwrap();
    assert_eq!(a.tot_events(), b.tot_events());
}

#[test]
fn test_estimation_does_not_disturb_the_run() {
    // Same template and seed, with and without a sizing render: the emitted
    // bytes must match, because the sample draws from isolated state.
    let template: &[u8] = b"{{.c}} n={{.n}}\n";
    let fields = Fields::from_yaml(
        "- name: c\n  type: constant_keyword\n  value: BBBB\n- name: n\n  type: long\n",
    )
    .unwrap();

    let mut bounded =
        CustomTemplateGenerator::new(template, &seeded_config(), &fields, 10_000).unwrap();
    let mut unbounded =
        CustomTemplateGenerator::new(template, &seeded_config(), &fields, 0).unwrap();

    let mut a = Vec::new();
    let mut b = Vec::new();
    for _ in 0..10 {
        bounded.emit(&mut a).unwrap();
        unbounded.emit(&mut b).unwrap();
    }
    assert_eq!(a, b);
}

#[test]
fn test_template_without_placeholders_replays_literal() {
    let fields = Fields::from_yaml("[]").unwrap();
    let mut generator =
        CustomTemplateGenerator::new(b"hello\n", &Config::default(), &fields, 12).unwrap();
    assert_eq!(generator.tot_events(), 2);

    let mut buf = Vec::new();
    generator.emit(&mut buf).unwrap();
    generator.emit(&mut buf).unwrap();
    assert_eq!(&buf, b"hello\nhello\n");
    assert_eq!(generator.emit(&mut buf).unwrap(), EmitOutcome::Exhausted);
}

#[test]
fn test_empty_template_yields_single_empty_event() {
    // A zero-byte sample cannot divide the target; one empty event
    // satisfies any budget.
    let fields = Fields::from_yaml("[]").unwrap();
    let mut generator =
        CustomTemplateGenerator::new(b"", &Config::default(), &fields, 1_000_000).unwrap();
    assert_eq!(generator.tot_events(), 1);

    let mut buf = Vec::new();
    assert_eq!(generator.emit(&mut buf).unwrap(), EmitOutcome::Emitted);
    assert!(buf.is_empty());
    assert_eq!(generator.emit(&mut buf).unwrap(), EmitOutcome::Exhausted);
}

#[test]
fn test_cardinality_bounds_distinct_values_across_events() {
    let fields = Fields::from_yaml("- name: host\n  type: keyword\n").unwrap();
    let config = Config::from_yaml(
        "seed: 7\nfields:\n  - name: host\n    cardinality: 3\n",
    )
    .unwrap();

    let mut generator =
        CustomTemplateGenerator::new(b"{{.host}}\n", &config, &fields, 0).unwrap();

    let mut buf = Vec::new();
    for _ in 0..50 {
        generator.emit(&mut buf).unwrap();
    }
    let out = String::from_utf8(buf).unwrap();
    let distinct: std::collections::HashSet<&str> = out.lines().collect();
    assert_eq!(distinct.len(), 3);
}
