use histgen::config::Config;
use histgen::encode::{Encoder, Format, IntervalEncoder, Vocabulary};
use histgen::generator::{GeneratorConfig, HistoryGenerator, Mode};
use histgen::history::{History, Method, ObjectKind};
use histgen::ingest::{pair_log, parse_scal_log, render_log, Remapper};

const CONFIG: &str = r#"
[implementations]
ms = "queue"
driver = "stack"

[mappings.queue]
"+" = "enq"
"-" = "deq"

[mappings.stack]
push = "push"
push_ack = "push"
pop = "pop"
top = "peek"

[encoders.interval.queue]
enq = "offer"
deq = "take"
"#;

#[test]
fn generated_history_survives_the_canonical_text_format() {
    for kind in ObjectKind::ALL.iter() {
        for mode in [Mode::Linearizable, Mode::NonLinearizable].iter() {
            let history =
                HistoryGenerator::seeded(*kind, GeneratorConfig::default(), 5).generate(*mode, 250);
            let reparsed = History::parse(&history.to_string()).unwrap();
            assert_eq!(reparsed, history);
        }
    }
}

#[test]
fn driver_log_to_every_format() {
    let config = Config::from_toml_str(CONFIG).unwrap();
    let log = "\
[0] 10 push(5)
[1] 11 top
[0] 12 push_ack(5)
[1] 13 5
[2] 14 pop
[2] 15 5
";
    let raw = pair_log(log).unwrap();
    let history = Remapper::new(config.method_table("driver").unwrap())
        .remap(&raw)
        .unwrap();
    assert_eq!(history.to_string(), "# stack\n0 push 5 0 2\n1 peek 5 1 3\n2 pop 5 4 5\n");

    // Idempotent through the raw log renderer.
    assert_eq!(pair_log(&render_log(&raw)).unwrap(), raw);

    let vocabulary = config.vocabulary(Format::Interval, ObjectKind::Stack).unwrap();
    let interval = Format::Interval.encode(&history, vocabulary);
    assert_eq!(interval, "0 2 1 push 5 true\n1 3 2 peek 5 true\n4 5 3 pop 5 true\n");

    let bracket = Format::Bracket.encode(&history, Vocabulary::canonical());
    assert_eq!(
        bracket,
        "# @object atomic-stack\n\
         [1] call push(5)\n[2] call peek\n[1] return\n[2] return 5\n\
         [3] call pop\n[3] return 5\n"
    );

    let edn = Format::Edn.encode(&history, Vocabulary::canonical());
    assert_eq!(edn.lines().count(), 7);
}

#[test]
fn scal_log_with_renamed_interval_methods() {
    let config = Config::from_toml_str(CONFIG).unwrap();
    let log = "+ 3 0 1 2\n- 0 1 2 3\n+ 4 3 4 5\n- 3 4 6 7\n";
    let raw = parse_scal_log(log, true).unwrap();
    let history = Remapper::new(config.method_table("ms").unwrap())
        .remap(&raw)
        .unwrap();
    let methods: Vec<Method> = history.iter().map(|op| op.method).collect();
    assert_eq!(methods, vec![Method::Enq, Method::Enq, Method::Deq]);

    let vocabulary = config.vocabulary(Format::Interval, ObjectKind::Queue).unwrap();
    let encoder = IntervalEncoder::new(vocabulary);
    let text = encoder.encode(&history);
    assert_eq!(text, "0 2 1 offer 3 true\n3 5 2 offer 4 true\n4 7 3 take 3 true\n");

    let decoded = encoder.decode(ObjectKind::Queue, &text).unwrap();
    assert_eq!(decoded, IntervalEncoder::records(&history));
}

#[test]
fn unknown_driver_tokens_abort_the_run() {
    let config = Config::from_toml_str(CONFIG).unwrap();
    let raw = pair_log("[0] pop\n[0] empty\n[1] clear\n[1] ok\n").unwrap();
    assert!(Remapper::new(config.method_table("driver").unwrap())
        .remap(&raw)
        .is_err());
}
