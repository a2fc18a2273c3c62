use std::cmp::Ordering;
use std::fmt::Write;

use crate::history::{History, Method, ObjectKind, EMPTY_VALUE};

use super::vocabulary::Vocabulary;
use super::Encoder;

/// An event tagged with the logical time it happened at.
///
/// Ordering looks at the stamp only, so a stable sort keeps simultaneous events
/// in the order they were emitted.
#[derive(Debug, Clone)]
pub struct TimeStamped<E> {
    pub stamp: i64,
    pub event: E,
}

impl<E> Ord for TimeStamped<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.stamp.cmp(&other.stamp)
    }
}

impl<E> PartialOrd for TimeStamped<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> PartialEq for TimeStamped<E> {
    fn eq(&self, other: &Self) -> bool {
        self.stamp == other.stamp
    }
}

impl<E> Eq for TimeStamped<E> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Call(CallEvent),
    Return(ReturnEvent),
}

/// The invocation half of an operation. Argument-carrying methods show their value here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallEvent {
    pub sequence: usize,
    pub method: Method,
    pub argument: Option<i64>,
}

/// The response half of an operation. Returnable methods show their value here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnEvent {
    pub sequence: usize,
    pub method: Method,
    pub value: Option<i64>,
}

/// Splits every operation into a call and a return and sorts them all by time.
pub fn events(history: &History) -> Vec<TimeStamped<Event>> {
    let mut events = Vec::with_capacity(history.len() * 2);
    for (sequence, op) in history.numbered() {
        let (argument, value) = if op.method.is_returnable() {
            (None, Some(op.value))
        } else {
            (Some(op.value), None)
        };
        events.push(TimeStamped {
            stamp: op.invocation,
            event: Event::Call(CallEvent {
                sequence,
                method: op.method,
                argument,
            }),
        });
        events.push(TimeStamped {
            stamp: op.response,
            event: Event::Return(ReturnEvent {
                sequence,
                method: op.method,
                value,
            }),
        });
    }
    events.sort();
    events
}

/// The textual shape of one event-trace checker's input.
pub trait TraceGrammar {
    fn header(&self, kind: ObjectKind) -> String;

    fn call(&self, call: &CallEvent, method: &str) -> String;

    fn ret(&self, ret: &ReturnEvent, method: &str) -> String;
}

/// `[n] call m(v)` / `[n] return v` lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketGrammar;

impl TraceGrammar for BracketGrammar {
    fn header(&self, kind: ObjectKind) -> String {
        format!("# @object atomic-{}", kind)
    }

    fn call(&self, call: &CallEvent, method: &str) -> String {
        match call.argument {
            Some(v) => format!("[{}] call {}({})", call.sequence, method, v),
            None => format!("[{}] call {}", call.sequence, method),
        }
    }

    fn ret(&self, ret: &ReturnEvent, _method: &str) -> String {
        match ret.value {
            Some(v) => format!("[{}] return {}", ret.sequence, v),
            None => format!("[{}] return", ret.sequence),
        }
    }
}

/// One EDN map per event, `:invoke` for calls and `:ok` for returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdnGrammar;

impl EdnGrammar {
    fn value(value: Option<i64>) -> String {
        match value {
            Some(v) if v != EMPTY_VALUE => v.to_string(),
            _ => "nil".to_owned(),
        }
    }
}

impl TraceGrammar for EdnGrammar {
    fn header(&self, kind: ObjectKind) -> String {
        format!(";; @object atomic-{}", kind)
    }

    fn call(&self, call: &CallEvent, method: &str) -> String {
        format!(
            "{{:process {}, :type :invoke, :f :{}, :value {}}}",
            call.sequence,
            method,
            EdnGrammar::value(call.argument)
        )
    }

    fn ret(&self, ret: &ReturnEvent, method: &str) -> String {
        format!(
            "{{:process {}, :type :ok, :f :{}, :value {}}}",
            ret.sequence,
            method,
            EdnGrammar::value(ret.value)
        )
    }
}

/// Renders the globally ordered event trace of a history in grammar `G`.
#[derive(Debug, Clone, Default)]
pub struct TraceEncoder<G> {
    grammar: G,
    vocabulary: Vocabulary,
}

impl<G: TraceGrammar> TraceEncoder<G> {
    pub fn new(grammar: G, vocabulary: Vocabulary) -> Self {
        TraceEncoder {
            grammar,
            vocabulary,
        }
    }
}

impl<G: TraceGrammar> Encoder for TraceEncoder<G> {
    fn encode(&self, history: &History) -> String {
        let mut out = self.grammar.header(history.kind());
        out.push('\n');
        for stamped in events(history) {
            let line = match &stamped.event {
                Event::Call(call) => self.grammar.call(call, self.vocabulary.name(call.method)),
                Event::Return(ret) => self.grammar.ret(ret, self.vocabulary.name(ret.method)),
            };
            let _ = writeln!(out, "{}", line);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratorConfig, HistoryGenerator, Mode};

    fn history() -> History {
        History::parse("# queue\n1 enq 4 0 10\n2 deq 4 3 6\n3 peek -1 6 8\n").unwrap()
    }

    #[test]
    fn bracket_trace_is_time_ordered() {
        let trace = TraceEncoder::new(BracketGrammar, Vocabulary::canonical()).encode(&history());
        assert_eq!(
            trace,
            "\
# @object atomic-queue
[1] call enq(4)
[2] call deq
[2] return 4
[3] call peek
[3] return -1
[1] return
"
        );
    }

    #[test]
    fn ties_keep_emission_order() {
        // deq returns at 6, the same tick peek is called.
        let events = events(&history());
        let order: Vec<(i64, usize, bool)> = events
            .iter()
            .map(|e| match e.event {
                Event::Call(c) => (e.stamp, c.sequence, true),
                Event::Return(r) => (e.stamp, r.sequence, false),
            })
            .collect();
        assert_eq!(
            order,
            vec![
                (0, 1, true),
                (3, 2, true),
                (6, 2, false),
                (6, 3, true),
                (8, 3, false),
                (10, 1, false),
            ]
        );
    }

    #[test]
    fn edn_trace_uses_renamed_methods() {
        let vocabulary = Vocabulary::new(ObjectKind::Queue, vec![("enq", "offer")]).unwrap();
        let trace = TraceEncoder::new(EdnGrammar, vocabulary).encode(&history());
        let lines: Vec<&str> = trace.lines().collect();
        assert_eq!(lines[0], ";; @object atomic-queue");
        assert_eq!(lines[1], "{:process 1, :type :invoke, :f :offer, :value 4}");
        assert_eq!(lines[2], "{:process 2, :type :invoke, :f :deq, :value nil}");
        assert_eq!(lines[3], "{:process 2, :type :ok, :f :deq, :value 4}");
        assert_eq!(lines[5], "{:process 3, :type :ok, :f :peek, :value nil}");
        assert_eq!(lines[6], "{:process 1, :type :ok, :f :offer, :value nil}");
    }

    #[test]
    fn grammars_share_one_event_order() {
        let history =
            HistoryGenerator::seeded(ObjectKind::PriorityQueue, GeneratorConfig::default(), 8)
                .generate(Mode::Linearizable, 300);
        let bracket = TraceEncoder::new(BracketGrammar, Vocabulary::canonical()).encode(&history);
        let edn = TraceEncoder::new(EdnGrammar, Vocabulary::canonical()).encode(&history);

        assert_eq!(bracket.lines().count(), 601);
        assert_eq!(edn.lines().count(), 601);

        let stamps: Vec<i64> = events(&history).iter().map(|e| e.stamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));

        let seq_of = |line: &str| -> usize {
            let digits: String = line
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().unwrap()
        };
        for (b, e) in bracket.lines().zip(edn.lines()).skip(1) {
            assert_eq!(seq_of(b), seq_of(e));
        }
    }

    #[test]
    fn header_only_for_empty_history() {
        let trace = TraceEncoder::new(BracketGrammar, Vocabulary::canonical())
            .encode(&History::empty(ObjectKind::Stack));
        assert_eq!(trace, "# @object atomic-stack\n");
    }
}
