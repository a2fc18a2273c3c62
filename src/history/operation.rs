use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Sentinel for "no value": an empty removal, or an argument that carries no meaning.
pub const EMPTY_VALUE: i64 = -1;

/// The abstract data type a history talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    #[serde(rename = "stack")]
    Stack,
    #[serde(rename = "queue")]
    Queue,
    #[serde(rename = "pqueue", alias = "priority_queue")]
    PriorityQueue,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 3] = [
        ObjectKind::Stack,
        ObjectKind::Queue,
        ObjectKind::PriorityQueue,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Stack => "stack",
            ObjectKind::Queue => "queue",
            ObjectKind::PriorityQueue => "pqueue",
        }
    }

    /// The three methods of this kind, in insert/peek/remove order.
    pub fn methods(self) -> [Method; 3] {
        [
            Method::of(self, MethodClass::Insert),
            Method::of(self, MethodClass::Peek),
            Method::of(self, MethodClass::Remove),
        ]
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stack" => Ok(ObjectKind::Stack),
            "queue" => Ok(ObjectKind::Queue),
            "pqueue" | "priority_queue" => Ok(ObjectKind::PriorityQueue),
            other => Err(Error::UnknownObjectKind(other.to_owned())),
        }
    }
}

/// What a method does to its object, independent of the object kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodClass {
    Insert,
    Peek,
    Remove,
}

/// Canonical method vocabulary. Each variant belongs to one or more [`ObjectKind`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Push,
    Pop,
    Enq,
    Deq,
    Insert,
    Poll,
    Peek,
}

impl Method {
    pub fn of(kind: ObjectKind, class: MethodClass) -> Method {
        use self::MethodClass as C;
        use self::ObjectKind as K;

        match (kind, class) {
            (_, C::Peek) => Method::Peek,
            (K::Stack, C::Insert) => Method::Push,
            (K::Stack, C::Remove) => Method::Pop,
            (K::Queue, C::Insert) => Method::Enq,
            (K::Queue, C::Remove) => Method::Deq,
            (K::PriorityQueue, C::Insert) => Method::Insert,
            (K::PriorityQueue, C::Remove) => Method::Poll,
        }
    }

    pub fn class(self) -> MethodClass {
        match self {
            Method::Push | Method::Enq | Method::Insert => MethodClass::Insert,
            Method::Peek => MethodClass::Peek,
            Method::Pop | Method::Deq | Method::Poll => MethodClass::Remove,
        }
    }

    pub fn belongs_to(self, kind: ObjectKind) -> bool {
        Method::of(kind, self.class()) == self
    }

    /// Whether the value of this method is produced by the call (shown on the
    /// return event) rather than supplied as an argument (shown on the call event).
    pub fn is_returnable(self) -> bool {
        match self.class() {
            MethodClass::Insert => false,
            MethodClass::Peek | MethodClass::Remove => true,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Method::Push => "push",
            Method::Pop => "pop",
            Method::Enq => "enq",
            Method::Deq => "deq",
            Method::Insert => "insert",
            Method::Poll => "poll",
            Method::Peek => "peek",
        }
    }

    /// Looks up a canonical method name within the vocabulary of `kind`.
    pub fn parse(kind: ObjectKind, name: &str) -> Option<Method> {
        kind.methods().iter().copied().find(|m| m.name() == name)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One timed call on the shared object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub process_id: u64,
    pub method: Method,
    pub value: i64,
    pub invocation: i64,
    pub response: i64,
}

impl Operation {
    pub fn new(
        process_id: u64,
        method: Method,
        value: i64,
        invocation: i64,
        response: i64,
    ) -> Self {
        Operation {
            process_id,
            method,
            value,
            invocation,
            response,
        }
    }

    pub fn has_value(&self) -> bool {
        self.value != EMPTY_VALUE
    }

    /// Whether the call produced what it was asked for.
    ///
    /// Inserts always succeed, even when the inserted value happens to be the
    /// sentinel. Peeks and removals succeed iff they returned a real value.
    pub fn outcome(&self) -> bool {
        match self.method.class() {
            MethodClass::Insert => true,
            MethodClass::Peek | MethodClass::Remove => self.has_value(),
        }
    }

    /// `a` precedes `b` in real time when `a` responds no later than `b` is invoked.
    pub fn precedes(&self, other: &Operation) -> bool {
        self.response <= other.invocation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_are_scoped_to_their_kind() {
        assert_eq!(
            ObjectKind::Stack.methods(),
            [Method::Push, Method::Peek, Method::Pop]
        );
        assert_eq!(
            ObjectKind::Queue.methods(),
            [Method::Enq, Method::Peek, Method::Deq]
        );
        assert_eq!(
            ObjectKind::PriorityQueue.methods(),
            [Method::Insert, Method::Peek, Method::Poll]
        );

        assert!(Method::Peek.belongs_to(ObjectKind::Queue));
        assert!(!Method::Push.belongs_to(ObjectKind::Queue));
        assert_eq!(Method::parse(ObjectKind::Stack, "pop"), Some(Method::Pop));
        assert_eq!(Method::parse(ObjectKind::Stack, "deq"), None);
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in ObjectKind::ALL.iter() {
            assert_eq!(kind.name().parse::<ObjectKind>().unwrap(), *kind);
        }
        assert_eq!(
            "priority_queue".parse::<ObjectKind>().unwrap(),
            ObjectKind::PriorityQueue
        );
        assert!("deque".parse::<ObjectKind>().is_err());
    }

    #[test]
    fn outcome_ignores_sentinel_on_inserts() {
        let push = Operation::new(0, Method::Push, EMPTY_VALUE, 1, 2);
        let pop = Operation::new(0, Method::Pop, EMPTY_VALUE, 3, 4);
        let peek = Operation::new(0, Method::Peek, 7, 3, 4);
        assert!(push.outcome());
        assert!(!pop.outcome());
        assert!(peek.outcome());
    }

    #[test]
    fn returnable_methods() {
        assert!(!Method::Enq.is_returnable());
        assert!(Method::Deq.is_returnable());
        assert!(Method::Peek.is_returnable());
        assert!(Method::Poll.is_returnable());
    }
}
