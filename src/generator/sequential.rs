use im::{OrdMap, Vector};

use crate::history::{MethodClass, ObjectKind, EMPTY_VALUE};

/// A sequential reference object: the ground truth every generated value comes from.
pub trait Sequential {
    /// Applies one method and returns what a sequential execution would return.
    fn apply(&mut self, class: MethodClass, value: i64) -> i64;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// LIFO stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequentialStack {
    items: Vector<i64>,
}

impl Sequential for SequentialStack {
    fn apply(&mut self, class: MethodClass, value: i64) -> i64 {
        match class {
            MethodClass::Insert => {
                self.items.push_back(value);
                value
            }
            MethodClass::Peek => self.items.back().copied().unwrap_or(EMPTY_VALUE),
            MethodClass::Remove => self.items.pop_back().unwrap_or(EMPTY_VALUE),
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// FIFO queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequentialQueue {
    items: Vector<i64>,
}

impl Sequential for SequentialQueue {
    fn apply(&mut self, class: MethodClass, value: i64) -> i64 {
        match class {
            MethodClass::Insert => {
                self.items.push_back(value);
                value
            }
            MethodClass::Peek => self.items.front().copied().unwrap_or(EMPTY_VALUE),
            MethodClass::Remove => self.items.pop_front().unwrap_or(EMPTY_VALUE),
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Max-priority queue keyed by the value itself. Duplicates are kept as counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequentialPriorityQueue {
    counts: OrdMap<i64, usize>,
    len: usize,
}

impl SequentialPriorityQueue {
    fn max(&self) -> Option<i64> {
        self.counts.get_max().map(|&(value, _)| value)
    }
}

impl Sequential for SequentialPriorityQueue {
    fn apply(&mut self, class: MethodClass, value: i64) -> i64 {
        match class {
            MethodClass::Insert => {
                let count = self.counts.get(&value).copied().unwrap_or(0);
                self.counts.insert(value, count + 1);
                self.len += 1;
                value
            }
            MethodClass::Peek => self.max().unwrap_or(EMPTY_VALUE),
            MethodClass::Remove => match self.max() {
                Some(max) => {
                    match self.counts.get(&max).copied() {
                        Some(1) | None => {
                            self.counts.remove(&max);
                        }
                        Some(n) => {
                            self.counts.insert(max, n - 1);
                        }
                    }
                    self.len -= 1;
                    max
                }
                None => EMPTY_VALUE,
            },
        }
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// One sequential object of any supported kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequentialObject {
    Stack(SequentialStack),
    Queue(SequentialQueue),
    PriorityQueue(SequentialPriorityQueue),
}

impl SequentialObject {
    pub fn new(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Stack => SequentialObject::Stack(SequentialStack::default()),
            ObjectKind::Queue => SequentialObject::Queue(SequentialQueue::default()),
            ObjectKind::PriorityQueue => {
                SequentialObject::PriorityQueue(SequentialPriorityQueue::default())
            }
        }
    }
}

impl Sequential for SequentialObject {
    fn apply(&mut self, class: MethodClass, value: i64) -> i64 {
        match self {
            SequentialObject::Stack(s) => s.apply(class, value),
            SequentialObject::Queue(q) => q.apply(class, value),
            SequentialObject::PriorityQueue(p) => p.apply(class, value),
        }
    }

    fn len(&self) -> usize {
        match self {
            SequentialObject::Stack(s) => s.len(),
            SequentialObject::Queue(q) => q.len(),
            SequentialObject::PriorityQueue(p) => p.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MethodClass::{Insert, Peek, Remove};

    #[test]
    fn stack_is_lifo() {
        let mut stack = SequentialObject::new(ObjectKind::Stack);
        assert_eq!(stack.apply(Remove, EMPTY_VALUE), EMPTY_VALUE);
        assert_eq!(stack.apply(Insert, 1), 1);
        assert_eq!(stack.apply(Insert, 2), 2);
        assert_eq!(stack.apply(Peek, EMPTY_VALUE), 2);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.apply(Remove, EMPTY_VALUE), 2);
        assert_eq!(stack.apply(Remove, EMPTY_VALUE), 1);
        assert!(stack.is_empty());
    }

    #[test]
    fn queue_is_fifo() {
        let mut queue = SequentialObject::new(ObjectKind::Queue);
        for i in 0..100 {
            queue.apply(Insert, i);
        }
        assert_eq!(queue.apply(Peek, EMPTY_VALUE), 0);
        for i in 0..100 {
            assert_eq!(queue.apply(Remove, EMPTY_VALUE), i);
        }
        assert_eq!(queue.apply(Peek, EMPTY_VALUE), EMPTY_VALUE);
        assert_eq!(queue.apply(Remove, EMPTY_VALUE), EMPTY_VALUE);
    }

    #[test]
    fn priority_queue_polls_the_maximum() {
        let mut pq = SequentialObject::new(ObjectKind::PriorityQueue);
        for v in [5, 9, 1, 9, 3].iter() {
            pq.apply(Insert, *v);
        }
        assert_eq!(pq.len(), 5);
        assert_eq!(pq.apply(Peek, EMPTY_VALUE), 9);
        assert_eq!(pq.apply(Remove, EMPTY_VALUE), 9);
        assert_eq!(pq.apply(Remove, EMPTY_VALUE), 9);
        assert_eq!(pq.apply(Remove, EMPTY_VALUE), 5);
        assert_eq!(pq.len(), 2);
        assert_eq!(pq.apply(Remove, EMPTY_VALUE), 3);
        assert_eq!(pq.apply(Remove, EMPTY_VALUE), 1);
        assert_eq!(pq.apply(Remove, EMPTY_VALUE), EMPTY_VALUE);
        assert!(pq.is_empty());
    }

    #[test]
    fn clones_are_independent() {
        let mut a = SequentialObject::new(ObjectKind::Stack);
        a.apply(Insert, 4);
        let mut b = a.clone();
        b.apply(Remove, EMPTY_VALUE);
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
    }
}
