//! Public API scenarios for the circular queue

use proptest::prelude::*;
use std::collections::VecDeque;
use streamring::CircularQueue;

#[test]
fn test_documented_walkthrough() {
    let mut queue = CircularQueue::new(Vec::<i32>::new());
    queue.enqueue([1, 2, 3]);

    assert!(queue.advance());
    assert_eq!(queue.value(), Some(&1));
    assert_eq!(queue.peek(0), Some(&2));
    assert_eq!(queue.peek(5), None);

    queue.enqueue([4]);
    let mut observed = Vec::new();
    while queue.advance() {
        observed.push(*queue.value().unwrap());
    }

    assert_eq!(observed, vec![2, 3, 4]);
    assert!(!queue.advance());
}

#[derive(Debug, Clone)]
enum Op {
    Enqueue(Vec<u32>),
    Advance,
    Peek(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(any::<u32>(), 0..6).prop_map(Op::Enqueue),
        Just(Op::Advance),
        (0usize..8).prop_map(Op::Peek),
    ]
}

proptest! {
    /// Every observable result matches a VecDeque model fed the same operations
    #[test]
    fn prop_matches_vecdeque_model(ops in prop::collection::vec(op_strategy(), 0..500)) {
        let mut queue = CircularQueue::default();
        let mut model: VecDeque<u32> = VecDeque::new();
        let mut last: Option<u32> = None;

        for op in ops {
            match op {
                Op::Enqueue(batch) => {
                    model.extend(batch.iter().copied());
                    queue.enqueue(batch);
                }
                Op::Advance => {
                    let advanced = queue.advance();
                    last = model.pop_front();
                    prop_assert_eq!(advanced, last.is_some());
                }
                Op::Peek(offset) => {
                    prop_assert_eq!(queue.peek(offset), model.get(offset));
                }
            }

            prop_assert_eq!(queue.len(), model.len());
            prop_assert_eq!(queue.value().copied(), last);
            prop_assert!(queue.capacity() >= queue.len());
        }
    }
}
