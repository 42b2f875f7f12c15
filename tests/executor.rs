//! Executor-level scenarios: FIFO ordering (§8.8) and the ready queue's capacity invariant.

use std::cell::RefCell;
use std::rc::Rc;

use async_core::{Executor, ExecutorError, Future, FutureState, Poll, Reactor, Waker};

/// Completes immediately on first progress and records its label in a shared order log.
struct Labeled {
    state: FutureState<()>,
    label: &'static str,
    order: Rc<RefCell<Vec<&'static str>>>,
}

impl Future<()> for Labeled {
    fn progress(&mut self, _reactor: &mut Reactor<()>, _waker: Waker<()>) -> Poll {
        self.order.borrow_mut().push(self.label);
        self.state.set_ok(());
        Poll::Completed
    }

    fn is_active(&self) -> bool {
        self.state.is_active()
    }
    fn set_active(&mut self, active: bool) {
        self.state.set_active(active);
    }
    fn set_arg(&mut self, arg: ()) {
        self.state.set_arg(arg);
    }
    fn take_ok(&mut self) -> () {
        self.state.take_ok()
    }
    fn errcode(&self) -> i32 {
        self.state.errcode()
    }
}

#[test]
fn fifo_ordering() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let mut a = Labeled { state: FutureState::new(), label: "A", order: order.clone() };
    let mut b = Labeled { state: FutureState::new(), label: "B", order: order.clone() };
    let mut c = Labeled { state: FutureState::new(), label: "C", order: order.clone() };

    let mut executor = Executor::<()>::create(4);
    executor.spawn(&mut a).unwrap();
    executor.spawn(&mut b).unwrap();
    executor.spawn(&mut c).unwrap();
    executor.run();

    assert_eq!(*order.borrow(), vec!["A", "B", "C"]);
}

#[test]
fn spawn_past_capacity_errors() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let mut a = Labeled { state: FutureState::new(), label: "A", order: order.clone() };
    let mut b = Labeled { state: FutureState::new(), label: "B", order: order.clone() };

    let mut executor = Executor::<()>::create(1);
    executor.spawn(&mut a).unwrap();
    match executor.spawn(&mut b) {
        Err(ExecutorError::QueueFull(capacity)) => assert_eq!(capacity, 1),
        other => panic!("expected QueueFull, got {:?}", other),
    }
}
