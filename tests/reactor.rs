//! §8.9 "reactor wake" scenario: a leaf future that registers a real pipe fd with the reactor
//! and is woken by a genuine kernel readiness event, not a simulated one.

use std::os::unix::io::RawFd;
use std::time::Duration;

use async_core::{Executor, Future, FutureState, Poll, Reactor, Waker, READABLE};

/// Reads whatever is available on `fd` exactly once it becomes readable, then completes.
struct PipeReadOnce {
    state: FutureState<Vec<u8>>,
    fd: RawFd,
    registered: bool,
    progress_count: usize,
}

impl Future<Vec<u8>> for PipeReadOnce {
    fn progress(&mut self, reactor: &mut Reactor<Vec<u8>>, waker: Waker<Vec<u8>>) -> Poll {
        self.progress_count += 1;
        let mut buf = [0u8; 64];
        let n = unsafe { libc::read(self.fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
        if n >= 0 {
            if self.registered {
                reactor.unregister(self.fd).expect("unregister should succeed");
            }
            self.state.set_ok(buf[..n as usize].to_vec());
            return Poll::Completed;
        }
        let err = std::io::Error::last_os_error();
        if err.kind() == std::io::ErrorKind::WouldBlock {
            if !self.registered {
                reactor
                    .register(self.fd, READABLE, waker)
                    .expect("register should succeed");
                self.registered = true;
            }
            return Poll::Pending;
        }
        self.state.set_errcode(1);
        Poll::Failure
    }

    fn is_active(&self) -> bool {
        self.state.is_active()
    }
    fn set_active(&mut self, active: bool) {
        self.state.set_active(active);
    }
    fn set_arg(&mut self, arg: Vec<u8>) {
        self.state.set_arg(arg);
    }
    fn take_ok(&mut self) -> Vec<u8> {
        self.state.take_ok()
    }
    fn errcode(&self) -> i32 {
        self.state.errcode()
    }
}

#[test]
fn reactor_wakes_on_fd_readable() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut fds = [0i32; 2];
    assert_eq!(unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_NONBLOCK) }, 0);
    let (read_fd, write_fd) = (fds[0], fds[1]);

    let mut leaf = PipeReadOnce {
        state: FutureState::new(),
        fd: read_fd,
        registered: false,
        progress_count: 0,
    };
    let mut executor = Executor::<Vec<u8>>::create(4);
    executor.spawn(&mut leaf).unwrap();

    // A second thread makes the fd readable only after the executor has already observed
    // WouldBlock and blocked in `reactor.poll()`, so this exercises a genuine wake rather than
    // a read that happens to succeed on the first try.
    let writer = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        let msg = b"hi";
        let n = unsafe { libc::write(write_fd, msg.as_ptr() as *const libc::c_void, msg.len()) };
        assert_eq!(n, msg.len() as isize);
        unsafe { libc::close(write_fd) };
    });

    executor.run();
    writer.join().unwrap();

    assert_eq!(
        leaf.progress_count, 2,
        "leaf must be progressed exactly twice: once to register, once to complete"
    );
    assert_eq!(leaf.take_ok(), b"hi".to_vec());
    unsafe { libc::close(read_fd) };
}
