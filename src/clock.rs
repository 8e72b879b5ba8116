use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;

/// What a timed machine wants next from whoever is driving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Call `advance` again after this many milliseconds.
    Wait(u32),
    Done,
}

/// Anything that progresses in timer-sized steps: the typing sequence, a
/// counter, the estimate delay. `advance` is called once to start and then
/// once per elapsed `Step::Wait`.
pub trait Machine {
    fn advance(&mut self) -> Step;
}

/// Runs a machine to completion on the browser event loop.
pub async fn drive<M: Machine>(mut machine: M) {
    loop {
        match machine.advance() {
            Step::Wait(ms) => TimeoutFuture::new(ms).await,
            Step::Done => break,
        }
    }
}

/// Fire-and-forget: there is no handle and no cancellation, the task lives
/// until the machine finishes or the page goes away.
pub fn spawn<M: Machine + 'static>(machine: M) {
    spawn_local(drive(machine));
}

#[cfg(test)]
pub use virtual_clock::VirtualClock;


#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown(u32);

    impl Machine for Countdown {
        fn advance(&mut self) -> Step {
            if self.0 == 0 {
                return Step::Done;
            }
            self.0 -= 1;
            Step::Wait(10)
        }
    }

    #[test]
    fn virtual_clock_sums_waits() {
        let clock = VirtualClock::new();
        let calls = clock.run(&mut Countdown(3));
        assert_eq!(calls, 4);
        assert_eq!(clock.now(), 30);
    }

    #[test]
    fn finished_machine_takes_no_time() {
        let clock = VirtualClock::new();
        assert_eq!(clock.run(&mut Countdown(0)), 1);
        assert_eq!(clock.now(), 0);
    }
}
