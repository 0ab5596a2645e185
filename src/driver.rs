use crate::state::{Simulator, Snapshot};
use anyhow::{anyhow, Context, Result};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Messages from the UI to the ticker thread
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    TogglePause,
    Reset,
    Stop,
}

/// Runs the simulator on its own thread at a fixed rate.
///
/// The thread owns the [`Simulator`]; the UI only ever sees [`Snapshot`]s.
/// Stopping (explicitly or by dropping the driver) joins the thread.
pub struct Driver {
    control: Sender<Control>,
    snapshots: Receiver<Snapshot>,
    handle: Option<JoinHandle<Simulator>>,
}

impl Driver {
    pub fn start(simulator: Simulator, period: Duration) -> Result<Self> {
        let (control_tx, control_rx) = mpsc::channel();
        let (snapshot_tx, snapshot_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("spring-ticker".into())
            .spawn(move || run(simulator, period, control_rx, snapshot_tx))
            .context("failed to spawn ticker thread")?;
        log::info!("ticker started, period {} ms", period.as_millis());
        Ok(Driver {
            control: control_tx,
            snapshots: snapshot_rx,
            handle: Some(handle),
        })
    }

    pub fn snapshots(&self) -> &Receiver<Snapshot> {
        &self.snapshots
    }

    /// Latest snapshot received since the last call, if any
    pub fn latest(&self) -> Option<Snapshot> {
        self.snapshots.try_iter().last()
    }

    pub fn send(&self, control: Control) {
        if self.control.send(control).is_err() {
            log::warn!("ticker is gone, dropping {control:?}");
        }
    }

    /// Stops the ticker and hands back the simulator
    pub fn stop(mut self) -> Result<Simulator> {
        self.shutdown()
            .ok_or_else(|| anyhow!("ticker already stopped"))?
    }

    fn shutdown(&mut self) -> Option<Result<Simulator>> {
        let handle = self.handle.take()?;
        let _ = self.control.send(Control::Stop);
        let result = handle
            .join()
            .map_err(|_| anyhow!("ticker thread panicked"));
        log::info!("ticker stopped");
        Some(result)
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        if let Some(Err(err)) = self.shutdown() {
            log::error!("{err:#}");
        }
    }
}

fn snapshot(simulator: &Simulator, paused: bool) -> Snapshot {
    Snapshot {
        paused,
        ..simulator.snapshot()
    }
}

fn run(
    mut simulator: Simulator,
    period: Duration,
    control: Receiver<Control>,
    snapshots: Sender<Snapshot>,
) -> Simulator {
    let mut paused = false;
    let mut deadline = Instant::now();
    if snapshots.send(snapshot(&simulator, paused)).is_err() {
        return simulator;
    }

    loop {
        let wait = deadline.saturating_duration_since(Instant::now());
        match control.recv_timeout(wait) {
            Ok(Control::Stop) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(Control::TogglePause) => {
                paused = !paused;
                log::debug!("paused: {paused}");
                if snapshots.send(snapshot(&simulator, paused)).is_err() {
                    break;
                }
            }
            Ok(Control::Reset) => {
                simulator.reset();
                log::debug!("reset to displacement {}", simulator.displacement());
                if snapshots.send(snapshot(&simulator, paused)).is_err() {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                // Fixed rate: the next deadline is measured from the previous one
                deadline += period;
                let now = Instant::now();
                if deadline < now {
                    deadline = now;
                }
                if paused {
                    continue;
                }
                simulator.advance();
                let snap = snapshot(&simulator, paused);
                log::trace!(
                    "tick {} position {:.3} velocity {:.3}",
                    snap.tick,
                    snap.position,
                    snap.velocity
                );
                if snapshots.send(snap).is_err() {
                    break;
                }
            }
        }
    }
    simulator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SpringParams;

    const PERIOD: Duration = Duration::from_millis(2);
    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn sends_initial_state_then_ticks() {
        let driver = Driver::start(Simulator::new(SpringParams::default()), PERIOD).unwrap();
        let first = driver.snapshots().recv_timeout(WAIT).unwrap();
        assert_eq!(first.tick, 0);
        assert_eq!(first.position, 375.0);

        let mut last = first.tick;
        for _ in 0..5 {
            let snap = driver.snapshots().recv_timeout(WAIT).unwrap();
            assert_eq!(snap.tick, last + 1);
            last = snap.tick;
        }

        let sim = driver.stop().unwrap();
        assert!(sim.tick() >= last);
    }

    #[test]
    fn stop_closes_snapshot_channel() {
        let mut driver = Driver::start(Simulator::new(SpringParams::default()), PERIOD).unwrap();
        driver.snapshots().recv_timeout(WAIT).unwrap();
        let sim = driver.shutdown().unwrap().unwrap();
        let received: Vec<_> = driver.snapshots().try_iter().collect();
        assert!(received.iter().all(|s| s.tick <= sim.tick()));
        assert_eq!(
            driver.snapshots().recv_timeout(Duration::from_millis(50)),
            Err(RecvTimeoutError::Disconnected)
        );
        assert!(driver.shutdown().is_none());
    }

    #[test]
    fn pause_halts_ticks() {
        let driver = Driver::start(Simulator::new(SpringParams::default()), PERIOD).unwrap();
        while driver.snapshots().recv_timeout(WAIT).unwrap().tick < 2 {}

        driver.send(Control::TogglePause);
        let paused = driver
            .snapshots()
            .iter()
            .find(|s| s.paused)
            .unwrap();
        assert!(driver.snapshots().try_iter().all(|s| s.paused));
        assert_eq!(
            driver.snapshots().recv_timeout(PERIOD * 10),
            Err(RecvTimeoutError::Timeout)
        );

        driver.send(Control::TogglePause);
        let resumed = driver.snapshots().recv_timeout(WAIT).unwrap();
        assert!(!resumed.paused);
        assert_eq!(resumed.tick, paused.tick);
        let next = driver.snapshots().recv_timeout(WAIT).unwrap();
        assert_eq!(next.tick, paused.tick + 1);
        assert!(!next.paused);
        driver.stop().unwrap();
    }

    #[test]
    fn paused_simulator_keeps_its_tick() {
        let driver = Driver::start(Simulator::new(SpringParams::default()), PERIOD).unwrap();
        while driver.snapshots().recv_timeout(WAIT).unwrap().tick < 2 {}
        driver.send(Control::TogglePause);
        let paused = driver
            .snapshots()
            .iter()
            .find(|s| s.paused)
            .unwrap();
        thread::sleep(PERIOD * 10);
        let sim = driver.stop().unwrap();
        assert_eq!(sim.tick(), paused.tick);
    }

    #[test]
    fn reset_while_paused_reports_initial_state() {
        let driver =
            Driver::start(Simulator::new(SpringParams::default()), Duration::from_secs(3600))
                .unwrap();
        // initial snapshot plus the immediate first tick
        assert_eq!(driver.snapshots().recv_timeout(WAIT).unwrap().tick, 0);
        assert_eq!(driver.snapshots().recv_timeout(WAIT).unwrap().tick, 1);
        driver.send(Control::TogglePause);
        assert!(driver.snapshots().recv_timeout(WAIT).unwrap().paused);
        driver.send(Control::Reset);
        let reset = driver.snapshots().recv_timeout(WAIT).unwrap();
        assert_eq!(reset.tick, 0);
        assert_eq!(reset.position, 375.0);
        assert!(reset.paused);
        let sim = driver.stop().unwrap();
        assert_eq!(sim.tick(), 0);
    }

    #[test]
    fn reset_restarts_from_initial_displacement() {
        let driver = Driver::start(Simulator::new(SpringParams::default()), PERIOD).unwrap();
        while driver.snapshots().recv_timeout(WAIT).unwrap().tick < 3 {}
        driver.send(Control::TogglePause);
        driver.send(Control::Reset);
        let reset = driver
            .snapshots()
            .iter()
            .find(|s| s.tick == 0)
            .unwrap();
        assert_eq!(reset.position, 375.0);
        assert_eq!(reset.velocity, 0.0);
        driver.stop().unwrap();
    }

    #[test]
    fn drop_joins_ticker() {
        let driver = Driver::start(Simulator::new(SpringParams::default()), PERIOD).unwrap();
        driver.snapshots().recv_timeout(WAIT).unwrap();
        drop(driver);
    }
}
