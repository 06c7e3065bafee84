//! Cosmetic timers that run only while a request is loading.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::Event;

/// Interval between simulated progress ticks.
pub const PROGRESS_TICK: Duration = Duration::from_millis(30);

/// Interval between loading status lines.
pub const TEXT_ROTATION: Duration = Duration::from_millis(1500);

/// Owns the progress and text-rotation tasks for one loading phase.
///
/// Both tasks are aborted when the guard is dropped, so timers never outlive
/// the loading state that started them.
#[derive(Debug)]
pub struct LoadingTimers {
    tasks: Vec<JoinHandle<()>>,
}

impl LoadingTimers {
    /// Start both timers, delivering their events to `events`.
    #[must_use]
    pub fn start(events: &UnboundedSender<Event>) -> Self {
        Self {
            tasks: vec![
                spawn_ticker(PROGRESS_TICK, Event::ProgressTick, events.clone()),
                spawn_ticker(TEXT_ROTATION, Event::RotateLoadingText, events.clone()),
            ],
        }
    }
}

impl Drop for LoadingTimers {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

fn spawn_ticker(period: Duration, event: Event, events: UnboundedSender<Event>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if events.send(event.clone()).is_err() {
                break;
            }
        }
    })
}
