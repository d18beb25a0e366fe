// journey/auto_walk.rs - Walk the suggested route when the user goes idle

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::Notify;

use super::navigator::{MoveOutcome, Navigator};
use super::presenter::JourneyPresenter;
use crate::error_handling::Result;

const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Moves through the suggested door each time the idle timer runs out.
///
/// Any call to [`AutoWalker::touch`] restarts the timer.
pub struct AutoWalker<P> {
    navigator: Arc<Navigator<P>>,
    idle_timeout: Duration,
    wake: Notify,
    stopped: AtomicBool,
}

impl<P: JourneyPresenter> AutoWalker<P> {
    pub fn new(navigator: Arc<Navigator<P>>) -> Self {
        Self {
            navigator,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            wake: Notify::new(),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn navigator(&self) -> &Arc<Navigator<P>> {
        &self.navigator
    }

    /// Record user activity.
    pub fn touch(&self) {
        self.wake.notify_one();
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    /// Walk until stopped, out of suggestions, or `max_moves` rooms were entered.
    /// Returns the number of rooms entered.
    pub async fn run(&self, max_moves: Option<usize>) -> Result<usize> {
        let mut moves = 0;

        while !self.stopped.load(Ordering::SeqCst) && max_moves.map_or(true, |max| moves < max) {
            if tokio::time::timeout(self.idle_timeout, self.wake.notified())
                .await
                .is_ok()
            {
                debug!("Activity, restarting idle timer");
                continue;
            }

            match self.navigator.move_to_next_room().await? {
                Some(MoveOutcome::Moved { from, to }) => {
                    debug!("Auto-walked from room {} to room {}", from, to);
                    moves += 1;
                }
                Some(MoveOutcome::AlreadyMoving) => {}
                None => {
                    info!("Nothing left to explore after {} rooms", moves);
                    break;
                }
            }
        }

        Ok(moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journey::presenter::HeadlessPresenter;
    use crate::journey::store::JourneyStore;
    use crate::journey::test_support::small_dungeon;
    use tokio::time::{sleep, Instant};

    fn walker() -> AutoWalker<HeadlessPresenter> {
        let store = Arc::new(JourneyStore::with_dungeon(small_dungeon()).unwrap());
        let navigator = Navigator::new(store, HeadlessPresenter::new());
        navigator.initialise().unwrap();
        AutoWalker::new(Arc::new(navigator))
    }

    #[tokio::test(start_paused = true)]
    async fn test_walks_after_idle_timeout() {
        let walker = walker();
        let start = Instant::now();
        assert_eq!(walker.run(Some(2)).await.unwrap(), 2);
        assert!(start.elapsed() >= Duration::from_secs(10));
        assert_ne!(walker.navigator().store().current_room_id().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_restarts_timer() {
        let walker = walker();
        let start = Instant::now();

        let (moves, ()) = tokio::join!(walker.run(Some(1)), async {
            sleep(Duration::from_secs(3)).await;
            walker.touch();
            sleep(Duration::from_secs(3)).await;
            // Six seconds in, but only three since the last activity
            assert_eq!(walker.navigator().store().current_room_id().unwrap(), 1);
        });

        assert_eq!(moves.unwrap(), 1);
        assert!(start.elapsed() >= Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_explored() {
        let walker = walker().with_idle_timeout(Duration::from_millis(10));
        assert_eq!(walker.run(None).await.unwrap(), 4);
        let state = walker.navigator().store().get_state().unwrap();
        assert_eq!(state.visited_room_ids.len(), 3);
        assert_eq!(state.current_room_id, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop() {
        let walker = walker();
        let (moves, ()) = tokio::join!(walker.run(None), async {
            sleep(Duration::from_secs(1)).await;
            walker.stop();
        });
        assert_eq!(moves.unwrap(), 0);
    }
}
