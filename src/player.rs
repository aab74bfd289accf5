// Copyright 2026 The lessonkit Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Flashcard autoplay.
//!
//! The player lives inside the state it advances, so starting, stopping and
//! ticking all happen under the same lock. Each start bumps the epoch; a tick
//! whose epoch is stale exits without touching anything.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio::time::interval_at;

/// Longest autoplay interval. Longer requests are clamped to it.
pub const MAX_SECONDS: u64 = 3600;

/// State the player can step through.
pub trait Playable: Send + 'static {
    fn player(&mut self) -> &mut Player;

    /// Show the next card. Returns `false` when there are no cards, which
    /// stops the player.
    fn advance(&mut self) -> bool;
}

pub struct Player {
    epoch: u64,
    seconds: u64,
    task: Option<JoinHandle<()>>,
}

impl Player {
    pub fn new(seconds: u64) -> Self {
        Self {
            epoch: 0,
            seconds: seconds.clamp(1, MAX_SECONDS),
            task: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.task.is_some()
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Change the interval. A running player restarts with it.
    pub fn set_seconds<S: Playable>(&mut self, seconds: u64, shared: &Arc<Mutex<S>>) {
        self.seconds = seconds.clamp(1, MAX_SECONDS);
        if self.is_playing() {
            self.start(shared);
        }
    }

    /// Start advancing `shared` every interval. Must be called with the lock
    /// on `shared` held, on the player inside it.
    pub fn start<S: Playable>(&mut self, shared: &Arc<Mutex<S>>) {
        self.stop();
        let epoch = self.epoch;
        let period = Duration::from_secs(self.seconds);
        let shared = Arc::clone(shared);
        log::debug!("Autoplay started, every {}s", self.seconds);
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                let Ok(mut state) = shared.lock() else {
                    return;
                };
                if state.player().epoch != epoch {
                    return;
                }
                if !state.advance() {
                    log::debug!("Autoplay stopped: no cards");
                    state.player().halt();
                    return;
                }
            }
        }));
    }

    /// Stop. No tick runs after this returns.
    pub fn stop(&mut self) {
        self.halt();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn halt(&mut self) {
        self.epoch += 1;
        self.task = None;
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::sleep;

    use super::*;

    struct Counter {
        player: Player,
        cards: usize,
        ticks: usize,
    }

    impl Playable for Counter {
        fn player(&mut self) -> &mut Player {
            &mut self.player
        }

        fn advance(&mut self) -> bool {
            if self.cards == 0 {
                return false;
            }
            self.ticks += 1;
            true
        }
    }

    fn counter(cards: usize) -> Arc<Mutex<Counter>> {
        Arc::new(Mutex::new(Counter {
            player: Player::new(2),
            cards,
            ticks: 0,
        }))
    }

    fn start(shared: &Arc<Mutex<Counter>>) {
        let mut state = shared.lock().unwrap();
        state.player.start(shared);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_every_interval() {
        let shared = counter(3);
        start(&shared);
        sleep(Duration::from_secs(5)).await;
        assert_eq!(shared.lock().unwrap().ticks, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_fires_after_stop() {
        let shared = counter(3);
        start(&shared);
        sleep(Duration::from_secs(3)).await;
        shared.lock().unwrap().player.stop();
        sleep(Duration::from_secs(20)).await;
        let state = shared.lock().unwrap();
        assert_eq!(state.ticks, 1);
        assert!(!state.player.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_empty() {
        let shared = counter(2);
        start(&shared);
        sleep(Duration::from_secs(3)).await;
        shared.lock().unwrap().cards = 0;
        sleep(Duration::from_secs(3)).await;
        let state = shared.lock().unwrap();
        assert_eq!(state.ticks, 1);
        assert!(!state.player.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_with_new_interval() {
        let shared = counter(2);
        start(&shared);
        {
            let mut state = shared.lock().unwrap();
            state.player.set_seconds(10, &shared);
            assert!(state.player.is_playing());
        }
        sleep(Duration::from_secs(5)).await;
        assert_eq!(shared.lock().unwrap().ticks, 0);
        sleep(Duration::from_secs(6)).await;
        assert_eq!(shared.lock().unwrap().ticks, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_interval_is_clamped() {
        let shared = counter(2);
        start(&shared);
        {
            let mut state = shared.lock().unwrap();
            state.player.set_seconds(u64::MAX, &shared);
            assert_eq!(state.player.seconds(), MAX_SECONDS);
            assert!(state.player.is_playing());
        }
        sleep(Duration::from_secs(MAX_SECONDS - 1)).await;
        assert_eq!(shared.lock().unwrap().ticks, 0);
        sleep(Duration::from_secs(2)).await;
        let state = shared.lock().unwrap();
        assert_eq!(state.ticks, 1);
        assert!(state.player.is_playing());
        assert_eq!(Player::new(0).seconds(), 1);
        assert_eq!(Player::new(u64::MAX).seconds(), MAX_SECONDS);
    }
}
