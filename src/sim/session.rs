//! Session state machine
//!
//! Menu -> Countdown -> Playing -> GameOver, with `stop` returning to the
//! menu and `restart` going back through the countdown. Every entry into
//! the countdown passes through a full reset.

use thiserror::Error;

use super::events::GameEvent;
use super::spawner;
use super::state::{Countdown, GamePhase, GameState};
use super::tick::{FrameTime, TickInput, tick};
use super::tuning::Tuning;
use crate::renderer::FrameSnapshot;
use crate::services::Services;
use crate::settings::Settings;

/// Countdown tick interval (wall-clock ms)
pub const COUNTDOWN_STEP_MS: f64 = 1000.0;

/// A transition requested from a phase that does not allow it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {action} while in {from:?}")]
    NotAllowed { action: &'static str, from: GamePhase },
}

/// One game, from menu through any number of playthroughs
pub struct Session {
    state: GameState,
    services: Services,
}

impl Session {
    /// Build a session in the menu; services are held for its whole life
    pub fn new(seed: u64, tuning: Tuning, services: Services) -> Self {
        log::info!("Session created (seed {})", seed);
        Self {
            state: GameState::new(seed, tuning),
            services,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Menu -> Countdown
    pub fn start(&mut self, now: f64) -> Result<(), TransitionError> {
        self.require(GamePhase::Menu, "start")?;
        self.begin_countdown(now);
        Ok(())
    }

    /// GameOver -> Countdown
    pub fn restart(&mut self, now: f64) -> Result<(), TransitionError> {
        self.require(GamePhase::GameOver, "restart")?;
        self.begin_countdown(now);
        Ok(())
    }

    /// Playing (or Countdown) -> Menu, submitting the final score
    pub fn stop(&mut self, now: f64) -> Result<(), TransitionError> {
        let from = self.state.phase;
        if !matches!(from, GamePhase::Playing | GamePhase::Countdown) {
            return Err(TransitionError::NotAllowed { action: "stop", from });
        }

        // A death already reported its score
        if !self.state.player.dead {
            self.services
                .scores
                .record_kill_or_death(self.state.stats.total_score, true);
        }
        log::info!("Session stopped with score {}", self.state.stats.total_score);
        self.services.audio.stop_all();
        self.state.reset_session(now);
        self.state.set_phase(GamePhase::Menu);
        Ok(())
    }

    /// Run one display frame: timed transitions, then the simulation tick
    pub fn frame(&mut self, input: &TickInput, frame: FrameTime) {
        if self.state.phase == GamePhase::Countdown {
            self.advance_countdown(frame.now_ms);
        }

        tick(&mut self.state, input, frame, &mut self.services);

        if self.state.phase == GamePhase::Playing {
            if let Some(at) = self.state.timers.game_over_at {
                if frame.now_ms >= at {
                    self.state.timers.game_over_at = None;
                    self.state.set_phase(GamePhase::GameOver);
                }
            }
        }
    }

    /// Entity snapshot of the latest frame for the renderer
    pub fn snapshot(&self, settings: &Settings) -> FrameSnapshot {
        FrameSnapshot::capture(&self.state, self.state.now_ms, settings)
    }

    /// Drain events raised since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    fn require(&self, expected: GamePhase, action: &'static str) -> Result<(), TransitionError> {
        let from = self.state.phase;
        if from == expected {
            Ok(())
        } else {
            Err(TransitionError::NotAllowed { action, from })
        }
    }

    /// Reset everything and spawn the opening enemy
    fn begin_countdown(&mut self, now: f64) {
        self.services.audio.stop_all();
        self.state.reset_session(now);
        spawner::request_spawns(&mut self.state, 0, now, &*self.services.assets);

        let remaining = self.state.tuning.countdown_secs;
        if remaining == 0 {
            self.state.set_phase(GamePhase::Playing);
            return;
        }
        self.state.timers.countdown = Some(Countdown {
            remaining,
            next_tick_at: now + COUNTDOWN_STEP_MS,
        });
        self.state.set_phase(GamePhase::Countdown);
        self.state.push_event(GameEvent::CountdownTick { remaining });
    }

    fn advance_countdown(&mut self, now: f64) {
        while let Some(mut countdown) = self.state.timers.countdown {
            if now < countdown.next_tick_at {
                break;
            }
            countdown.remaining = countdown.remaining.saturating_sub(1);
            countdown.next_tick_at += COUNTDOWN_STEP_MS;
            self.state.push_event(GameEvent::CountdownTick {
                remaining: countdown.remaining,
            });

            if countdown.remaining == 0 {
                self.state.timers.countdown = None;
                self.state.set_phase(GamePhase::Playing);
            } else {
                self.state.timers.countdown = Some(countdown);
            }
        }
    }
}
