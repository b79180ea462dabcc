//! Audio cues using the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::services::{AudioCues, Cue};
use crate::settings::Settings;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Final gain from settings; 0 when muted
    volume: f32,
    /// Oscillators that may still be sounding, with their stop time
    voices: Vec<(OscillatorNode, f64)>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Fails outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_sfx_gain(),
            voices: Vec::new(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_sfx_gain();
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// One enveloped tone sliding from `from` to `to` Hz
    fn tone(
        &mut self,
        ctx: &AudioContext,
        osc_type: OscillatorType,
        (from, to): (f32, f32),
        level: f32,
        duration: f64,
    ) {
        let Some((osc, gain)) = Self::create_osc(ctx, from, osc_type) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(self.volume * level, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + duration)
            .ok();
        if to != from {
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + duration)
                .ok();
        }

        osc.start().ok();
        let end = t + duration + 0.05;
        osc.stop_with_when(end).ok();
        self.voices.push((osc, end));
    }

    fn play_shoot(&mut self, ctx: &AudioContext) {
        self.tone(ctx, OscillatorType::Square, (900.0, 300.0), 0.15, 0.06);
    }

    /// Hit - short thump
    fn play_hit(&mut self, ctx: &AudioContext) {
        self.tone(ctx, OscillatorType::Sine, (180.0, 70.0), 0.5, 0.1);
    }

    /// Kill - boom with a high crack
    fn play_kill(&mut self, ctx: &AudioContext) {
        self.tone(ctx, OscillatorType::Sawtooth, (110.0, 30.0), 0.45, 0.35);
        self.tone(ctx, OscillatorType::Square, (1500.0, 1500.0), 0.15, 0.08);
    }

    /// Death - long descending rumble
    fn play_death(&mut self, ctx: &AudioContext) {
        self.tone(ctx, OscillatorType::Sawtooth, (220.0, 25.0), 0.5, 0.9);
        self.tone(ctx, OscillatorType::Sine, (60.0, 30.0), 0.6, 0.8);
    }

    /// Heal/buff - rising chime
    fn play_heal(&mut self, ctx: &AudioContext) {
        self.tone(ctx, OscillatorType::Sine, (520.0, 1040.0), 0.3, 0.18);
        self.tone(ctx, OscillatorType::Triangle, (780.0, 1560.0), 0.15, 0.22);
    }
}

impl AudioCues for AudioManager {
    fn play_cue(&mut self, cue: Cue) {
        if self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = self.ctx.clone() else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let now = ctx.current_time();
        self.voices.retain(|(_, end)| *end > now);

        match cue {
            Cue::Shoot => self.play_shoot(&ctx),
            Cue::Hit => self.play_hit(&ctx),
            Cue::Kill => self.play_kill(&ctx),
            Cue::Death => self.play_death(&ctx),
            Cue::Heal => self.play_heal(&ctx),
        }
    }

    fn stop_all(&mut self) {
        for (osc, _) in self.voices.drain(..) {
            osc.stop().ok();
        }
    }
}
