//! Event scheduler and playback driver
//!
//! The replayer merges every track's event queue into one chronological
//! stream. Each track keeps a countdown of ticks to its next event; the track
//! with the smallest countdown wins (ties go to the lowest track index), the
//! winning distance is subtracted from everyone, and the distance is converted
//! to samples against the current tempo. Generation then proceeds in chunks
//! aligned to event boundaries: render up to the next event, dispatch it,
//! repeat.
//!
//! Tick-to-sample conversion accumulates in `f64` so fractional remainders
//! carry across events instead of being dropped per conversion.

use tracing::debug;

use crate::synth::{Channel, Synth};
use crate::timeline::{Event, Timeline, CHANNEL_COUNT};

/// Per-track replay state
struct TrackCursor {
    /// Index of the next unconsumed event
    next_index: usize,
    /// Ticks until that event; `None` once the track is exhausted
    ticks_to_next: Option<u64>,
}

/// The globally next event, recomputed on every advance
struct PendingEvent {
    event: Event,
    track: usize,
}

/// Plays a [`Timeline`] through a [`Synth`], pulled for samples by the caller
pub struct Replayer {
    timeline: Timeline,
    synth: Synth,
    channels: Vec<Channel>,
    cursors: Vec<TrackCursor>,
    beats_per_minute: f64,
    /// Samples until the pending event fires; meaningful while one is pending
    samples_to_next_event: f64,
    pending: Option<PendingEvent>,
    finished: bool,
}

impl Replayer {
    /// Create a replayer over a validated timeline
    ///
    /// Playback starts at 120 BPM until a tempo event says otherwise.
    pub fn new(timeline: Timeline, synth: Synth) -> Self {
        let cursors = timeline
            .tracks()
            .iter()
            .map(|track| TrackCursor {
                next_index: 0,
                ticks_to_next: track.events.first().map(|e| e.delta_ticks as u64),
            })
            .collect();

        let mut replayer = Self {
            timeline,
            synth,
            channels: (0..CHANNEL_COUNT).map(|_| Channel::new()).collect(),
            cursors,
            beats_per_minute: 120.0,
            samples_to_next_event: 0.0,
            pending: None,
            finished: false,
        };
        replayer.advance();
        replayer
    }

    /// True once every track is exhausted; tail generators may still be decaying
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// The mixer driving playback, for inspecting live generator state
    pub fn synth(&self) -> &Synth {
        &self.synth
    }

    /// Select and consume the globally next event
    fn advance(&mut self) {
        let mut winner: Option<(usize, u64)> = None;
        for (index, cursor) in self.cursors.iter().enumerate() {
            if let Some(ticks) = cursor.ticks_to_next {
                match winner {
                    Some((_, best)) if ticks >= best => {}
                    _ => winner = Some((index, ticks)),
                }
            }
        }
        let Some((track, ticks)) = winner else {
            self.pending = None;
            self.finished = true;
            return;
        };

        let events = &self.timeline.tracks()[track].events;
        let event = events[self.cursors[track].next_index].event;

        // Winner's countdown becomes the delta of its next event, expressed
        // before the uniform subtraction below.
        let next_index = self.cursors[track].next_index + 1;
        self.cursors[track].next_index = next_index;
        self.cursors[track].ticks_to_next = events
            .get(next_index)
            .map(|timed| ticks + timed.delta_ticks as u64);

        // The global tick clock advances by the winning distance
        for cursor in &mut self.cursors {
            if let Some(remaining) = cursor.ticks_to_next.as_mut() {
                *remaining -= ticks;
            }
        }

        self.pending = Some(PendingEvent { event, track });

        let beats = ticks as f64 / self.timeline.ticks_per_beat() as f64;
        let seconds = beats / (self.beats_per_minute / 60.0);
        self.samples_to_next_event += seconds * self.synth.sample_rate() as f64;
    }

    /// Apply the pending event's side effect
    fn handle_event(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        debug!(track = pending.track, event = ?pending.event, "dispatch");
        match pending.event {
            Event::Tempo {
                microseconds_per_beat,
            } => {
                // Only future tick conversions see the new tempo
                self.beats_per_minute = 60_000_000.0 / microseconds_per_beat as f64;
            }
            Event::NoteOn {
                channel,
                pitch,
                velocity,
            } => self.channels[channel as usize].note_on(&mut self.synth, pitch, velocity),
            Event::NoteOff {
                channel,
                pitch,
                velocity,
            } => self.channels[channel as usize].note_off(&mut self.synth, pitch, velocity),
            Event::ProgramChange { channel, program } => {
                self.channels[channel as usize].set_program(program)
            }
            Event::Ignored => {}
        }
    }

    /// Render `out.len() / 2` stereo frames of playback into `out`
    ///
    /// Renders in chunks aligned to event boundaries: whenever the next event
    /// falls inside the remaining request, generate up to it (rounding the
    /// fractional boundary up), dispatch, and continue. After the timeline is
    /// exhausted this keeps rendering the decay tail.
    pub fn render(&mut self, out: &mut [f32]) {
        let mut offset = 0;
        let mut remaining = out.len() / 2;

        loop {
            if self.pending.is_some() && self.samples_to_next_event <= remaining as f64 {
                let chunk = self.samples_to_next_event.ceil().max(0.0) as usize;
                if chunk > 0 {
                    self.synth.render_into(&mut out[offset..offset + chunk * 2]);
                    offset += chunk * 2;
                    remaining -= chunk;
                    self.samples_to_next_event -= chunk as f64;
                }
                self.handle_event();
                self.advance();
            } else {
                if remaining > 0 {
                    self.synth.render_into(&mut out[offset..]);
                    if self.pending.is_some() {
                        self.samples_to_next_event -= remaining as f64;
                    }
                }
                return;
            }
        }
    }

    /// Render `sample_count` stereo frames into a fresh interleaved buffer
    /// of length `2 * sample_count`
    pub fn generate(&mut self, sample_count: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; sample_count * 2];
        self.render(&mut out);
        out
    }
}
