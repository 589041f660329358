//! Event timeline data model
//!
//! A [`Timeline`] is the decoded input the replayer consumes: per-track
//! ordered sequences of tick-delta events plus the ticks-per-beat resolution.
//! Container parsing (MIDI files and friends) happens upstream; this module
//! only validates that what arrives cannot corrupt playback.
//!
//! Event kinds are a closed sum type matched exhaustively. Anything the synth
//! does not handle is decoded as [`Event::Ignored`] and dispatches to nothing.

pub mod parser;

use thiserror::Error;

/// Number of MIDI channels
pub const CHANNEL_COUNT: usize = 16;

/// A decoded timeline event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Tempo change, in microseconds per quarter note
    Tempo { microseconds_per_beat: u32 },
    NoteOn { channel: u8, pitch: u8, velocity: u8 },
    NoteOff { channel: u8, pitch: u8, velocity: u8 },
    ProgramChange { channel: u8, program: u8 },
    /// Any event kind the synth does not handle; dispatches to nothing
    Ignored,
}

/// An event with its tick distance from the previous event in the same track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    pub delta_ticks: u32,
    pub event: Event,
}

/// An ordered sequence of timed events; immutable once loaded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub events: Vec<TimedEvent>,
}

impl Track {
    pub fn new(events: Vec<TimedEvent>) -> Self {
        Self { events }
    }
}

/// Validation errors for timeline construction
///
/// These are the fatal cases: timing cannot be computed without a positive
/// resolution, and out-of-range values must never reach channel or pitch
/// lookup tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimelineError {
    #[error("ticks per beat must be positive")]
    InvalidTicksPerBeat,
    #[error("channel {0} out of range 0-15")]
    ChannelOutOfRange(u8),
    #[error("pitch {0} out of range 0-127")]
    PitchOutOfRange(u8),
    #[error("velocity {0} out of range 0-127")]
    VelocityOutOfRange(u8),
    #[error("tempo must have a positive microseconds-per-beat")]
    InvalidTempo,
}

/// A validated set of tracks ready for replay
#[derive(Debug, Clone)]
pub struct Timeline {
    tracks: Vec<Track>,
    ticks_per_beat: u32,
}

impl Timeline {
    /// Validate and build a timeline
    ///
    /// Every event is checked up front so replay dispatch never has to fail
    /// mid-buffer.
    pub fn new(tracks: Vec<Track>, ticks_per_beat: u32) -> Result<Self, TimelineError> {
        if ticks_per_beat == 0 {
            return Err(TimelineError::InvalidTicksPerBeat);
        }
        for track in &tracks {
            for timed in &track.events {
                validate_event(&timed.event)?;
            }
        }
        Ok(Self {
            tracks,
            ticks_per_beat,
        })
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn ticks_per_beat(&self) -> u32 {
        self.ticks_per_beat
    }
}

fn validate_event(event: &Event) -> Result<(), TimelineError> {
    let check_channel = |channel: u8| {
        if channel as usize >= CHANNEL_COUNT {
            Err(TimelineError::ChannelOutOfRange(channel))
        } else {
            Ok(())
        }
    };
    let check_midi_value = |value: u8, error: fn(u8) -> TimelineError| {
        if value > 127 {
            Err(error(value))
        } else {
            Ok(())
        }
    };

    match *event {
        Event::Tempo {
            microseconds_per_beat,
        } => {
            if microseconds_per_beat == 0 {
                return Err(TimelineError::InvalidTempo);
            }
        }
        Event::NoteOn {
            channel,
            pitch,
            velocity,
        }
        | Event::NoteOff {
            channel,
            pitch,
            velocity,
        } => {
            check_channel(channel)?;
            check_midi_value(pitch, TimelineError::PitchOutOfRange)?;
            check_midi_value(velocity, TimelineError::VelocityOutOfRange)?;
        }
        Event::ProgramChange { channel, .. } => {
            check_channel(channel)?;
        }
        Event::Ignored => {}
    }
    Ok(())
}
