//! Parser for the timeline transcription format
//!
//! A line-based debug format for writing timelines by hand:
//!
//! ```text
//! # comment
//! ticks_per_beat 480
//!
//! track
//! +0| on 0 69 100
//! +480| off 0 69 0, program 0 42
//! +0| tempo 500000
//! track
//! +960| on 1 60 90
//! ```
//!
//! Events:
//! - `on <channel> <pitch> <velocity>` / `off <channel> <pitch> <velocity>`
//! - `program <channel> <number>`
//! - `tempo <microseconds_per_beat>`
//! - `skip` (an event the synth ignores, for testing pass-through)
//!
//! Several events may share a line, comma-separated; the first carries the
//! line's tick delta, the rest occur at the same tick.

use thiserror::Error;

use super::{Event, TimedEvent, Timeline, TimelineError, Track};

/// Parse errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing `ticks_per_beat` header")]
    MissingHeader,
    #[error("line {line}: expected `track` or `+<delta>| <events>`, got `{text}`")]
    InvalidLine { line: usize, text: String },
    #[error("line {line}: invalid tick delta `{text}`")]
    InvalidDelta { line: usize, text: String },
    #[error("line {line}: invalid event `{text}`")]
    InvalidEvent { line: usize, text: String },
    #[error("line {line}: event before any `track` line")]
    EventOutsideTrack { line: usize },
    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

/// Parse a transcription into a validated [`Timeline`]
pub fn parse_timeline(input: &str) -> Result<Timeline, ParseError> {
    let mut ticks_per_beat: Option<u32> = None;
    let mut tracks: Vec<Track> = Vec::new();

    for (index, raw_line) in input.lines().enumerate() {
        let line = index + 1;
        let text = raw_line.split('#').next().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }

        if ticks_per_beat.is_none() {
            let Some(value) = text.strip_prefix("ticks_per_beat") else {
                return Err(ParseError::MissingHeader);
            };
            ticks_per_beat = Some(value.trim().parse().map_err(|_| ParseError::InvalidLine {
                line,
                text: text.to_string(),
            })?);
            continue;
        }

        if text == "track" {
            tracks.push(Track::default());
            continue;
        }

        let Some((delta_part, events_part)) = text.split_once('|') else {
            return Err(ParseError::InvalidLine {
                line,
                text: text.to_string(),
            });
        };
        let delta_text = delta_part.trim();
        let delta: u32 = delta_text
            .strip_prefix('+')
            .and_then(|d| d.trim().parse().ok())
            .ok_or_else(|| ParseError::InvalidDelta {
                line,
                text: delta_text.to_string(),
            })?;

        let track = tracks
            .last_mut()
            .ok_or(ParseError::EventOutsideTrack { line })?;

        for (position, event_text) in events_part.split(',').enumerate() {
            let event = parse_event(event_text.trim(), line)?;
            track.events.push(TimedEvent {
                // Only the first event on a line carries the delta
                delta_ticks: if position == 0 { delta } else { 0 },
                event,
            });
        }
    }

    let ticks_per_beat = ticks_per_beat.ok_or(ParseError::MissingHeader)?;
    Ok(Timeline::new(tracks, ticks_per_beat)?)
}

fn parse_event(text: &str, line: usize) -> Result<Event, ParseError> {
    let invalid = || ParseError::InvalidEvent {
        line,
        text: text.to_string(),
    };
    let tokens: Vec<&str> = text.split_whitespace().collect();

    let parse_u8 = |token: &str| token.parse::<u8>().map_err(|_| invalid());
    let parse_u32 = |token: &str| token.parse::<u32>().map_err(|_| invalid());

    match tokens.as_slice() {
        ["on", channel, pitch, velocity] => Ok(Event::NoteOn {
            channel: parse_u8(channel)?,
            pitch: parse_u8(pitch)?,
            velocity: parse_u8(velocity)?,
        }),
        ["off", channel, pitch, velocity] => Ok(Event::NoteOff {
            channel: parse_u8(channel)?,
            pitch: parse_u8(pitch)?,
            velocity: parse_u8(velocity)?,
        }),
        ["program", channel, number] => Ok(Event::ProgramChange {
            channel: parse_u8(channel)?,
            program: parse_u8(number)?,
        }),
        ["tempo", microseconds] => Ok(Event::Tempo {
            microseconds_per_beat: parse_u32(microseconds)?,
        }),
        ["skip"] => Ok(Event::Ignored),
        _ => Err(invalid()),
    }
}
