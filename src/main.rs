use sonata::replayer::Replayer;
use sonata::synth::Synth;
use sonata::timeline::{Event, TimedEvent, Timeline, Track};

const SAMPLE_RATE: u32 = 44100;
const TICKS_PER_BEAT: u32 = 480;

fn note_on(delta_ticks: u32, pitch: u8) -> TimedEvent {
    TimedEvent {
        delta_ticks,
        event: Event::NoteOn {
            channel: 0,
            pitch,
            velocity: 100,
        },
    }
}

fn note_off(delta_ticks: u32, pitch: u8) -> TimedEvent {
    TimedEvent {
        delta_ticks,
        event: Event::NoteOff {
            channel: 0,
            pitch,
            velocity: 0,
        },
    }
}

fn main() {
    println!("Sonata MIDI Timeline Synthesizer");
    println!("================================\n");

    // Two bars: an A major chord, then the same chord an octave down at half
    // tempo (tempo change between the bars).
    let melody = Track::new(vec![
        note_on(0, 69),
        note_on(0, 73),
        note_on(0, 76),
        note_off(960, 69),
        note_off(0, 73),
        note_off(0, 76),
        note_on(0, 57),
        note_on(0, 61),
        note_on(0, 64),
        note_off(960, 57),
        note_off(0, 61),
        note_off(0, 64),
    ]);
    let conductor = Track::new(vec![TimedEvent {
        delta_ticks: 960,
        event: Event::Tempo {
            microseconds_per_beat: 1_000_000, // 60 BPM for the second bar
        },
    }]);

    let timeline = match Timeline::new(vec![melody, conductor], TICKS_PER_BEAT) {
        Ok(timeline) => timeline,
        Err(e) => {
            eprintln!("invalid timeline: {e}");
            std::process::exit(1);
        }
    };
    let synth = match Synth::new(SAMPLE_RATE) {
        Ok(synth) => synth,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    println!("Configuration:");
    println!("  Sample rate: {} Hz", SAMPLE_RATE);
    println!("  Resolution: {} ticks/beat", TICKS_PER_BEAT);
    println!("  Chunk size: 4410 samples (100ms)\n");

    let mut replayer = Replayer::new(timeline, synth);

    println!(
        "{:<8} {:<10} {:<10} {:<10}",
        "Chunk", "Voices", "Peak", "Finished"
    );
    println!("{}", "-".repeat(42));

    let mut chunk_count = 0;
    while !replayer.finished() || replayer.synth().generator_count() > 0 {
        let samples = replayer.generate(4410);
        chunk_count += 1;

        let peak = samples.iter().fold(0.0f32, |max, s| max.max(s.abs()));
        if chunk_count % 5 == 1 || replayer.finished() && replayer.synth().generator_count() == 0 {
            println!(
                "{:<8} {:<10} {:<10.3} {:<10}",
                chunk_count,
                replayer.synth().generator_count(),
                peak,
                replayer.finished()
            );
        }
    }

    println!("\nPlayback complete in {} chunks", chunk_count);
}
