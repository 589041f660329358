//! Plot an ADSR envelope contour to an SVG file
//!
//! Shapes a constant-amplitude probe with the envelope so the plotted signal
//! is the amplitude contour itself.

use plotters::prelude::*;

use sonata::generator::{AdsrEnvelope, Generator, ProbeGenerator};

const SAMPLE_RATE: u32 = 1000; // 1ms = 1 sample
const FRAME_SIZE: usize = 64;
const MAX_SAMPLES: usize = 100_000;

struct Args {
    attack_amplitude: f32,
    sustain_amplitude: f32,
    attack_ms: f32,
    decay_ms: f32,
    release_ms: f32,
    note_off_ms: f32,
    output_path: String,
}

fn print_usage() {
    eprintln!(
        "Usage: plot-envelope <attack_amp> <sustain_amp> <attack_ms> <decay_ms> <release_ms> <note_off_ms> <output.svg>"
    );
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  plot-envelope 0.8 0.4 100 200 300 700 envelope.svg");
    eprintln!("  plot-envelope 0.8 0.4 200 200 300 50 early-release.svg");
}

fn parse_args() -> Result<Args, Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() != 8 {
        print_usage();
        return Err("Invalid number of arguments".into());
    }

    let attack_amplitude: f32 = args[1].parse()?;
    let sustain_amplitude: f32 = args[2].parse()?;
    let attack_ms: f32 = args[3].parse()?;
    let decay_ms: f32 = args[4].parse()?;
    let release_ms: f32 = args[5].parse()?;
    let note_off_ms: f32 = args[6].parse()?;
    let output_path = args[7].clone();

    if attack_ms < 0.0 || decay_ms < 0.0 || release_ms < 0.0 || note_off_ms < 0.0 {
        return Err("Time values must be non-negative".into());
    }
    if attack_amplitude < sustain_amplitude {
        return Err("Attack amplitude should not be below sustain amplitude".into());
    }

    Ok(Args {
        attack_amplitude,
        sustain_amplitude,
        attack_ms,
        decay_ms,
        release_ms,
        note_off_ms,
        output_path,
    })
}

fn generate_contour(args: &Args) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
    let mut envelope = AdsrEnvelope::new(
        Box::new(ProbeGenerator::new(1.0)),
        args.attack_amplitude,
        args.sustain_amplitude,
        args.attack_ms / 1000.0,
        args.decay_ms / 1000.0,
        args.release_ms / 1000.0,
        SAMPLE_RATE,
    );

    let note_off_sample = (args.note_off_ms * SAMPLE_RATE as f32 / 1000.0) as usize;
    let mut contour = Vec::new();
    let mut frame_buffer = vec![0.0f32; FRAME_SIZE * 2];
    let mut released = false;

    while envelope.is_alive() {
        if !released && contour.len() >= note_off_sample {
            envelope.release();
            released = true;
        }

        frame_buffer.fill(0.0);
        envelope.render(&mut frame_buffer);
        // Mono contour: the probe emits identically on both channels
        contour.extend(frame_buffer.chunks_exact(2).map(|frame| frame[0]));

        if contour.len() > MAX_SAMPLES {
            return Err("Envelope exceeded maximum duration".into());
        }
    }

    Ok(contour)
}

fn create_plot(args: &Args, contour: &[f32]) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(&args.output_path, (800, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_time = contour.len() as f32;
    let max_amplitude = (args.attack_amplitude * 1.1).max(0.1);
    let title = format!(
        "ADSR: peak={:.2}, sustain={:.2}, A={}ms, D={}ms, R={}ms, note_off={}ms",
        args.attack_amplitude,
        args.sustain_amplitude,
        args.attack_ms,
        args.decay_ms,
        args.release_ms,
        args.note_off_ms
    );

    let mut chart = ChartBuilder::on(&root)
        .caption(&title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f32..max_time, 0f32..max_amplitude)?;

    chart
        .configure_mesh()
        .x_desc("Time (ms)")
        .y_desc("Amplitude")
        .x_labels(10)
        .y_labels(10)
        .draw()?;

    chart.draw_series(LineSeries::new(
        contour
            .iter()
            .enumerate()
            .map(|(i, &amplitude)| (i as f32, amplitude)),
        BLUE.stroke_width(2),
    ))?;

    // Note-off marker at the sustain level
    chart.draw_series(std::iter::once(plotters::element::Circle::new(
        (args.note_off_ms, args.sustain_amplitude),
        5,
        RED.filled(),
    )))?;

    root.present()?;
    Ok(())
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let contour = match generate_contour(&args) {
        Ok(contour) => contour,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Generated {} samples of envelope contour", contour.len());

    if let Err(e) = create_plot(&args, &contour) {
        eprintln!("Plot error: {}", e);
        std::process::exit(1);
    }

    println!("Wrote {}", args.output_path);
}
