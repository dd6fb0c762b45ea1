//! Drone Interval Example
//!
//! Analyses an audio file given on the command line, or a synthesised
//! drone-then-melody recording when no path is given.

use drone_intervals::{AnalysisConfig, Analyzer, io};
use log::{error, info};

fn main() {
    env_logger::init();
    let config = AnalysisConfig::default();
    let analyzer = match Analyzer::new(config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let result = match std::env::args().nth(1) {
        Some(path) => {
            info!("Analysing {}", path);
            analyzer.analyze_file(&path)
        }
        None => {
            let sr = 22050;
            let notes = [
                (220.0, 2.0),  // A3 drone
                (246.94, 0.5), // B3
                (261.63, 0.5), // C4
                (329.63, 0.5), // E4
                (440.0, 0.5),  // A4
                (196.0, 0.5),  // G3
            ];
            info!("No file given, synthesising:");
            let mut signal = Vec::new();
            for (freq, duration) in notes {
                info!("  - {:.2} Hz for {} seconds", freq, duration);
                signal.extend(io::tone(freq, sr, duration));
            }
            analyzer.analyze_samples(&signal, sr)
        }
    };

    let analysis = match result {
        Ok(analysis) => analysis,
        Err(e) if e.is_source_unavailable() => {
            error!("Could not read audio: {}", e);
            return;
        }
        Err(e) => {
            error!("Analysis failed: {}", e);
            return;
        }
    };

    info!(
        "Drone: {:.2} Hz from {} frames",
        analysis.drone_hz, analysis.drone_window_frames
    );

    // One line per change of scale degree
    let mut previous: Option<String> = None;
    for (i, interval) in analysis.intervals.iter().enumerate() {
        let label = interval.map(|i| i.label());
        if label != previous {
            if let Some(interval) = interval {
                info!(
                    "{:>6.2}s  {:<16} {:+8.1} cents",
                    analysis.track.frame_time(i),
                    interval.label(),
                    interval.cents
                );
            }
            previous = label;
        }
    }

    info!("\n{}", analysis.preview(20));
}
