//! Drone-relative interval analysis for recorded audio.
//!
//! A recording is expected to open with a sustained reference pitch, the
//! drone. The pipeline decodes the audio, estimates a fundamental frequency
//! for every frame, takes the median voiced frequency of the opening window
//! as the drone, and labels each voiced frame with its distance from the
//! drone in cents and as a chromatic scale degree (`"Unison"`, `"b3"`,
//! `"5 (+1 oct)"`, ...).
//!
//! # Quick Start
//!
//! ```rust
//! use drone_intervals::{Analyzer, AnalysisConfig, io};
//!
//! // Two seconds of A4 followed by one second of C5
//! let sr = 22050;
//! let mut signal = io::tone(440.0, sr, 2.0);
//! signal.extend(io::tone(523.25, sr, 1.0));
//!
//! let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
//! let analysis = analyzer.analyze_samples(&signal, sr).unwrap();
//! assert!((analysis.drone_hz - 440.0).abs() < 5.0);
//!
//! let last = analysis.intervals[analysis.len() - 10].unwrap();
//! assert_eq!(last.label(), "b3");
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`io`] | Audio decoding (symphonia), resampling, WAV writing, tone generator |
//! | [`frame`] | Centred signal framing |
//! | [`pitch`] | Pitch tracks and pitch sources (McLeod pitch method) |
//! | [`convert`] | Cents, scale degrees, note names |
//! | [`drone`] | Drone reference estimation |
//! | [`interval`] | Per-frame drone-relative intervals |
//! | [`analysis`] | Configuration and the end-to-end pipeline |
//! | `web` | File-upload front end (feature `web`) |
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`]. A missing input file is
//! [`Error::SourceNotFound`], an undecodable one [`Error::Decode`], and a
//! recording without a voiced opening window [`Error::DroneUndetermined`].
//!
//! # Feature Flags
//!
//! | Flag | Description |
//! |------|-------------|
//! | `web` (default) | Rocket upload server and the `drone-intervals` binary |

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, Result};

pub mod analysis;
pub mod convert;
pub mod drone;
pub mod frame;
pub mod interval;
pub mod io;
pub mod pitch;

#[cfg(feature = "web")]
pub mod web;

pub use analysis::{Analysis, AnalysisConfig, Analyzer, Preview, analyze_file};
pub use interval::RelativeInterval;
pub use pitch::{PitchSource, PitchTrack};
