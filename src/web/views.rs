//! HTML pages and user-facing messages.

use crate::{Analysis, Error};

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
pre{background:#f4f4f4;padding:.75rem;overflow-x:auto}\
.flash{background:#fde2e2;border:1px solid #e0a0a0;padding:.5rem .75rem}";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

/// Upload form, preceded by `message` when there is one.
pub fn upload_page(message: Option<&str>) -> String {
    let mut body = String::from("<h1>Drone interval analysis</h1>\n");
    if let Some(message) = message {
        body.push_str(&format!("<p class=\"flash\">{}</p>\n", escape_html(message)));
    }
    body.push_str(
        "<p>Upload a recording that opens with at least two seconds of the drone.</p>\n\
         <form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"audio_file\" accept=\"audio/*\">\n\
         <button type=\"submit\">Analyse</button>\n\
         </form>\n",
    );
    page("Drone interval analysis", &body)
}

/// Drone frequency and a preview of the first `preview_len` frames.
pub fn results_page(filename: Option<&str>, analysis: &Analysis, preview_len: usize) -> String {
    let preview = analysis.preview(preview_len);
    let mut body = String::from("<h1>Analysis results</h1>\n");
    if let Some(name) = filename {
        body.push_str(&format!("<p>File: <code>{}</code></p>\n", escape_html(name)));
    }
    body.push_str(&format!(
        "<p>Drone reference: {:.2} Hz (from the first {} frames)</p>\n\
         <p>Voiced frames: {} of {}</p>\n\
         <h2>Frame times (s)</h2>\n<pre>{}</pre>\n\
         <h2>Intervals</h2>\n<pre>{}</pre>\n\
         <h2>Cents from drone</h2>\n<pre>{}</pre>\n\
         <h2>Pitches (Hz)</h2>\n<pre>{}</pre>\n\
         <h2>Voiced flags</h2>\n<pre>{}</pre>\n\
         <p><a href=\"/\">Analyse another file</a></p>\n",
        analysis.drone_hz,
        analysis.drone_window_frames,
        analysis.track.voiced_count(),
        analysis.len(),
        escape_html(&preview.times),
        escape_html(&preview.labels),
        escape_html(&preview.cents),
        escape_html(&preview.frequencies),
        escape_html(&preview.voiced_flags),
    ));
    page("Analysis results", &body)
}

/// Message shown to the uploader for a failed analysis. Never contains
/// paths or raw error text.
pub fn user_message(err: &Error) -> &'static str {
    match err {
        Error::SourceNotFound { .. } => "Error: the uploaded file was not found after saving.",
        Error::Decode(_) => "Error: the uploaded file could not be decoded as audio.",
        Error::EmptyAudio => "Error: the uploaded file contains no audio.",
        Error::NonFiniteAudio => "Error: the uploaded file contains invalid samples.",
        Error::DroneUndetermined { .. } => {
            "Error: no drone pitch was detected in the first seconds of the recording."
        }
        _ => "An error occurred during analysis.",
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn messages_hide_paths() {
        let err = Error::SourceNotFound {
            path: PathBuf::from("/tmp/drone-intervals-uploads/abc.wav"),
        };
        assert!(!user_message(&err).contains("/tmp"));
        let err = Error::DroneUndetermined { window_frames: 86 };
        assert!(user_message(&err).contains("drone"));
    }

    #[test]
    fn flash_is_escaped() {
        let html = upload_page(Some("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
