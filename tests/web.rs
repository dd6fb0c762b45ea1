#![cfg(feature = "web")]

use std::path::{Path, PathBuf};

use drone_intervals::web::{self, Conf};
use drone_intervals::{AnalysisConfig, io};
use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;

const BOUNDARY: &str = "X-DRONE-INTERVALS-BOUNDARY";

fn client(tag: &str) -> (Client, PathBuf) {
    let upload_dir = std::env::temp_dir().join(format!(
        "drone_intervals_web_{}_{}",
        tag,
        std::process::id()
    ));
    let conf = Conf {
        upload_dir: upload_dir.clone(),
        ..Conf::default()
    };
    let client = Client::tracked(web::build(conf, AnalysisConfig::default())).unwrap();
    (client, upload_dir)
}

fn wav_bytes(tag: &str, samples: &[f32]) -> Vec<u8> {
    let path = std::env::temp_dir().join(format!(
        "drone_intervals_web_fixture_{}_{}.wav",
        tag,
        std::process::id()
    ));
    io::save_wav(&path, samples, 22050).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).ok();
    bytes
}

fn multipart(field: &str, filename: &str, content_type: &str, content: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn post_upload(client: &Client, body: Vec<u8>) -> rocket::local::blocking::LocalResponse<'_> {
    client
        .post("/upload")
        .header(ContentType::new("multipart", "form-data").with_params(("boundary", BOUNDARY)))
        .body(body)
        .dispatch()
}

fn assert_empty_dir(dir: &Path) {
    let leftover: Vec<_> = std::fs::read_dir(dir)
        .map(|entries| entries.flatten().map(|e| e.path()).collect())
        .unwrap_or_default();
    assert!(leftover.is_empty(), "uploads left behind: {leftover:?}");
}

/// Follow the flash redirect and return the rendered index page.
fn flashed_index(client: &Client) -> String {
    client.get("/").dispatch().into_string().unwrap()
}

#[test]
fn index_serves_upload_form() {
    let (client, _) = client("index");
    let response = client.get("/").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_string().unwrap();
    assert!(body.contains("name=\"audio_file\""));
    assert!(body.contains("multipart/form-data"));
}

#[test]
fn upload_renders_preview_and_cleans_up() {
    let (client, dir) = client("ok");
    let mut samples = io::tone(440.0, 22050, 2.0);
    samples.extend(io::tone(523.25, 22050, 1.0));
    let body = multipart("audio_file", "drone.wav", "audio/wav", &wav_bytes("ok", &samples));

    let response = post_upload(&client, body);
    assert_eq!(response.status(), Status::Ok);
    let html = response.into_string().unwrap();
    assert!(html.contains("Drone reference: 44"));
    assert!(html.contains("[Unison, Unison"));
    assert!(html.contains("]..."));
    assert!(!html.contains(dir.to_string_lossy().as_ref()));
    assert_empty_dir(&dir);
}

#[test]
fn undecodable_upload_flashes_and_cleans_up() {
    let (client, dir) = client("garbage");
    let body = multipart("audio_file", "notes.wav", "audio/wav", b"definitely not audio");

    let response = post_upload(&client, body);
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(response.headers().get_one("Location"), Some("/"));
    assert_empty_dir(&dir);

    let page = flashed_index(&client);
    assert!(page.contains("could not be decoded"));
    assert!(!page.contains(dir.to_string_lossy().as_ref()));
}

#[test]
fn silent_upload_reports_missing_drone() {
    let (client, dir) = client("silent");
    let body = multipart("audio_file", "quiet.wav", "audio/wav", &wav_bytes("silent", &vec![0.0; 22050 * 3]));

    let response = post_upload(&client, body);
    assert_eq!(response.status(), Status::SeeOther);
    assert_empty_dir(&dir);
    assert!(flashed_index(&client).contains("no drone pitch"));
}

#[test]
fn empty_file_is_no_selected_file() {
    let (client, dir) = client("empty");
    let response = post_upload(&client, multipart("audio_file", "", "application/octet-stream", b""));
    assert_eq!(response.status(), Status::SeeOther);
    assert_empty_dir(&dir);
    assert!(flashed_index(&client).contains("No selected file"));
}

#[test]
fn missing_field_is_no_file_part() {
    let (client, _) = client("nofield");
    let response = post_upload(&client, multipart("other", "drone.wav", "audio/wav", b"RIFF"));
    assert_eq!(response.status(), Status::SeeOther);
    assert!(flashed_index(&client).contains("No file part"));
}
