//! File-upload front end.
//!
//! `GET /` serves an upload form; `POST /upload` copies the submitted file
//! into a [`ScopedUpload`], analyses it on a blocking thread and renders a
//! preview of the results. Failures redirect back to the form with a flash
//! message. The uploaded copy is removed on every path out of the handler.

use rocket::data::{Limits, ToByteUnit};
use rocket::{Build, Rocket, routes};

use crate::AnalysisConfig;

mod conf;
mod routes;
mod upload;
mod views;

pub use conf::Conf;
pub use upload::ScopedUpload;
pub use views::user_message;

/// Assemble the upload server.
pub fn build(conf: Conf, analysis: AnalysisConfig) -> Rocket<Build> {
    if let Err(err) = std::fs::create_dir_all(&conf.upload_dir) {
        log::error!(
            "could not create upload directory {}: {err}",
            conf.upload_dir.display()
        );
    }
    let limits = Limits::default()
        .limit("file", conf.max_upload_mb.mebibytes())
        .limit("data-form", (conf.max_upload_mb + 1).mebibytes());
    let figment = rocket::Config::figment().merge(("limits", limits));

    rocket::custom(figment)
        .manage(conf)
        .manage(analysis)
        .mount("/", routes![routes::index, routes::upload])
}
