use log::{error, info, warn};
use rocket::form::{Errors, Form};
use rocket::fs::TempFile;
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use rocket::response::{Flash, Redirect};
use rocket::{FromForm, State, get, post, uri};

use super::conf::Conf;
use super::upload::ScopedUpload;
use super::views;
use crate::AnalysisConfig;

#[derive(FromForm)]
pub struct UploadForm<'r> {
    pub audio_file: Option<TempFile<'r>>,
}

fn back_to_index(message: &str) -> Flash<Redirect> {
    Flash::error(Redirect::to(uri!(index)), message)
}

#[get("/")]
pub fn index(flash: Option<FlashMessage<'_>>) -> RawHtml<String> {
    RawHtml(views::upload_page(flash.as_ref().map(|f| f.message())))
}

#[post("/upload", data = "<form>")]
pub async fn upload(
    form: Result<Form<UploadForm<'_>>, Errors<'_>>,
    conf: &State<Conf>,
    analysis_config: &State<AnalysisConfig>,
) -> Result<RawHtml<String>, Flash<Redirect>> {
    let form = form.map_err(|errs| {
        warn!("rejected upload form: {errs}");
        back_to_index("The upload could not be read.")
    })?;
    let Some(mut file) = form.into_inner().audio_file else {
        return Err(back_to_index("No file part"));
    };
    if file.len() == 0 {
        return Err(back_to_index("No selected file"));
    }

    let filename = file.name().map(str::to_string);
    let extension = file
        .content_type()
        .and_then(|ct| ct.extension())
        .map(|ext| ext.as_str().to_ascii_lowercase());
    let upload = ScopedUpload::new(&conf.upload_dir, extension.as_deref());
    if let Err(err) = file.copy_to(upload.path()).await {
        error!("error saving upload to {}: {err}", upload.path().display());
        return Err(back_to_index("The uploaded file could not be saved."));
    }
    info!("analysing upload of {} bytes", file.len());

    let path = upload.path().to_path_buf();
    let config = analysis_config.inner().clone();
    let outcome =
        rocket::tokio::task::spawn_blocking(move || crate::analyze_file(&path, &config)).await;

    match outcome {
        Ok(Ok(analysis)) => Ok(RawHtml(views::results_page(
            filename.as_deref(),
            &analysis,
            conf.preview_len,
        ))),
        Ok(Err(err)) => {
            warn!("analysis of upload failed: {err}");
            Err(back_to_index(views::user_message(&err)))
        }
        Err(err) => {
            error!("analysis task failed: {err}");
            Err(back_to_index("An error occurred during analysis."))
        }
    }
}
