use std::path::PathBuf;
use std::str::FromStr;

/// Upload server settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Conf {
    /// Directory uploads are copied into while they are analysed.
    pub upload_dir: PathBuf,
    /// Largest accepted upload in MiB.
    pub max_upload_mb: u64,
    /// Frames shown on the results page.
    pub preview_len: usize,
}

impl Default for Conf {
    fn default() -> Self {
        Conf {
            upload_dir: std::env::temp_dir().join("drone-intervals-uploads"),
            max_upload_mb: 64,
            preview_len: 20,
        }
    }
}

impl Conf {
    /// `UPLOAD_DIR`, `MAX_UPLOAD_MB` and `PREVIEW_LEN`, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let defaults = Conf::default();
        Conf {
            upload_dir: dotenv::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            max_upload_mb: parse_var("MAX_UPLOAD_MB", defaults.max_upload_mb),
            preview_len: parse_var("PREVIEW_LEN", defaults.preview_len),
        }
    }
}

fn parse_var<T: FromStr + Copy>(name: &str, default: T) -> T {
    match dotenv::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring unparsable `{name}`={raw:?}");
            default
        }),
        Err(_) => default,
    }
}
