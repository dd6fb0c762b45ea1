use drone_intervals::AnalysisConfig;
use drone_intervals::web::{self, Conf};

#[rocket::launch]
fn rocket() -> _ {
    web::build(Conf::from_env(), AnalysisConfig::default())
}
