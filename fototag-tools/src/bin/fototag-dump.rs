use fototag::export::MetadataSummary;
use fototag::Pipeline;
use tracing_subscriber::prelude::*;

fn main() {
    let path = std::env::args().nth(1).unwrap();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::builder().from_env_lossy())
        .with(tracing_subscriber::fmt::Layer::default().compact())
        .init();

    let data = std::fs::read(&path).unwrap();
    let exif = Pipeline::new().read_metadata(&data).unwrap();

    println!("{}", MetadataSummary::new(path, &exif).to_json());
}
