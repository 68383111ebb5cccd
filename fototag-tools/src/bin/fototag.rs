use fototag::{BatchRunner, GeotagRequest, ImageAsset, Location};
use tracing_subscriber::prelude::*;

fn main() {
    let mut args = std::env::args().skip(1);
    let (Some(lat), Some(lon)) = (args.next(), args.next()) else {
        eprintln!("Usage: fototag <LAT> <LON> <FILE>...");
        std::process::exit(1);
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::builder().from_env_lossy())
        .with(tracing_subscriber::fmt::Layer::default().compact())
        .init();

    let location = Location::new(lat.parse().unwrap(), lon.parse().unwrap()).unwrap();
    let request = GeotagRequest::location(location);

    let mut assets: Vec<_> = args
        .map(|path| {
            let data = std::fs::read(&path).unwrap();
            ImageAsset::new(path, None, data).unwrap()
        })
        .collect();

    let result = BatchRunner::new()
        .run(&mut assets, &request, |done, total| {
            eprintln!("{done}/{total}");
        })
        .unwrap();

    for item in &result.items {
        match &item.result {
            Ok(data) => std::fs::write(&item.file_name, data).unwrap(),
            Err(err) => eprintln!("{}: {err}", item.file_name),
        }
    }

    println!("{}", result.summary());
}
