use std::io::Read;

use fototag::{
    BatchOutput, BatchRunner, GeotagRequest, ImageAsset, Location, Status, Summary,
};

fn jpeg_fixture() -> Vec<u8> {
    let pixels = vec![[30_u8, 60, 90]; 8 * 8].concat();
    let mut out = Vec::new();
    let encoder = jpeg_encoder::Encoder::new(&mut out, 90);
    encoder
        .encode(&pixels, 8, 8, jpeg_encoder::ColorType::Rgb)
        .unwrap();
    out
}

/// Sniffs as WebP but cannot be decoded
fn broken_webp() -> Vec<u8> {
    let mut data = b"RIFF\x10\x00\x00\x00WEBP".to_vec();
    data.extend_from_slice(&[0; 8]);
    data
}

/// Sniffs as JPEG but its segment table cannot be parsed
fn broken_jpeg() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0xFF, 0xFF]
}

fn request() -> GeotagRequest {
    GeotagRequest::location(Location::new(48.8584, 2.2945).unwrap())
}

#[test]
fn failures_do_not_abort_the_batch() {
    let mut assets = vec![
        ImageAsset::new("a.jpg", None, jpeg_fixture()).unwrap(),
        ImageAsset::new("b.jpg", None, broken_jpeg()).unwrap(),
        ImageAsset::new("c.jpg", None, jpeg_fixture()).unwrap(),
        ImageAsset::new("d.jpg", None, broken_jpeg()).unwrap(),
        ImageAsset::new("e.jpg", None, jpeg_fixture()).unwrap(),
    ];

    let mut ticks = Vec::new();
    let result = BatchRunner::new()
        .run(&mut assets, &request(), |done, total| {
            ticks.push((done, total))
        })
        .unwrap();

    assert_eq!(ticks, vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]);

    // Input order is preserved in the results
    let names: Vec<_> = result.items.iter().map(|x| x.file_name.as_str()).collect();
    assert_eq!(
        names,
        [
            "a_geotagged.jpg",
            "b_geotagged.jpg",
            "c_geotagged.jpg",
            "d_geotagged.jpg",
            "e_geotagged.jpg",
        ]
    );

    assert_eq!(
        result.summary(),
        Summary::Partial {
            succeeded: 3,
            failed: 2
        }
    );

    assert_eq!(assets[0].status(), Status::Tagged);
    assert_eq!(assets[1].status(), Status::Failed);
    assert_eq!(assets[4].status(), Status::Tagged);
}

#[test]
fn multiple_successes_become_an_archive() {
    let mut assets = vec![
        ImageAsset::new("a.jpg", None, jpeg_fixture()).unwrap(),
        ImageAsset::new("b.webp", None, broken_webp()).unwrap(),
        ImageAsset::new("c.jpg", None, jpeg_fixture()).unwrap(),
    ];

    let result = BatchRunner::new()
        .run(&mut assets, &request(), |_, _| {})
        .unwrap();

    let Some(BatchOutput::Archive { file_name, data }) = result.output().unwrap() else {
        panic!("expected an archive");
    };
    assert_eq!(file_name, "geotagged_images.zip");

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
    assert_eq!(archive.len(), 2);

    let mut entry = archive.by_name("a_geotagged.jpg").unwrap();
    let mut content = Vec::new();
    entry.read_to_end(&mut content).unwrap();
    assert!(content.starts_with(&[0xFF, 0xD8]));
    drop(entry);

    assert!(archive.by_name("c_geotagged.jpg").is_ok());
}

#[test]
fn single_success_is_a_plain_file() {
    let mut assets = vec![ImageAsset::new("photo.jpg", None, jpeg_fixture()).unwrap()];

    let result = BatchRunner::new()
        .run(&mut assets, &request(), |_, _| {})
        .unwrap();

    assert_eq!(result.summary(), Summary::AllSucceeded { count: 1 });

    let Some(BatchOutput::Single { file_name, data }) = result.output().unwrap() else {
        panic!("expected a single file");
    };
    assert_eq!(file_name, "photo_geotagged.jpg");
    assert!(data.starts_with(&[0xFF, 0xD8]));
}

#[test]
fn all_failed_has_no_output() {
    let mut assets = vec![
        ImageAsset::new("a.webp", None, broken_webp()).unwrap(),
        ImageAsset::new("b.webp", None, broken_webp()).unwrap(),
    ];

    let result = BatchRunner::new()
        .run(&mut assets, &request(), |_, _| {})
        .unwrap();

    assert_eq!(result.summary(), Summary::AllFailed { count: 2 });
    assert!(result.output().unwrap().is_none());
}

#[test]
fn batch_size_is_capped() {
    let mut assets: Vec<_> = (0..fototag::MAX_FILES + 1)
        .map(|n| ImageAsset::new(format!("{n}.jpg"), None, jpeg_fixture()).unwrap())
        .collect();

    let err = BatchRunner::new().run(&mut assets, &request(), |_, _| {});
    assert!(err.is_err());
}
