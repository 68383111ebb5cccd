use fototag::{GeotagRequest, ImageAsset, Location, MediaType, Pipeline};

/// Real JPEG produced by an actual encoder, no Exif segment yet
fn jpeg_fixture() -> Vec<u8> {
    let pixels = vec![[120_u8, 140, 160]; 8 * 8].concat();
    let mut out = Vec::new();
    let encoder = jpeg_encoder::Encoder::new(&mut out, 90);
    encoder
        .encode(&pixels, 8, 8, jpeg_encoder::ColorType::Rgb)
        .unwrap();
    out
}

fn png_fixture() -> Vec<u8> {
    let image = image::DynamicImage::new_rgb8(8, 8);
    let mut out = std::io::Cursor::new(Vec::new());
    image.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn assert_close(location: Location, lat: f64, lon: f64) {
    assert!(
        (location.lat.0 - lat).abs() < 1e-4,
        "latitude {} vs {lat}",
        location.lat.0
    );
    assert!(
        (location.lon.0 - lon).abs() < 1e-4,
        "longitude {} vs {lon}",
        location.lon.0
    );
}

#[test]
fn tag_jpeg_end_to_end() {
    let pipeline = Pipeline::new();

    let request = GeotagRequest {
        location: Location::new(48.8584, 2.2945).unwrap(),
        description: Some("Dusk at the tower".into()),
        keywords: vec!["paris".into(), "travel".into()],
    };

    let tagged = pipeline
        .tag_image(jpeg_fixture(), MediaType::Jpeg, &request)
        .unwrap();
    assert!(tagged.starts_with(&[0xFF, 0xD8]));

    let exif = pipeline.read_metadata(&tagged).unwrap();
    assert_close(exif.gps().unwrap(), 48.8584, 2.2945);
    assert_eq!(exif.description(), Some("Dusk at the tower".into()));
    assert_eq!(exif.keywords(), Some("paris;travel".into()));
}

#[test]
fn png_is_coerced_to_jpeg() {
    let pipeline = Pipeline::new();
    let request = GeotagRequest::location(Location::new(-33.8688, 151.2093).unwrap());

    let tagged = pipeline
        .tag_image(png_fixture(), MediaType::Png, &request)
        .unwrap();

    // Output must be a JPEG regardless of the input format
    assert!(tagged.starts_with(&[0xFF, 0xD8]));

    let exif = pipeline.read_metadata(&tagged).unwrap();
    let location = exif.gps().unwrap();
    assert_close(location, -33.8688, 151.2093);
    assert_eq!(location.lat_ref().to_string(), "S");
    assert_eq!(location.lon_ref().to_string(), "E");
}

#[test]
fn retagging_replaces_the_location() {
    let pipeline = Pipeline::new();

    let first = pipeline
        .tag_image(
            jpeg_fixture(),
            MediaType::Jpeg,
            &GeotagRequest::location(Location::new(48.8584, 2.2945).unwrap()),
        )
        .unwrap();

    let second = pipeline
        .tag_image(
            first,
            MediaType::Jpeg,
            &GeotagRequest::location(Location::new(35.6586, 139.7454).unwrap()),
        )
        .unwrap();

    let exif = Pipeline::new().read_metadata(&second).unwrap();
    assert_close(exif.gps().unwrap(), 35.6586, 139.7454);
}

#[test]
fn tagged_file_reports_its_location_on_admission() {
    let pipeline = Pipeline::new();
    let request = GeotagRequest::location(Location::new(48.8584, 2.2945).unwrap());

    let tagged = pipeline
        .tag_image(jpeg_fixture(), MediaType::Jpeg, &request)
        .unwrap();

    let asset = ImageAsset::new("tower.jpg", Some("image/jpeg"), tagged).unwrap();
    assert_close(asset.existing_location().unwrap(), 48.8584, 2.2945);

    // Fresh encoder output has no position
    let plain = ImageAsset::new("plain.jpg", None, jpeg_fixture()).unwrap();
    assert_eq!(plain.existing_location(), None);
}

#[test]
fn optional_fields_left_absent() {
    let pipeline = Pipeline::new();
    let request = GeotagRequest::location(Location::new(48.8584, 2.2945).unwrap());

    let tagged = pipeline
        .tag_image(jpeg_fixture(), MediaType::Jpeg, &request)
        .unwrap();

    // GPS is always written, description and keywords only on request
    let exif = pipeline.read_metadata(&tagged).unwrap();
    assert!(exif.gps().is_some());
    assert_eq!(exif.description(), None);
    assert_eq!(exif.keywords(), None);
}

#[test]
fn equator_and_prime_meridian_map_to_positive_hemispheres() {
    let pipeline = Pipeline::new();
    let request = GeotagRequest::location(Location::new(0., 0.).unwrap());

    let tagged = pipeline
        .tag_image(jpeg_fixture(), MediaType::Jpeg, &request)
        .unwrap();

    let location = pipeline.read_metadata(&tagged).unwrap().gps().unwrap();
    assert_eq!(location.lat_ref().to_string(), "N");
    assert_eq!(location.lon_ref().to_string(), "E");
    assert_close(location, 0., 0.);
}

#[test]
fn out_of_range_coordinates_are_rejected() {
    assert!(Location::new(90.0001, 0.).is_err());
    assert!(Location::new(0., 180.0001).is_err());
    assert!(Location::new(-90., -180.).is_ok());
}
