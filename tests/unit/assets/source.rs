use std::io::Cursor;

use super::*;

fn encoded(img: image::RgbImage, format: image::ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

#[test]
fn png_sources_are_reencoded_as_jpeg() {
    let png = encoded(
        image::RgbImage::from_pixel(6, 2, image::Rgb([200, 10, 10])),
        image::ImageFormat::Png,
    );
    let source = ImageSource::from_bytes(png).unwrap();

    assert_eq!(source.image().width, 6);
    assert_eq!(source.image().height, 2);
    assert_eq!(source.payload().mime_type, AI_PAYLOAD_MIME);
    let payload = source.payload().bytes().unwrap();
    assert_eq!(decode::sniff_mime(&payload), Some("image/jpeg"));
}

#[test]
fn jpeg_sources_are_forwarded_verbatim() {
    let jpeg = encoded(
        image::RgbImage::from_pixel(3, 3, image::Rgb([0, 128, 255])),
        image::ImageFormat::Jpeg,
    );
    let source = ImageSource::from_bytes(jpeg.clone()).unwrap();
    assert_eq!(source.payload().bytes().unwrap(), jpeg);
}

#[test]
fn data_urls_round_trip() {
    let enc = EncodedImage::from_bytes("image/png", b"\x89PNG");
    let url = enc.to_data_url();
    assert!(url.starts_with("data:image/png;base64,"));
    assert_eq!(EncodedImage::parse_data_url(&url).unwrap(), enc);
    assert_eq!(enc.bytes().unwrap(), b"\x89PNG");
}

#[test]
fn malformed_data_urls_are_rejected() {
    assert!(EncodedImage::parse_data_url("image/png;base64,AAAA").is_err());
    assert!(EncodedImage::parse_data_url("data:image/png;base64").is_err());
    assert!(EncodedImage::parse_data_url("data:image/png,AAAA").is_err());
    assert!(EncodedImage::parse_data_url("data:;base64,AAAA").is_err());
}

#[test]
fn invalid_base64_is_a_decode_error() {
    let enc = EncodedImage {
        mime_type: AI_PAYLOAD_MIME.to_string(),
        data: "!!!not base64!!!".to_string(),
    };
    assert!(matches!(enc.bytes(), Err(MemeError::Decode(_))));
}

#[tokio::test]
async fn async_decode_matches_blocking_decode() {
    let png = encoded(
        image::RgbImage::from_pixel(5, 5, image::Rgb([1, 2, 3])),
        image::ImageFormat::Png,
    );
    let a = ImageSource::decode(png.clone()).await.unwrap();
    let b = ImageSource::from_bytes(png).unwrap();
    assert_eq!(a.image(), b.image());
}

#[tokio::test]
async fn decode_failure_surfaces_as_error() {
    let err = ImageSource::decode(b"nope".to_vec()).await.unwrap_err();
    assert!(matches!(err, MemeError::Decode(_)));
}

#[test]
fn oversized_png_is_downscaled_before_jpeg_encoding() {
    let png = encoded(
        image::RgbImage::from_pixel(70_000, 2, image::Rgb([40, 80, 120])),
        image::ImageFormat::Png,
    );
    let source = ImageSource::from_bytes(png).unwrap();

    assert_eq!(source.image().width, decode::MAX_IMAGE_DIMENSION);
    let payload = source.payload().bytes().unwrap();
    assert_eq!(decode::sniff_mime(&payload), Some("image/jpeg"));
    let sent = image::load_from_memory(&payload).unwrap();
    assert_eq!(sent.width(), decode::MAX_IMAGE_DIMENSION);
    assert!(sent.height() >= 1);
}

#[tokio::test]
async fn fetch_url_downloads_and_decodes() {
    use httpmock::prelude::*;

    let png = encoded(
        image::RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30])),
        image::ImageFormat::Png,
    );
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET).path("/templates/cat.png");
            then.status(200).header("content-type", "image/png").body(png);
        })
        .await;

    let url = format!("{}/templates/cat.png", server.base_url());
    let source = ImageSource::fetch_url(&reqwest::Client::new(), &url)
        .await
        .unwrap();
    m.assert_async().await;
    assert_eq!((source.image().width, source.image().height), (4, 3));
    assert_eq!(source.payload().mime_type, AI_PAYLOAD_MIME);
}

#[tokio::test]
async fn fetch_url_rejects_error_status() {
    use httpmock::prelude::*;

    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET).path("/missing.png");
            then.status(404).body("not found");
        })
        .await;

    let url = format!("{}/missing.png", server.base_url());
    let err = ImageSource::fetch_url(&reqwest::Client::new(), &url)
        .await
        .unwrap_err();
    m.assert_async().await;
    assert!(matches!(err, MemeError::Other(_)), "{err}");
    assert!(err.to_string().contains("missing.png"), "{err}");
}
