use criterion::{criterion_group, criterion_main, Criterion};
use image::{DynamicImage, RgbImage};

fn carrier_image() -> DynamicImage {
    let mut rng = fastrand::Rng::with_seed(42);
    let mut pixels = vec![0u8; 256 * 256 * 3];
    for pixel in pixels.iter_mut() {
        *pixel = rng.u8(..);
    }
    DynamicImage::ImageRgb8(RgbImage::from_raw(256, 256, pixels).expect("buffer matches size"))
}

pub fn jpeg_hiding(c: &mut Criterion) {
    c.bench_function("Jsteg Hide 256x256", |b| {
        let image = carrier_image();
        let secret_message = b"Hello World!";

        b.iter(|| {
            let mut jpeg = Vec::new();
            jsteg::hide(&mut jpeg, &image, secret_message, None).expect("Cannot hide secret message");
        })
    });
}

pub fn jpeg_revealing(c: &mut Criterion) {
    c.bench_function("Jsteg Reveal 256x256", |b| {
        let mut jpeg = Vec::new();
        jsteg::hide(&mut jpeg, &carrier_image(), b"Hello World!", None)
            .expect("Cannot hide secret message");

        b.iter(|| {
            jsteg::reveal(jpeg.as_slice()).expect("Failed to reveal");
        })
    });
}

criterion_group!(benches, jpeg_hiding, jpeg_revealing);
criterion_main!(benches);
