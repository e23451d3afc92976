use dominance::{CountConfig, PngImage};

fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| "logo.png".to_owned());
    let image = PngImage::open(path).unwrap();

    match dominance::count(&image, &CountConfig::default()).unwrap() {
        Some(stats) => println!("{}", stats),
        None => println!("{} is not supported", image.file_name()),
    }
}
