//! Command-line entry point for the `mirador` STL viewer binary.

use mirador::Viewer;

fn main() {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        log::error!("Usage: mirador <STL file>");
        std::process::exit(1);
    };

    if !std::path::Path::new(&path).exists() {
        log::error!("File not found: {path}");
        std::process::exit(1);
    }

    let result = Viewer::builder().with_path(path).build().run();
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
