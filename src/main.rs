//! Water plane viewer - tessellated water surface with switchable cameras.

use std::env;

use water_plane::viewer::{self, Command, LaunchOptions, USAGE};

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let options = match LaunchOptions::parse(&args) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            println!("Water Plane - tessellated water surface viewer");
            println!();
            println!("{}", USAGE);
            return;
        }
        Ok(Command::Version) => {
            println!(
                "water-plane {} (built {})",
                env!("CARGO_PKG_VERSION"),
                env!("WATER_PLANE_BUILD_DATE")
            );
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    if let Err(e) = viewer::run(options) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
