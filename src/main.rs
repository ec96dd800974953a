//! Binary entry point for `avakas`.

use std::process;

fn main() {
    if let Err(e) = avakas::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
