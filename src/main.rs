use std::process;

fn main() {
    if let Err(e) = utask::cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
