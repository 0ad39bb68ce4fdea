fn main() {
    if let Err(err) = coordinate_core::run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
