fn main() {
    if let Err(err) = codetrack_lib::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
