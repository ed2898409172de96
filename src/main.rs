fn main() {
    if let Err(err) = artwork_views::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
