fn main() {
    if let Err(err) = panconfig::run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
