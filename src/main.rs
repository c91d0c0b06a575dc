fn main() {
    if let Err(e) = plex_presence_lib::run() {
        eprintln!("plex-presence: {}", e);
        std::process::exit(1);
    }
}
