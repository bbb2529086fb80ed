fn main() {
    if let Err(err) = gazeboard_lib::run() {
        log::error!("gazeboard failed: {err:?}");
        eprintln!("gazeboard failed: {err:?}");
        std::process::exit(1);
    }
}
