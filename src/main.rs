use std::process;

fn main() {
    if let Err(err) = cedar_chess::uci::uci_top::run_stdio_loop() {
        eprintln!("fatal I/O error: {err}");
        process::exit(1);
    }
}
