/// Starts the ger viewer.
///
/// Usage: `ger_viewer [config.toml]`. Without an argument `res/config.toml` is read.
fn main() {
    pollster::block_on(viewer_lib::run(std::env::args().nth(1)));
}
