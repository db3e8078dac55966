/// Entry point for the viewer.
///
/// The first argument is an optional path to a scene config.
fn main() {
    pollster::block_on(viewer_lib::run(std::env::args().nth(1)));
}
