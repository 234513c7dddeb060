use lustre::{ViewerApp, ViewerConfig};
use winit::event_loop::EventLoop;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional config path as the first argument; defaults otherwise.
    let config = match std::env::args().nth(1) {
        Some(path) => match ViewerConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("failed to load config '{path}': {e}");
                std::process::exit(1);
            }
        },
        None => ViewerConfig::default(),
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("failed to create event loop: {e}");
            std::process::exit(1);
        }
    };

    let mut app = ViewerApp::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("event loop terminated with an error: {e}");
        std::process::exit(1);
    }
}
