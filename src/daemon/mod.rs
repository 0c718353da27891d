//! Banner daemon - keeps the banners on screen until told to stop

mod dispatcher;
mod handlers;
mod main_loop;
mod session;

pub use main_loop::run_banner_daemon;
