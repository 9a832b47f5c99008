mod application;
mod bridge;
mod form;
mod ui;

use application::DevconfigApplication;
use gtk::prelude::*;
use gtk::{gio, glib};

const APP_ID: &str = "dev.espmon.devconfig";

fn main() -> glib::ExitCode {
    // stdout carries bridge frames; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    gio::resources_register_include!("devconfig.gresource")
        .expect("Failed to register resources");

    let app = DevconfigApplication::new(APP_ID, &gio::ApplicationFlags::empty());
    app.run()
}
