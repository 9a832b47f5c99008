use std::sync::Arc;

use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::{gio, glib};

use crate::bridge::{DevconfigManager, HostBridge, StdioBridge};
use crate::ui::DevconfigWindow;

mod imp {
    use super::*;
    use std::cell::OnceCell;

    #[derive(Default)]
    pub struct DevconfigApplication {
        pub manager: OnceCell<DevconfigManager>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for DevconfigApplication {
        const NAME: &'static str = "DevconfigApplication";
        type Type = super::DevconfigApplication;
        type ParentType = adw::Application;
    }

    impl ObjectImpl for DevconfigApplication {}

    impl ApplicationImpl for DevconfigApplication {
        fn activate(&self) {
            let app = self.obj();

            // Initialize bridge and manager on first activation
            let manager = self.manager.get_or_init(|| {
                let bridge: Arc<dyn HostBridge> = Arc::new(StdioBridge::new());

                super::apply_theme(bridge.as_ref());

                if let Some(init_data) = bridge.init_data() {
                    tracing::debug!("Host init data: {} bytes", init_data.len());
                }

                let manager = DevconfigManager::new();
                manager.start(bridge);
                manager.request_expand();
                manager.request_enable_closing_confirmation();
                manager
            });

            let window = if let Some(window) = app.active_window() {
                window
            } else {
                let window = DevconfigWindow::new(app.upcast_ref(), manager);
                window.upcast()
            };

            window.present();

            manager.request_status();
            manager.announce_ready();
        }
    }

    impl GtkApplicationImpl for DevconfigApplication {}
    impl AdwApplicationImpl for DevconfigApplication {}
}

glib::wrapper! {
    pub struct DevconfigApplication(ObjectSubclass<imp::DevconfigApplication>)
        @extends gio::Application, gtk::Application, adw::Application,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl DevconfigApplication {
    pub fn new(application_id: &str, flags: &gio::ApplicationFlags) -> Self {
        glib::Object::builder()
            .property("application-id", application_id)
            .property("flags", flags)
            .build()
    }
}

/// Install the stylesheet with the host theme colors prepended, so the
/// `@devcfg_*` references resolve within a single provider.
fn apply_theme(bridge: &dyn HostBridge) {
    let base = gio::resources_lookup_data(
        "/dev/espmon/devconfig/style.css",
        gio::ResourceLookupFlags::NONE,
    )
    .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    .unwrap_or_default();

    let css = format!("{}\n{}", bridge.theme().css(), base);

    let provider = gtk::CssProvider::new();
    provider.load_from_string(&css);
    gtk::style_context_add_provider_for_display(
        &gtk::gdk::Display::default().unwrap(),
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}
