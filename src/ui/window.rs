use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::{gio, glib};
use std::cell::{Cell, OnceCell};

use crate::bridge::DevconfigManager;
use crate::ui::ConfigPage;

mod imp {
    use super::*;

    #[derive(Default, gtk::CompositeTemplate)]
    #[template(resource = "/dev/espmon/devconfig/ui/window.ui")]
    pub struct DevconfigWindow {
        #[template_child]
        pub config_page: TemplateChild<ConfigPage>,

        pub manager: OnceCell<DevconfigManager>,
        /// Set once the bridge approved closing; lets close_request proceed.
        pub allow_close: Cell<bool>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for DevconfigWindow {
        const NAME: &'static str = "DevconfigWindow";
        type Type = super::DevconfigWindow;
        type ParentType = adw::ApplicationWindow;

        fn class_init(klass: &mut Self::Class) {
            ConfigPage::ensure_type();
            klass.bind_template();
        }

        fn instance_init(obj: &glib::subclass::InitializingObject<Self>) {
            obj.init_template();
        }
    }

    impl ObjectImpl for DevconfigWindow {
        fn constructed(&self) {
            self.parent_constructed();
        }
    }

    impl WidgetImpl for DevconfigWindow {}

    impl WindowImpl for DevconfigWindow {
        // Closing confirmation: the window's close button runs the same
        // "Close without saving?" prompt as the cancel button.
        fn close_request(&self) -> glib::Propagation {
            if self.allow_close.get() {
                return self.parent_close_request();
            }
            self.config_page.confirm_close();
            glib::Propagation::Stop
        }
    }

    impl ApplicationWindowImpl for DevconfigWindow {}
    impl AdwApplicationWindowImpl for DevconfigWindow {}
}

glib::wrapper! {
    pub struct DevconfigWindow(ObjectSubclass<imp::DevconfigWindow>)
        @extends gtk::Widget, gtk::Window, gtk::ApplicationWindow, adw::ApplicationWindow,
        @implements gio::ActionGroup, gio::ActionMap, gtk::Accessible, gtk::Buildable,
                    gtk::ConstraintTarget, gtk::Native, gtk::Root, gtk::ShortcutManager;
}

impl DevconfigWindow {
    pub fn new(app: &adw::Application, manager: &DevconfigManager) -> Self {
        let window: Self = glib::Object::builder()
            .property("application", app)
            .build();

        window.imp().manager.set(manager.clone()).unwrap();
        window.imp().config_page.set_manager(manager);

        manager.connect_closure(
            "close-requested",
            false,
            glib::closure_local!(
                #[weak(rename_to = window)]
                window,
                move |_manager: DevconfigManager| {
                    window.imp().allow_close.set(true);
                    window.close();
                }
            ),
        );

        window
    }

    pub fn manager(&self) -> &DevconfigManager {
        self.imp().manager.get().unwrap()
    }
}
