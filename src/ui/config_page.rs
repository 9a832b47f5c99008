use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::glib;
use std::cell::Cell;
use std::time::Duration;

use crate::bridge::types::Mode;
use crate::bridge::DevconfigManager;
use crate::form::{self, FormInput};
use crate::ui::CloseDialog;

/// How long the success and error banners stay up.
const BANNER_TIMEOUT: Duration = Duration::from_secs(5);
/// Delay between a confirmed save and asking the host to close.
const CLOSE_DELAY: Duration = Duration::from_secs(3);

/// Icon shown on a reveal button for the given masked state.
fn reveal_icon(masked: bool) -> &'static str {
    if masked {
        "view-reveal-symbolic"
    } else {
        "view-conceal-symbolic"
    }
}

/// Flip a masked entry's state; returns the new state and its button icon.
fn toggle_masking(masked: bool) -> (bool, &'static str) {
    let masked = !masked;
    (masked, reveal_icon(masked))
}

/// Last-write-wins clock for one banner: every show bumps the serial, and
/// only the timer holding the newest serial may hide the banner. Each banner
/// has its own clock, so success and error never affect each other.
#[derive(Default)]
struct BannerClock {
    serial: Cell<u32>,
}

impl BannerClock {
    fn show(&self) -> u32 {
        let serial = self.serial.get().wrapping_add(1);
        self.serial.set(serial);
        serial
    }

    fn may_hide(&self, serial: u32) -> bool {
        self.serial.get() == serial
    }
}

mod imp {
    use super::*;
    use std::cell::OnceCell;

    #[derive(Default, gtk::CompositeTemplate)]
    #[template(resource = "/dev/espmon/devconfig/ui/config-page.ui")]
    pub struct ConfigPage {
        #[template_child]
        pub loading_revealer: TemplateChild<gtk::Revealer>,
        #[template_child]
        pub success_revealer: TemplateChild<gtk::Revealer>,
        #[template_child]
        pub error_revealer: TemplateChild<gtk::Revealer>,
        #[template_child]
        pub error_label: TemplateChild<gtk::Label>,
        #[template_child]
        pub current_mode_label: TemplateChild<gtk::Label>,
        #[template_child]
        pub mode_dropdown: TemplateChild<gtk::DropDown>,
        #[template_child]
        pub telegram_group: TemplateChild<gtk::Box>,
        #[template_child]
        pub ssid_entry: TemplateChild<gtk::Entry>,
        #[template_child]
        pub password_entry: TemplateChild<gtk::Entry>,
        #[template_child]
        pub password_toggle: TemplateChild<gtk::Button>,
        #[template_child]
        pub token_entry: TemplateChild<gtk::Entry>,
        #[template_child]
        pub token_toggle: TemplateChild<gtk::Button>,
        #[template_child]
        pub chat_id_entry: TemplateChild<gtk::Entry>,
        #[template_child]
        pub save_button: TemplateChild<gtk::Button>,
        #[template_child]
        pub cancel_button: TemplateChild<gtk::Button>,

        pub manager: OnceCell<DevconfigManager>,
        pub success_clock: BannerClock,
        pub error_clock: BannerClock,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for ConfigPage {
        const NAME: &'static str = "ConfigPage";
        type Type = super::ConfigPage;
        type ParentType = adw::Bin;

        fn class_init(klass: &mut Self::Class) {
            klass.bind_template();
        }

        fn instance_init(obj: &glib::subclass::InitializingObject<Self>) {
            obj.init_template();
        }
    }

    impl ObjectImpl for ConfigPage {
        fn constructed(&self) {
            self.parent_constructed();

            self.mode_dropdown.connect_selected_notify(glib::clone!(
                #[weak(rename_to = page)]
                self,
                move |_| {
                    page.obj().apply_mode_visibility();
                }
            ));

            self.password_toggle.connect_clicked(glib::clone!(
                #[weak(rename_to = page)]
                self,
                move |button| {
                    super::ConfigPage::toggle_reveal(&*page.password_entry, button);
                }
            ));

            self.token_toggle.connect_clicked(glib::clone!(
                #[weak(rename_to = page)]
                self,
                move |button| {
                    super::ConfigPage::toggle_reveal(&*page.token_entry, button);
                }
            ));

            self.save_button.connect_clicked(glib::clone!(
                #[weak(rename_to = page)]
                self,
                move |_| {
                    page.obj().save();
                }
            ));

            self.cancel_button.connect_clicked(glib::clone!(
                #[weak(rename_to = page)]
                self,
                move |_| {
                    page.obj().confirm_close();
                }
            ));
        }
    }

    impl WidgetImpl for ConfigPage {}
    impl BinImpl for ConfigPage {}
}

glib::wrapper! {
    pub struct ConfigPage(ObjectSubclass<imp::ConfigPage>)
        @extends gtk::Widget, adw::Bin,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget;
}

impl ConfigPage {
    pub fn set_manager(&self, manager: &DevconfigManager) {
        let imp = self.imp();
        imp.manager.set(manager.clone()).unwrap();

        // The loading banner tracks the in-flight save and gates both buttons
        manager
            .bind_property("busy", &*imp.loading_revealer, "reveal-child")
            .sync_create()
            .build();
        manager
            .bind_property("busy", &*imp.save_button, "sensitive")
            .invert_boolean()
            .sync_create()
            .build();
        manager
            .bind_property("busy", &*imp.cancel_button, "sensitive")
            .invert_boolean()
            .sync_create()
            .build();

        manager.connect_closure(
            "status-received",
            false,
            glib::closure_local!(
                #[weak(rename_to = page)]
                self,
                move |_manager: DevconfigManager, mode: String, ssid: String, chat_id: String| {
                    page.apply_status(&mode, &ssid, &chat_id);
                }
            ),
        );

        manager.connect_closure(
            "save-complete",
            false,
            glib::closure_local!(
                #[weak(rename_to = page)]
                self,
                move |manager: DevconfigManager| {
                    page.show_success();
                    glib::timeout_add_local_once(
                        CLOSE_DELAY,
                        glib::clone!(
                            #[weak]
                            manager,
                            move || {
                                manager.request_close();
                            }
                        ),
                    );
                }
            ),
        );

        manager.connect_closure(
            "save-error",
            false,
            glib::closure_local!(
                #[weak(rename_to = page)]
                self,
                move |_manager: DevconfigManager, message: String| {
                    page.show_error(&message);
                }
            ),
        );
    }

    /// Show the credential group iff the selected mode is Telegram.
    pub fn apply_mode_visibility(&self) {
        let imp = self.imp();
        let mode = Mode::from_selector_index(imp.mode_dropdown.selected());
        imp.telegram_group.set_visible(mode == Mode::Telegram);
    }

    fn toggle_reveal(entry: &gtk::Entry, button: &gtk::Button) {
        let (masked, icon) = toggle_masking(!gtk::prelude::EntryExt::is_visible(entry));
        entry.set_visibility(!masked);
        button.set_icon_name(icon);
    }

    fn collect_input(&self) -> FormInput {
        let imp = self.imp();
        FormInput {
            mode: Mode::from_selector_index(imp.mode_dropdown.selected()),
            wifi_ssid: imp.ssid_entry.text().to_string(),
            wifi_password: imp.password_entry.text().to_string(),
            bot_token: imp.token_entry.text().to_string(),
            chat_id: imp.chat_id_entry.text().to_string(),
        }
    }

    fn save(&self) {
        match form::validate(&self.collect_input()) {
            Ok(config) => {
                if let Some(manager) = self.imp().manager.get() {
                    manager.save_config(config);
                }
            }
            Err(e) => self.show_error(&e.to_string()),
        }
    }

    /// Ask before closing; the affirmative path goes through the bridge.
    pub fn confirm_close(&self) {
        let page = self.clone();
        glib::spawn_future_local(async move {
            if CloseDialog::new().run(&page).await {
                if let Some(manager) = page.imp().manager.get() {
                    manager.request_close();
                }
            }
        });
    }

    /// Apply one status push: full overwrite of the displayed state.
    fn apply_status(&self, mode: &str, ssid: &str, chat_id: &str) {
        let imp = self.imp();
        let mode = Mode::parse(mode);

        imp.current_mode_label.set_text(mode.status_label());
        if !ssid.is_empty() {
            imp.ssid_entry.set_text(ssid);
        }
        if !chat_id.is_empty() {
            imp.chat_id_entry.set_text(chat_id);
        }
        imp.mode_dropdown.set_selected(mode.selector_index());
        self.apply_mode_visibility();
    }

    pub fn show_success(&self) {
        let imp = self.imp();
        imp.success_revealer.set_reveal_child(true);
        let serial = imp.success_clock.show();
        glib::timeout_add_local_once(
            BANNER_TIMEOUT,
            glib::clone!(
                #[weak(rename_to = page)]
                self,
                move || {
                    if page.imp().success_clock.may_hide(serial) {
                        page.imp().success_revealer.set_reveal_child(false);
                    }
                }
            ),
        );
    }

    pub fn show_error(&self, message: &str) {
        let imp = self.imp();
        imp.error_label.set_text(message);
        imp.error_revealer.set_reveal_child(true);
        let serial = imp.error_clock.show();
        glib::timeout_add_local_once(
            BANNER_TIMEOUT,
            glib::clone!(
                #[weak(rename_to = page)]
                self,
                move || {
                    if page.imp().error_clock.may_hide(serial) {
                        page.imp().error_revealer.set_reveal_child(false);
                    }
                }
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masking_toggle_is_an_involution() {
        let (masked, icon) = toggle_masking(true);
        assert!(!masked);
        assert_eq!(icon, "view-conceal-symbolic");

        let (masked, icon) = toggle_masking(masked);
        assert!(masked);
        assert_eq!(icon, "view-reveal-symbolic");
        assert_eq!(icon, reveal_icon(true));
    }

    #[test]
    fn stale_timer_may_not_hide_a_newer_banner() {
        let clock = BannerClock::default();
        let first = clock.show();
        let second = clock.show();

        assert!(!clock.may_hide(first));
        assert!(clock.may_hide(second));
    }

    #[test]
    fn banner_clocks_tick_independently() {
        let success = BannerClock::default();
        let error = BannerClock::default();

        let shown = success.show();
        error.show();
        error.show();

        assert!(success.may_hide(shown));
        assert!(error.may_hide(error.show()));
    }
}
