use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::glib;

mod imp {
    use super::*;

    #[derive(Default, gtk::CompositeTemplate)]
    #[template(resource = "/dev/espmon/devconfig/ui/close-dialog.ui")]
    pub struct CloseDialog {}

    #[glib::object_subclass]
    impl ObjectSubclass for CloseDialog {
        const NAME: &'static str = "CloseDialog";
        type Type = super::CloseDialog;
        type ParentType = adw::AlertDialog;

        fn class_init(klass: &mut Self::Class) {
            klass.bind_template();
        }

        fn instance_init(obj: &glib::subclass::InitializingObject<Self>) {
            obj.init_template();
        }
    }

    impl ObjectImpl for CloseDialog {}
    impl WidgetImpl for CloseDialog {}
    impl AdwDialogImpl for CloseDialog {}
    impl AdwAlertDialogImpl for CloseDialog {}
}

glib::wrapper! {
    pub struct CloseDialog(ObjectSubclass<imp::CloseDialog>)
        @extends gtk::Widget, adw::Dialog, adw::AlertDialog,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget;
}

impl CloseDialog {
    pub fn new() -> Self {
        glib::Object::new()
    }

    /// True if the user confirmed closing without saving.
    pub async fn run(self, parent: &impl IsA<gtk::Widget>) -> bool {
        self.choose_future(Some(parent)).await == "close"
    }
}

impl Default for CloseDialog {
    fn default() -> Self {
        Self::new()
    }
}
