mod close_dialog;
mod config_page;
mod window;

pub use close_dialog::CloseDialog;
pub use config_page::ConfigPage;
pub use window::DevconfigWindow;
