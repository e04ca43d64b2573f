pub mod events;
pub mod file_info;
pub mod viewer_redirect;

pub use events::attachments_posted;
pub use file_info::get_file_info;
pub use viewer_redirect::viewer_redirect;
