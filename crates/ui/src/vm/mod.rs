mod auth_vm;
mod chat_vm;
mod course_vm;
mod markdown_vm;
mod path_vm;
mod roadmap_vm;
mod time_fmt;

pub use auth_vm::{AfterSignUp, FormStatus, submit_login, submit_register};
pub use chat_vm::{ChatBubbleVm, ChatVm, PendingSend, map_chat_bubbles};
pub use course_vm::{
    CourseListVm, PendingToggle, TOGGLE_FAILED_MESSAGE, ToggleState, commit_toggle,
};
pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use path_vm::{DEFAULT_PATH_METADATA, PathCardVm, PathMetadata, map_path_cards, path_metadata};
pub use roadmap_vm::{NodeStyle, RoadmapScreen, RoadmapVm, node_style};
pub use time_fmt::{format_hours, format_message_time};
