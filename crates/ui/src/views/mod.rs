mod chat;
pub(crate) mod components;
mod dashboard;
mod login;
mod path_detail;
mod register;
mod roadmap;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use chat::ChatView;
pub use dashboard::DashboardView;
pub use login::LoginView;
pub use path_detail::LearningPathView;
pub use register::RegisterView;
pub use roadmap::RoadmapView;
pub use state::{ViewError, ViewState, view_state_from_resource};
