mod auth;
mod chat;
mod course;
mod ids;
mod learning_path;
mod roadmap;
mod user;

pub use auth::{AuthFormError, Credentials, MIN_PASSWORD_LEN, SignUpRequest};
pub use chat::{
    CHAT_FAILURE_MESSAGE, ChatAnswer, ChatMessage, ChatQuestion, ChatRole, WELCOME_MESSAGE,
};
pub use course::{Course, LevelGroup, group_by_level, set_graduated};
pub use ids::{CourseId, LearningPathId, LevelId, MessageId, ParseIdError, UserId};
pub use learning_path::{LearningPath, clamp_percent, round_percent};
pub use roadmap::{
    LEVEL_NAMES, NodeStatus, RoadmapLevel, RoadmapNode, RoadmapProgress, group_into_levels,
    web_development_roadmap,
};
pub use user::{Profile, Session, User};
