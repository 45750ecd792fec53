use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use coddy_core::model::{
    ChatAnswer, ChatQuestion, Course, CourseId, LearningPath, LearningPathId, LevelId, Profile,
    Session, User, UserId,
};
use serde_json::Value;

use crate::error::BackendError;
use crate::gateway::{AuthGateway, FunctionGateway, ProfileTable, RpcGateway, SignUpOutcome};

/// Gateway operations that can be made to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    SignUp,
    SignIn,
    SignOut,
    GetUser,
    DeleteUser,
    GetProfile,
    InsertProfile,
    Rpc,
    Function,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureMode {
    Once,
    Always,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPath {
    pub id: LearningPathId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogCourse {
    pub id: CourseId,
    pub path_id: LearningPathId,
    pub name: String,
    pub level_id: LevelId,
    pub level_name: String,
    pub hours: f64,
}

struct Account {
    user: User,
    password: String,
    confirmed: bool,
}

#[derive(Default)]
struct ProjectState {
    accounts: Vec<Account>,
    current: Option<Session>,
    profiles: HashMap<UserId, Profile>,
    paths: Vec<CatalogPath>,
    courses: Vec<CatalogCourse>,
    graduated: HashSet<(UserId, CourseId)>,
    failures: HashMap<Operation, (FailureMode, String)>,
    require_confirmation: bool,
    answers: VecDeque<String>,
    calls: Vec<String>,
    token_seq: u64,
}

/// In-memory stand-in for the hosted project: auth accounts, the `profiles`
/// table, the three progress procedures and the `coddy-chat` function.
///
/// Clones share state, so a test can keep a handle while services own another.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<ProjectState>>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A project with two learning paths and leveled courses, used by the
    /// offline demo and tests.
    #[must_use]
    pub fn seeded() -> Self {
        let backend = Self::new();
        let web = LearningPathId::new(1);
        let back_end = LearningPathId::new(2);
        backend.add_path(web, "Front-End Developer");
        backend.add_path(back_end, "Back-End Developer");

        let rows: [(u64, LearningPathId, &str, u32, &str, f64); 8] = [
            (101, web, "Belajar Dasar Pemrograman Web", 1, "Dasar", 46.0),
            (102, web, "Belajar Fundamental Front-End Web", 2, "Pemula", 46.0),
            (103, web, "Belajar Dasar Git dengan GitHub", 1, "Dasar", 12.0),
            (104, web, "Menjadi Front-End Web Developer Expert", 3, "Menengah", 90.0),
            (201, back_end, "Belajar Dasar Pemrograman JavaScript", 1, "Dasar", 46.0),
            (202, back_end, "Belajar Back-End Pemula dengan JavaScript", 2, "Pemula", 45.0),
            (203, back_end, "Belajar Fundamental Aplikasi Back-End", 3, "Menengah", 140.0),
            (204, back_end, "Belajar Dasar Cloud dan Gen AI di AWS", 1, "Dasar", 18.0),
        ];
        for (id, path_id, name, level_id, level_name, hours) in rows {
            backend.add_course(CatalogCourse {
                id: CourseId::new(id),
                path_id,
                name: name.to_owned(),
                level_id: LevelId::new(level_id),
                level_name: level_name.to_owned(),
                hours,
            });
        }
        backend
    }

    pub fn add_path(&self, id: LearningPathId, name: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.paths.push(CatalogPath {
                id,
                name: name.into(),
            });
        }
    }

    pub fn add_course(&self, course: CatalogCourse) {
        if let Ok(mut state) = self.state.lock() {
            state.courses.push(course);
        }
    }

    /// Create a confirmed account directly, bypassing sign-up.
    #[must_use]
    pub fn register(&self, email: &str, password: &str) -> UserId {
        let user = User::new(UserId::random(), email);
        let id = user.id;
        if let Ok(mut state) = self.state.lock() {
            state.accounts.push(Account {
                user,
                password: password.to_owned(),
                confirmed: true,
            });
        }
        id
    }

    pub fn put_profile(&self, profile: Profile) {
        if let Ok(mut state) = self.state.lock() {
            state.profiles.insert(profile.id, profile);
        }
    }

    /// When set, sign-up creates unconfirmed accounts and returns no session.
    pub fn set_require_email_confirmation(&self, required: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.require_confirmation = required;
        }
    }

    pub fn confirm_email(&self, email: &str) {
        if let Ok(mut state) = self.state.lock() {
            for account in &mut state.accounts {
                if account.user.email() == Some(email) {
                    account.confirmed = true;
                }
            }
        }
    }

    /// Queue the next answer of the chat function.
    pub fn push_answer(&self, answer: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.answers.push_back(answer.into());
        }
    }

    pub fn fail(&self, operation: Operation, mode: FailureMode, message: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.insert(operation, (mode, message.into()));
        }
    }

    /// Labels of every remote call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }

    pub fn clear_calls(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.calls.clear();
        }
    }

    #[must_use]
    pub fn has_account(&self, email: &str) -> bool {
        self.state
            .lock()
            .map(|state| state.accounts.iter().any(|a| a.user.email() == Some(email)))
            .unwrap_or(false)
    }

    #[must_use]
    pub fn profile(&self, user_id: UserId) -> Option<Profile> {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.profiles.get(&user_id).cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ProjectState>, BackendError> {
        self.state.lock().map_err(|e| BackendError::Api {
            status: 500,
            code: None,
            message: e.to_string(),
        })
    }

    /// Record the call and apply any injected failure.
    fn enter(
        &self,
        operation: Operation,
        label: &str,
    ) -> Result<MutexGuard<'_, ProjectState>, BackendError> {
        let mut state = self.lock()?;
        state.calls.push(label.to_owned());
        let injected = match state.failures.get(&operation) {
            Some((FailureMode::Once, message)) => {
                let message = message.clone();
                state.failures.remove(&operation);
                Some(message)
            }
            Some((FailureMode::Always, message)) => Some(message.clone()),
            None => None,
        };
        match injected {
            Some(message) => Err(injected_error(operation, label, message)),
            None => Ok(state),
        }
    }
}

fn injected_error(operation: Operation, label: &str, message: String) -> BackendError {
    match operation {
        Operation::SignUp
        | Operation::SignIn
        | Operation::SignOut
        | Operation::GetUser
        | Operation::DeleteUser => BackendError::Auth {
            status: Some(500),
            message,
        },
        Operation::GetProfile | Operation::InsertProfile | Operation::Rpc => BackendError::Api {
            status: 500,
            code: None,
            message,
        },
        Operation::Function => BackendError::Function {
            name: label.trim_start_matches("functions.").to_owned(),
            status: 500,
            message,
        },
    }
}

fn auth_error(status: u16, message: &str) -> BackendError {
    BackendError::Auth {
        status: Some(status),
        message: message.to_owned(),
    }
}

fn api_error(status: u16, code: &str, message: String) -> BackendError {
    BackendError::Api {
        status,
        code: Some(code.to_owned()),
        message,
    }
}

fn issue_session(state: &mut ProjectState, user: &User) -> Session {
    state.token_seq += 1;
    let session = Session {
        access_token: format!("memory-access-{}", state.token_seq),
        refresh_token: Some(format!("memory-refresh-{}", state.token_seq)),
        user: user.clone(),
    };
    state.current = Some(session.clone());
    session
}

impl ProjectState {
    fn current_user_id(&self) -> Option<UserId> {
        self.current.as_ref().map(|s| s.user.id)
    }

    #[allow(clippy::cast_precision_loss)]
    fn learning_paths(&self) -> Vec<LearningPath> {
        let user = self.current_user_id();
        self.paths
            .iter()
            .map(|path| {
                let courses: Vec<_> = self
                    .courses
                    .iter()
                    .filter(|c| c.path_id == path.id)
                    .collect();
                let done = courses
                    .iter()
                    .filter(|c| user.is_some_and(|u| self.graduated.contains(&(u, c.id))))
                    .count();
                let total = courses.len();
                let progress = if total == 0 {
                    0.0
                } else {
                    done as f64 / total as f64 * 100.0
                };
                LearningPath::new(
                    path.id,
                    path.name.clone(),
                    u32::try_from(total).unwrap_or(u32::MAX),
                    courses.iter().map(|c| c.hours).sum(),
                    progress,
                )
            })
            .collect()
    }

    fn courses_of(&self, path_id: LearningPathId) -> Vec<Course> {
        let user = self.current_user_id();
        self.courses
            .iter()
            .filter(|c| c.path_id == path_id)
            .map(|c| Course {
                course_id: c.id,
                course_name: c.name.clone(),
                level_id: c.level_id,
                level_name: c.level_name.clone(),
                hours_to_study: c.hours,
                is_graduated: user.is_some_and(|u| self.graduated.contains(&(u, c.id))),
            })
            .collect()
    }
}

#[async_trait]
impl AuthGateway for InMemoryBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, BackendError> {
        let mut state = self.enter(Operation::SignUp, "auth.sign_up")?;
        if password.chars().count() < 6 {
            return Err(auth_error(422, "Password should be at least 6 characters."));
        }
        if state.accounts.iter().any(|a| a.user.email() == Some(email)) {
            return Err(auth_error(422, "User already registered"));
        }
        let user = User::new(UserId::random(), email);
        let confirmed = !state.require_confirmation;
        state.accounts.push(Account {
            user: user.clone(),
            password: password.to_owned(),
            confirmed,
        });
        let session = confirmed.then(|| issue_session(&mut state, &user));
        Ok(SignUpOutcome {
            user: Some(user),
            session,
        })
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let mut state = self.enter(Operation::SignIn, "auth.sign_in_with_password")?;
        let (user, confirmed) = state
            .accounts
            .iter()
            .find(|a| a.user.email() == Some(email) && a.password == password)
            .map(|a| (a.user.clone(), a.confirmed))
            .ok_or_else(|| auth_error(400, "Invalid login credentials"))?;
        if !confirmed {
            return Err(auth_error(400, "Email not confirmed"));
        }
        Ok(issue_session(&mut state, &user))
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let mut state = self.enter(Operation::SignOut, "auth.sign_out")?;
        state.current = None;
        Ok(())
    }

    async fn get_user(&self) -> Result<Option<User>, BackendError> {
        let state = self.enter(Operation::GetUser, "auth.get_user")?;
        Ok(state.current.as_ref().map(|s| s.user.clone()))
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), BackendError> {
        let mut state = self.enter(Operation::DeleteUser, "auth.admin.delete_user")?;
        let before = state.accounts.len();
        state.accounts.retain(|a| a.user.id != user_id);
        if state.accounts.len() == before {
            return Err(auth_error(404, "User not found"));
        }
        state.profiles.remove(&user_id);
        state.graduated.retain(|(u, _)| *u != user_id);
        if state.current_user_id() == Some(user_id) {
            state.current = None;
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileTable for InMemoryBackend {
    async fn get_profile(&self, user_id: UserId) -> Result<Profile, BackendError> {
        let state = self.enter(Operation::GetProfile, "profiles.select")?;
        state
            .profiles
            .get(&user_id)
            .cloned()
            .ok_or(BackendError::NoRows)
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), BackendError> {
        let mut state = self.enter(Operation::InsertProfile, "profiles.insert")?;
        if state.profiles.contains_key(&profile.id) {
            return Err(api_error(
                409,
                "23505",
                "duplicate key value violates unique constraint \"profiles_pkey\"".into(),
            ));
        }
        state.profiles.insert(profile.id, profile.clone());
        Ok(())
    }
}

#[async_trait]
impl RpcGateway for InMemoryBackend {
    async fn call(&self, name: &str, params: Value) -> Result<Value, BackendError> {
        let mut state = self.enter(Operation::Rpc, &format!("rpc.{name}"))?;
        match name {
            "get_learning_paths_with_progress" => Ok(serde_json::to_value(state.learning_paths())?),
            "get_courses_by_learning_path" => {
                let path_id = params
                    .get("p_learning_path_id")
                    .and_then(Value::as_u64)
                    .map(LearningPathId::new)
                    .ok_or_else(|| missing_param(name, "p_learning_path_id"))?;
                Ok(serde_json::to_value(state.courses_of(path_id))?)
            }
            "set_course_progress" => {
                let course_id = params
                    .get("p_course_id")
                    .and_then(Value::as_u64)
                    .map(CourseId::new)
                    .ok_or_else(|| missing_param(name, "p_course_id"))?;
                let is_graduated = params
                    .get("p_is_graduated")
                    .and_then(Value::as_bool)
                    .ok_or_else(|| missing_param(name, "p_is_graduated"))?;
                let user = state
                    .current_user_id()
                    .ok_or(BackendError::NotAuthenticated)?;
                if !state.courses.iter().any(|c| c.id == course_id) {
                    return Err(api_error(400, "P0002", format!("course {course_id} not found")));
                }
                if is_graduated {
                    state.graduated.insert((user, course_id));
                } else {
                    state.graduated.remove(&(user, course_id));
                }
                Ok(Value::Null)
            }
            _ => Err(api_error(
                404,
                "PGRST202",
                format!("Could not find the function public.{name} in the schema cache"),
            )),
        }
    }
}

fn missing_param(procedure: &str, param: &str) -> BackendError {
    api_error(
        400,
        "PGRST202",
        format!("Could not find the function public.{procedure} without parameter {param}"),
    )
}

#[async_trait]
impl FunctionGateway for InMemoryBackend {
    async fn invoke(&self, name: &str, body: Value) -> Result<Value, BackendError> {
        let mut state = self.enter(Operation::Function, &format!("functions.{name}"))?;
        if name != "coddy-chat" {
            return Err(BackendError::Function {
                name: name.to_owned(),
                status: 404,
                message: "Function not found".into(),
            });
        }
        let question: ChatQuestion =
            serde_json::from_value(body).map_err(|_| BackendError::Function {
                name: name.to_owned(),
                status: 400,
                message: "question is required".into(),
            })?;
        let answer = state.answers.pop_front().unwrap_or_else(|| {
            format!(
                "Coddy sedang offline. Pertanyaanmu sudah kucatat: _{}_",
                question.question.trim()
            )
        });
        Ok(serde_json::to_value(ChatAnswer { answer })?)
    }
}
