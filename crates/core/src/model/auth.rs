use thiserror::Error;

/// Minimum password length accepted by the register form.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthFormError {
    #[error("email is required")]
    EmptyEmail,

    #[error("password is required")]
    EmptyPassword,

    #[error("password must be at least 6 characters")]
    PasswordTooShort,

    #[error("full name is required")]
    EmptyFullName,
}

/// Email/password pair submitted by the login form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Checks field requiredness. The email is trimmed; the password is not.
    ///
    /// # Errors
    ///
    /// Returns `AuthFormError` for a blank email or an empty password.
    pub fn validate(self) -> Result<Self, AuthFormError> {
        let email = self.email.trim().to_owned();
        if email.is_empty() {
            return Err(AuthFormError::EmptyEmail);
        }
        if self.password.is_empty() {
            return Err(AuthFormError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: self.password,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Fields submitted by the register form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub full_name: String,
    pub credentials: Credentials,
}

impl SignUpRequest {
    #[must_use]
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            credentials: Credentials::new(email, password),
        }
    }

    /// # Errors
    ///
    /// Returns `AuthFormError` for blank fields or a short password.
    pub fn validate(self) -> Result<Self, AuthFormError> {
        let full_name = self.full_name.trim().to_owned();
        if full_name.is_empty() {
            return Err(AuthFormError::EmptyFullName);
        }
        let credentials = self.credentials.validate()?;
        if credentials.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthFormError::PasswordTooShort);
        }
        Ok(Self {
            full_name,
            credentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_trim_email() {
        let creds = Credentials::new("  a@b.c ", "pw").validate().unwrap();
        assert_eq!(creds.email, "a@b.c");
    }

    #[test]
    fn credentials_require_both_fields() {
        assert_eq!(
            Credentials::new(" ", "pw").validate(),
            Err(AuthFormError::EmptyEmail)
        );
        assert_eq!(
            Credentials::new("a@b.c", "").validate(),
            Err(AuthFormError::EmptyPassword)
        );
    }

    #[test]
    fn sign_up_enforces_password_length() {
        let err = SignUpRequest::new("Rina", "a@b.c", "12345")
            .validate()
            .unwrap_err();
        assert_eq!(err, AuthFormError::PasswordTooShort);

        let ok = SignUpRequest::new(" Rina ", "a@b.c", "123456")
            .validate()
            .unwrap();
        assert_eq!(ok.full_name, "Rina");
    }

    #[test]
    fn credentials_debug_hides_password() {
        let debug = format!("{:?}", Credentials::new("a@b.c", "hunter22"));
        assert!(!debug.contains("hunter22"));
    }
}
