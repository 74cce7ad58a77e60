use super::{Field, FieldKind, FieldSet, ValidationError};
use crate::api::{ApiClient, ApiError, AuthResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

/// Email/password form, with a name field when signing up
#[derive(Debug, Clone, PartialEq)]
pub struct AuthForm {
    mode: AuthMode,
    fields: FieldSet,
}

/// Validated credentials ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Login {
        email: String,
        password: String,
    },
    Signup {
        name: String,
        email: String,
        password: String,
    },
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        let mut fields = Vec::with_capacity(3);
        if mode == AuthMode::Signup {
            fields.push(Field::new("Name", FieldKind::Text));
        }
        fields.push(Field::new("Email", FieldKind::Text));
        fields.push(Field::new("Password", FieldKind::Secret));

        Self {
            mode,
            fields: FieldSet::new(fields),
        }
    }

    pub fn login() -> Self {
        Self::new(AuthMode::Login)
    }

    pub fn signup() -> Self {
        Self::new(AuthMode::Signup)
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            AuthMode::Login => "Welcome Back",
            AuthMode::Signup => "Create an Account",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            AuthMode::Login => "Login",
            AuthMode::Signup => "Sign Up",
        }
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldSet {
        &mut self.fields
    }

    fn offset(&self) -> usize {
        match self.mode {
            AuthMode::Login => 0,
            AuthMode::Signup => 1,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        if self.mode == AuthMode::Signup {
            self.fields.set(0, name);
        }
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        let index = self.offset();
        self.fields.set(index, email);
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        let index = self.offset() + 1;
        self.fields.set(index, password);
    }

    /// Check that every field is filled and mark the form as submitting
    pub fn credentials(&mut self) -> Result<Credentials, ValidationError> {
        match self.collect() {
            Ok(credentials) => {
                self.fields.begin_submit();
                Ok(credentials)
            }
            Err(e) => {
                self.fields.fail(e.to_string());
                Err(e)
            }
        }
    }

    fn collect(&self) -> Result<Credentials, ValidationError> {
        let name = match self.mode {
            AuthMode::Signup => Some(self.fields.text(0)?),
            AuthMode::Login => None,
        };
        let offset = self.offset();
        let email = self.fields.text(offset)?;
        let password = self.fields.raw(offset + 1)?;

        Ok(match name {
            Some(name) => Credentials::Signup {
                name,
                email,
                password,
            },
            None => Credentials::Login { email, password },
        })
    }
}

impl Credentials {
    pub async fn send(&self, api: &ApiClient) -> Result<AuthResponse, ApiError> {
        match self {
            Credentials::Login { email, password } => api.login(email, password).await,
            Credentials::Signup {
                name,
                email,
                password,
            } => api.signup(name, email, password).await,
        }
    }
}
