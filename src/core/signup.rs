use crate::core::draft_store::SIGN_UP_ROLE_KEY;
use crate::core::sequencer::compute_redirect;
use crate::core::validators::FieldErrors;
use crate::core::wizard::Navigation;
use crate::domain::model::{RegisterRequest, Role, SignUpInput};
use crate::domain::ports::{AuthApi, KeyValueStore};
use crate::domain::steps::{Route, SignUpDraft, SIGN_UP_STEPS};
use crate::utils::error::WizardError;
use regex::Regex;
use std::sync::LazyLock;

pub const REGISTERED_MESSAGE: &str = "Registration successful!";
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occured during registration. Please try again.";
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Something went wrong. Please check your internet connection and try again.";
const DUPLICATE_EMAIL_MESSAGE: &str = "An account with this email already exists.";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignUpField {
    FullName,
    Email,
    Password,
    ConfirmPassword,
    Country,
    StateRegion,
    City,
    TermsAgreed,
}

impl SignUpField {
    /// Backend field path -> form field. Closed table; unknown paths map to None.
    pub fn from_server_path(path: &str) -> Option<SignUpField> {
        match path {
            "fullName" => Some(SignUpField::FullName),
            "email" => Some(SignUpField::Email),
            "password" => Some(SignUpField::Password),
            "confirmPassword" => Some(SignUpField::ConfirmPassword),
            "location.country" => Some(SignUpField::Country),
            "location.stateRegion" => Some(SignUpField::StateRegion),
            "location.city" => Some(SignUpField::City),
            "termsAgreed" => Some(SignUpField::TermsAgreed),
            _ => None,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            SignUpField::FullName => "fullName",
            SignUpField::Email => "email",
            SignUpField::Password => "password",
            SignUpField::ConfirmPassword => "confirmPassword",
            SignUpField::Country => "location.country",
            SignUpField::StateRegion => "location.stateRegion",
            SignUpField::City => "location.city",
            SignUpField::TermsAgreed => "termsAgreed",
        }
    }
}

/// Form input that passed the sign-up schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSignUp(SignUpInput);

impl ValidatedSignUp {
    pub fn input(&self) -> &SignUpInput {
        &self.0
    }
}

pub fn validate_sign_up(input: &SignUpInput) -> Result<ValidatedSignUp, FieldErrors<SignUpField>> {
    let mut errors = FieldErrors::new();

    if input.full_name.trim().is_empty() {
        errors.insert(SignUpField::FullName, "Full Name is required");
    }

    let email = input.email.trim();
    if email.is_empty() {
        errors.insert(SignUpField::Email, "Email is required");
    } else if !EMAIL_PATTERN.is_match(email) {
        errors.insert(SignUpField::Email, "Invalid email address");
    }

    let password_len = input.password.chars().count();
    if password_len < 8 {
        errors.insert(SignUpField::Password, "Password must be at least 8 characters");
    } else if password_len > 128 {
        errors.insert(SignUpField::Password, "Password must be less than 128 characters");
    }

    if input.confirm_password.is_empty() {
        errors.insert(SignUpField::ConfirmPassword, "Please confirm your password");
    } else if input.confirm_password != input.password {
        errors.insert(SignUpField::ConfirmPassword, "Passwords do not match");
    }

    if !input.terms_agreed {
        errors.insert(
            SignUpField::TermsAgreed,
            "Please accept the Terms of Service before continuing",
        );
    }

    if errors.is_empty() {
        let mut cleaned = input.clone();
        cleaned.full_name = input.full_name.trim().to_string();
        cleaned.email = email.to_string();
        Ok(ValidatedSignUp(cleaned))
    } else {
        Err(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitFailure {
    /// Inline errors on specific form fields.
    Fields(FieldErrors<SignUpField>),
    /// 無法對應欄位的錯誤，以通知顯示
    Notice(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    Registered { message: String },
    Rejected(SubmitFailure),
    Redirect(Route),
}

/// Maps a failed registration call onto the form.
pub fn map_register_error(err: &WizardError) -> SubmitFailure {
    match err {
        WizardError::HttpStatusError { status: 400, body } => {
            let errors = map_field_errors(body);
            if errors.is_empty() {
                SubmitFailure::Notice(GENERIC_FAILURE_MESSAGE.to_string())
            } else {
                SubmitFailure::Fields(errors)
            }
        }
        WizardError::HttpStatusError { status: 409, body } => {
            let message = body
                .get("error")
                .and_then(first_message)
                .unwrap_or_else(|| DUPLICATE_EMAIL_MESSAGE.to_string());
            SubmitFailure::Fields(FieldErrors::single(SignUpField::Email, message))
        }
        e if e.is_network() => SubmitFailure::Notice(NETWORK_FAILURE_MESSAGE.to_string()),
        _ => SubmitFailure::Notice(GENERIC_FAILURE_MESSAGE.to_string()),
    }
}

/// `{"email": ["..."], "location": {"city": ["..."]}}` -> typed field errors.
pub fn map_field_errors(body: &serde_json::Value) -> FieldErrors<SignUpField> {
    let mut errors = FieldErrors::new();
    let Some(entries) = body.as_object() else {
        return errors;
    };

    for (key, value) in entries {
        match value.as_object() {
            Some(nested) => {
                for (sub_key, sub_value) in nested {
                    let path = format!("{}.{}", key, sub_key);
                    insert_server_error(&mut errors, &path, sub_value);
                }
            }
            None => insert_server_error(&mut errors, key, value),
        }
    }
    errors
}

fn insert_server_error(errors: &mut FieldErrors<SignUpField>, path: &str, value: &serde_json::Value) {
    match (SignUpField::from_server_path(path), first_message(value)) {
        (Some(field), Some(message)) => errors.insert(field, message),
        _ => tracing::debug!("Ignoring unmapped server error for '{}'", path),
    }
}

fn first_message(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => items.first().and_then(first_message),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// 註冊角色只在本次 session 有效，建立帳號時取用一次
#[derive(Debug, Clone)]
pub struct RoleSession<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> RoleSession<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn select(&self, role: Role) {
        if let Err(e) = self.storage.set(SIGN_UP_ROLE_KEY, role.as_str()) {
            tracing::warn!("⚠️ Failed to remember sign-up role: {}", e);
        }
    }

    pub fn current(&self) -> Option<Role> {
        match self.storage.get(SIGN_UP_ROLE_KEY) {
            Ok(Some(raw)) => raw.parse().ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("⚠️ Failed to read sign-up role: {}", e);
                None
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(SIGN_UP_ROLE_KEY) {
            tracing::warn!("⚠️ Failed to clear sign-up role: {}", e);
        }
    }
}

/// Two-step sign-up: pick a role, then submit the account form.
pub struct SignUpFlow<S: KeyValueStore, A: AuthApi> {
    session: RoleSession<S>,
    api: A,
}

impl<S: KeyValueStore, A: AuthApi> SignUpFlow<S, A> {
    pub fn new(session: RoleSession<S>, api: A) -> Self {
        Self { session, api }
    }

    pub fn session(&self) -> &RoleSession<S> {
        &self.session
    }

    pub fn choose_role(&self, role: Role) -> Navigation {
        self.session.select(role);
        Navigation::Push(Route::SignUpForm)
    }

    pub fn enter_form(&self) -> Navigation {
        let draft = SignUpDraft {
            role: self.session.current(),
        };
        match compute_redirect(&SIGN_UP_STEPS, 2, &draft) {
            Some(route) => Navigation::Replace(route),
            None => Navigation::Stay,
        }
    }

    pub async fn submit(&self, form: &ValidatedSignUp) -> SignUpOutcome {
        let Some(role) = self.session.current() else {
            return SignUpOutcome::Redirect(Route::SignUpRole);
        };

        let input = form.input();
        let request = RegisterRequest {
            full_name: input.full_name.clone(),
            email: input.email.clone(),
            password: input.password.clone(),
            confirm_password: input.confirm_password.clone(),
            location: input.location.clone().into(),
            terms_agreed: input.terms_agreed,
            default_role: role,
        };

        match self.api.register(&request).await {
            Ok(()) => {
                tracing::info!("✅ Registered {} as {}", request.email, role);
                self.session.clear();
                SignUpOutcome::Registered {
                    message: REGISTERED_MESSAGE.to_string(),
                }
            }
            Err(e) => {
                tracing::warn!("❌ Registration failed: {}", e);
                SignUpOutcome::Rejected(map_register_error(&e))
            }
        }
    }
}
