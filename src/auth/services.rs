use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{PreferencesInput, RegisterRequest},
        password::{hash_password, verify_password, MIN_PASSWORD_LEN},
        repo::UserRepo,
        repo_types::{NewUser, User, WebsitePreferences},
    },
    db::StoreError,
    errors::{AppError, AppResult, FieldError},
};

pub const MAX_DESCRIPTION_LEN: usize = 1000;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Applies client-supplied preference fields on top of `base`, recording a
/// field error for every value outside the enumerations.
pub(crate) fn merge_preferences(
    base: WebsitePreferences,
    input: &PreferencesInput,
    fields: (&'static str, &'static str),
    errors: &mut Vec<FieldError>,
) -> WebsitePreferences {
    let mut prefs = base;
    if let Some(theme) = input.theme.as_deref() {
        match theme.parse() {
            Ok(t) => prefs.theme = t,
            Err(()) => errors.push(FieldError::new(fields.0, "Invalid theme option")),
        }
    }
    if let Some(layout) = input.layout.as_deref() {
        match layout.parse() {
            Ok(l) => prefs.layout = l,
            Err(()) => errors.push(FieldError::new(fields.1, "Invalid layout option")),
        }
    }
    if let Some(scheme) = input.color_scheme.as_deref() {
        let scheme = scheme.trim();
        prefs.color_scheme = (!scheme.is_empty()).then(|| scheme.to_string());
    }
    prefs
}

/// Validated registration input.
#[derive(Debug)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub preferences: WebsitePreferences,
}

pub fn validate_registration(payload: RegisterRequest) -> AppResult<Registration> {
    let mut errors = Vec::new();

    let email = normalize_email(&payload.email);
    if !is_valid_email(&email) {
        errors.push(FieldError::new(
            "email",
            "Please provide a valid email address",
        ));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters long",
        ));
    }
    let preferences = match &payload.website_preferences {
        Some(input) => merge_preferences(
            WebsitePreferences::default(),
            input,
            ("websitePreferences.theme", "websitePreferences.layout"),
            &mut errors,
        ),
        None => WebsitePreferences::default(),
    };

    AppError::check(errors)?;
    Ok(Registration {
        email,
        password: payload.password,
        preferences,
    })
}

/// Hashes the password and stores the user. A taken email is reported even
/// when a concurrent registration wins the race.
pub async fn register_user(repo: &dyn UserRepo, reg: Registration) -> AppResult<User> {
    if repo.find_by_email(&reg.email).await?.is_some() {
        warn!(email = %reg.email, "email already registered");
        return Err(AppError::BadRequest("User already exists"));
    }

    let password_hash = hash_password(&reg.password)?;
    let new_user = NewUser {
        email: reg.email,
        password_hash,
        website_preferences: reg.preferences,
    };
    match repo.create(new_user).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "user registered");
            Ok(user)
        }
        Err(StoreError::Duplicate) => Err(AppError::BadRequest("User already exists")),
        Err(e) => Err(e.into()),
    }
}

/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn authenticate(repo: &dyn UserRepo, email: &str, password: &str) -> AppResult<User> {
    let email = normalize_email(email);

    let mut errors = Vec::new();
    if !is_valid_email(&email) {
        errors.push(FieldError::new(
            "email",
            "Please provide a valid email address",
        ));
    }
    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    AppError::check(errors)?;

    let Some(user) = repo.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::BadRequest("Invalid Credentials"));
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::BadRequest("Invalid Credentials"));
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}

pub async fn change_password(
    repo: &dyn UserRepo,
    user_id: Uuid,
    current: &str,
    new: &str,
) -> AppResult<()> {
    let mut errors = Vec::new();
    if current.is_empty() {
        errors.push(FieldError::new(
            "currentPassword",
            "Current password is required",
        ));
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "newPassword",
            "New password must be at least 6 characters long",
        ));
    }
    AppError::check(errors)?;

    let user = repo
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;

    if !verify_password(current, &user.password_hash)? {
        warn!(user_id = %user_id, "change password with wrong current password");
        return Err(AppError::BadRequest("Current password is incorrect"));
    }

    let hash = hash_password(new)?;
    repo.update_password_hash(user_id, &hash)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;
    info!(user_id = %user_id, "password changed");
    Ok(())
}

pub fn validate_description(description: Option<String>) -> AppResult<String> {
    let Some(description) = description else {
        return Err(AppError::Validation(vec![FieldError::new(
            "description",
            "Description is required",
        )]));
    };
    let description = description.trim().to_string();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(AppError::Validation(vec![FieldError::new(
            "description",
            "Description must be at most 1000 characters",
        )]));
    }
    Ok(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::{Layout, Theme};
    use crate::testing::MemoryUserRepo;

    fn registration(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: password.into(),
            website_preferences: None,
        }
    }

    #[test]
    fn email_regex_accepts_common_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.io"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[test]
    fn registration_normalizes_email() {
        let reg = validate_registration(registration("  Mixed@Example.COM ", "secret1")).unwrap();
        assert_eq!(reg.email, "mixed@example.com");
        assert_eq!(reg.preferences, WebsitePreferences::default());
    }

    #[test]
    fn registration_reports_every_bad_field() {
        let payload = RegisterRequest {
            email: "nope".into(),
            password: "123".into(),
            website_preferences: Some(PreferencesInput {
                theme: Some("neon".into()),
                layout: Some("grid".into()),
                color_scheme: None,
            }),
        };
        let Err(AppError::Validation(errors)) = validate_registration(payload) else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_ref()).collect();
        assert_eq!(
            fields,
            vec![
                "email",
                "password",
                "websitePreferences.theme",
                "websitePreferences.layout"
            ]
        );
    }

    #[test]
    fn merge_only_overwrites_supplied_fields() {
        let base = WebsitePreferences {
            theme: Theme::Dark,
            layout: Layout::MultiColumn,
            color_scheme: Some("Blue".into()),
        };
        let mut errors = Vec::new();
        let merged = merge_preferences(
            base,
            &PreferencesInput {
                theme: Some("custom".into()),
                ..Default::default()
            },
            ("theme", "layout"),
            &mut errors,
        );
        assert!(errors.is_empty());
        assert_eq!(merged.theme, Theme::Custom);
        assert_eq!(merged.layout, Layout::MultiColumn);
        assert_eq!(merged.color_scheme.as_deref(), Some("Blue"));
    }

    #[tokio::test]
    async fn duplicate_registration_fails_and_hash_differs_from_plaintext() {
        let repo = MemoryUserRepo::default();
        let reg = validate_registration(registration("dup@example.com", "secret1")).unwrap();
        let user = register_user(&repo, reg).await.expect("first registration");
        assert_ne!(user.password_hash, "secret1");

        let again = validate_registration(registration("DUP@example.com", "other-pass")).unwrap();
        let err = register_user(&repo, again).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest("User already exists")));
    }

    #[tokio::test]
    async fn authenticate_does_not_leak_account_existence() {
        let repo = MemoryUserRepo::default();
        let reg = validate_registration(registration("known@example.com", "secret1")).unwrap();
        register_user(&repo, reg).await.unwrap();

        let unknown = authenticate(&repo, "ghost@example.com", "secret1")
            .await
            .unwrap_err();
        let wrong = authenticate(&repo, "known@example.com", "wrong-pass")
            .await
            .unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert!(matches!(wrong, AppError::BadRequest("Invalid Credentials")));

        let ok = authenticate(&repo, " Known@Example.com", "secret1").await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn change_password_requires_current_password() {
        let repo = MemoryUserRepo::default();
        let reg = validate_registration(registration("pw@example.com", "secret1")).unwrap();
        let user = register_user(&repo, reg).await.unwrap();

        let err = change_password(&repo, user.id, "not-it", "newsecret")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        change_password(&repo, user.id, "secret1", "newsecret")
            .await
            .expect("change password");
        assert!(authenticate(&repo, "pw@example.com", "newsecret").await.is_ok());
        assert!(authenticate(&repo, "pw@example.com", "secret1").await.is_err());
    }

    #[tokio::test]
    async fn change_password_for_missing_user_is_not_found() {
        let repo = MemoryUserRepo::default();
        let err = change_password(&repo, Uuid::new_v4(), "secret1", "newsecret")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn description_is_required_and_bounded() {
        assert!(validate_description(None).is_err());
        assert_eq!(validate_description(Some("  hi ".into())).unwrap(), "hi");
        assert!(validate_description(Some("x".repeat(MAX_DESCRIPTION_LEN + 1))).is_err());
    }
}
