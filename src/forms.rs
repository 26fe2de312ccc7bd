//! Login and signup form checks done before the store is called.
//!
//! The store never validates; the server is authoritative. These checks only
//! catch input that cannot possibly succeed.

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Passwords don't match")]
    PasswordMismatch,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// [`FormError::MissingFields`] if email or password is empty.
    pub fn validate(&self) -> Result<(), FormError> {
        if blank(&self.email) || self.password.is_empty() {
            return Err(FormError::MissingFields);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// # Errors
    ///
    /// [`FormError::MissingFields`] if any field is empty, otherwise
    /// [`FormError::PasswordMismatch`] if the two passwords differ.
    pub fn validate(&self) -> Result<(), FormError> {
        if blank(&self.name) || blank(&self.email) || self.password.is_empty() || self.confirm_password.is_empty() {
            return Err(FormError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(())
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
