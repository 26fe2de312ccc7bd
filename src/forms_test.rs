use super::*;

fn signup() -> SignupForm {
    SignupForm {
        name: "Ada".into(),
        email: "a@b.com".into(),
        password: "pw".into(),
        confirm_password: "pw".into(),
    }
}

#[test]
fn login_requires_both_fields() {
    let form = LoginForm { email: "a@b.com".into(), password: String::new() };
    assert_eq!(form.validate(), Err(FormError::MissingFields));
    let form = LoginForm { email: "   ".into(), password: "pw".into() };
    assert_eq!(form.validate(), Err(FormError::MissingFields));
}

#[test]
fn login_accepts_filled_form() {
    let form = LoginForm { email: "a@b.com".into(), password: "pw".into() };
    assert_eq!(form.validate(), Ok(()));
}

#[test]
fn signup_missing_name() {
    let form = SignupForm { name: String::new(), ..signup() };
    assert_eq!(form.validate().unwrap_err().to_string(), "Please fill in all fields");
}

#[test]
fn signup_mismatched_passwords() {
    let form = SignupForm { confirm_password: "other".into(), ..signup() };
    assert_eq!(form.validate(), Err(FormError::PasswordMismatch));
    assert_eq!(FormError::PasswordMismatch.to_string(), "Passwords don't match");
}

#[test]
fn signup_missing_fields_checked_before_mismatch() {
    let form = SignupForm { confirm_password: String::new(), ..signup() };
    assert_eq!(form.validate(), Err(FormError::MissingFields));
}

#[test]
fn signup_accepts_filled_form() {
    assert_eq!(signup().validate(), Ok(()));
}
