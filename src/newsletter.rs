//! Newsletter Form
//!
//! Client-side email check with a short-lived success or error state.

use std::sync::LazyLock;

use regex::Regex;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement};

use crate::config::NewsletterConfig;
use crate::dom::{self, Listeners, TimerSlot};
use crate::error::UiResult;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

const INVALID_BORDER: &str = "#e74c3c";
const RESTING_BORDER: &str = "#ddd";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Subscribed(String),
    Rejected,
}

/// What the email field shows after a submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldFeedback {
    /// Border color until the revert delay passes
    pub border_color: Option<&'static str>,
    /// Whether the typed value is cleared once the revert delay passes
    pub clear_value: bool,
}

impl Submission {
    pub fn field_feedback(&self) -> FieldFeedback {
        match self {
            Submission::Subscribed(_) => FieldFeedback {
                border_color: None,
                clear_value: true,
            },
            Submission::Rejected => FieldFeedback {
                border_color: Some(INVALID_BORDER),
                clear_value: false,
            },
        }
    }
}

pub fn submit(raw: &str) -> Submission {
    let email = raw.trim();
    if !email.is_empty() && is_valid_email(email) {
        Submission::Subscribed(email.to_string())
    } else {
        Submission::Rejected
    }
}

pub struct NewsletterBinding {
    _listeners: Listeners,
}

impl NewsletterBinding {
    pub fn attach(config: NewsletterConfig) -> UiResult<Option<Self>> {
        let doc = dom::document()?;
        let Some(form) = dom::query(&doc, ".newsletter-form") else {
            return Ok(None);
        };
        let Some(input) = dom::query_in(&form, r#"input[type="email"]"#)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            log::debug!("[NEWSLETTER] form has no email field");
            return Ok(None);
        };
        let button: Option<Element> = dom::query_in(&form, "button");
        let original_label = button.as_ref().map(dom::text).unwrap_or_default();
        let button_revert = TimerSlot::default();
        let border_revert = TimerSlot::default();
        let revert_ms = config.revert_ms;

        let mut listeners = Listeners::default();
        listeners.on(&form, "submit", move |ev| {
            ev.prevent_default();
            let submission = submit(&input.value());
            let feedback = submission.field_feedback();
            match submission {
                Submission::Subscribed(email) => {
                    log::info!("[NEWSLETTER] subscribed {email}");
                    let Some(button) = button.clone() else {
                        if feedback.clear_value {
                            input.set_value("");
                        }
                        return;
                    };
                    button.set_text_content(Some("SUBSCRIBED!"));
                    dom::set_style(&button, "background", "#27ae60");
                    let input = input.clone();
                    let label = original_label.clone();
                    button_revert.schedule(revert_ms, move || {
                        button.set_text_content(Some(&label));
                        dom::set_style(&button, "background", "#e74c3c");
                        if feedback.clear_value {
                            input.set_value("");
                        }
                    });
                }
                Submission::Rejected => {
                    log::warn!("[NEWSLETTER] invalid email {:?}", input.value());
                    if let Some(color) = feedback.border_color {
                        dom::set_style(&input, "border-color", color);
                    }
                    let input = input.clone();
                    border_revert.schedule(revert_ms, move || {
                        dom::set_style(&input, "border-color", RESTING_BORDER);
                    });
                }
            }
        })?;
        Ok(Some(Self { _listeners: listeners }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("driver@example.com"));
        assert!(is_valid_email("a.b+c@shop.co.uk"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("no@dot"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spa ce@example.com"));
    }

    #[test]
    fn test_submit_trims_and_rejects() {
        assert_eq!(
            submit("  driver@example.com "),
            Submission::Subscribed("driver@example.com".to_string())
        );
        assert_eq!(submit("not-an-email"), Submission::Rejected);
        assert_eq!(submit("   "), Submission::Rejected);
    }

    #[test]
    fn test_rejected_email_turns_border_red_and_keeps_value() {
        let feedback = submit("not-an-email").field_feedback();
        assert_eq!(
            feedback,
            FieldFeedback {
                border_color: Some("#e74c3c"),
                clear_value: false,
            }
        );
    }

    #[test]
    fn test_subscription_clears_field_without_error_border() {
        let feedback = submit("driver@example.com").field_feedback();
        assert_eq!(feedback.border_color, None);
        assert!(feedback.clear_value);
    }
}
