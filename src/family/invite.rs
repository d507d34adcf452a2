//! Invitation wizard: collect a contact method, the member's details and a
//! confirmation code, then hand a confirmed invitation back to the roster.
//!
//! The flow is a small state machine. `Method` picks the channel, `Contact`
//! collects the details and, once a code has been dispatched, the code entry.
//! Completion and cancellation are terminal and each fires at most once.

use thiserror::Error;

use super::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactMethod {
    Email,
    Phone,
}

impl ContactMethod {
    pub fn label(&self) -> &'static str {
        match self {
            ContactMethod::Email => "email",
            ContactMethod::Phone => "phone",
        }
    }

    /// Where the user should look for the code.
    pub fn inbox_hint(&self) -> &'static str {
        match self {
            ContactMethod::Email => "inbox",
            ContactMethod::Phone => "messages",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    Spouse,
    Child,
    Parent,
    Sibling,
    Grandparent,
    Other,
}

impl Relationship {
    pub const ALL: [Relationship; 6] = [
        Relationship::Spouse,
        Relationship::Child,
        Relationship::Parent,
        Relationship::Sibling,
        Relationship::Grandparent,
        Relationship::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Relationship::Spouse => "Spouse",
            Relationship::Child => "Child",
            Relationship::Parent => "Parent",
            Relationship::Sibling => "Sibling",
            Relationship::Grandparent => "Grandparent",
            Relationship::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteStep {
    Method,
    Contact,
}

/// What the wizard reports back to its parent.
#[derive(Debug, Clone, PartialEq)]
pub enum InviteEvent {
    /// A confirmation code went out to the given contact.
    CodeDispatched {
        contact: String,
        method: ContactMethod,
    },
    /// The invitation is confirmed; fired at most once per wizard.
    Completed {
        contact: String,
        method: ContactMethod,
        name: String,
        relationship: Relationship,
    },
    /// The wizard was dismissed; fired at most once per wizard.
    Cancelled,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InviteError {
    #[error("fill in the {0} field")]
    Missing(&'static str),
    #[error("enter a valid {}", .0.label())]
    BadContact(ContactMethod),
    #[error("the confirmation code is 6 digits")]
    BadCode,
    #[error("wrong code, check it and try again")]
    WrongCode,
    #[error("this invitation is already settled")]
    Finished,
}

/// Source of the expected confirmation code. The demo issuer hands out a
/// fixed value; a real one would mint a server-side, expiring code here.
pub trait CodeIssuer {
    fn issue(&mut self, contact: &str, method: ContactMethod) -> String;
}

pub const DEMO_CODE: &str = "123456";

pub struct DemoCodeIssuer;

impl CodeIssuer for DemoCodeIssuer {
    fn issue(&mut self, _contact: &str, _method: ContactMethod) -> String {
        DEMO_CODE.to_string()
    }
}

pub struct InvitationFlow {
    pub step: InviteStep,
    /// Stays `None` until the user picks a channel, so continuing without a
    /// selection is a real validation error.
    pub method: Option<ContactMethod>,
    pub contact: String,
    pub member_name: String,
    pub relationship: Option<Relationship>,
    pub code_sent: bool,
    pub code_input: String,
    expected_code: Option<String>,
    completed: bool,
    cancelled: bool,
}

impl Default for InvitationFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl InvitationFlow {
    pub fn new() -> Self {
        Self {
            step: InviteStep::Method,
            method: None,
            contact: String::new(),
            member_name: String::new(),
            relationship: None,
            code_sent: false,
            code_input: String::new(),
            expected_code: None,
            completed: false,
            cancelled: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.completed || self.cancelled
    }

    pub fn select_method(&mut self, method: ContactMethod) {
        self.method = Some(method);
    }

    /// `Method` -> `Contact`. Requires an explicit channel selection.
    pub fn next_from_method(&mut self) -> Result<(), InviteError> {
        if self.method.is_none() {
            return Err(InviteError::Missing("invitation method"));
        }
        self.step = InviteStep::Contact;
        Ok(())
    }

    /// `Contact` -> `Method`, only while no code is outstanding. The contact
    /// value is cleared because its format rules follow the method; name and
    /// relationship survive.
    pub fn back_to_method(&mut self) {
        if self.step == InviteStep::Contact && !self.code_sent {
            self.contact.clear();
            self.step = InviteStep::Method;
        }
    }

    /// Validates the draft and dispatches a confirmation code. On success the
    /// code-entry sub-step opens; the typed code (if any) is left untouched.
    pub fn send_code(&mut self, issuer: &mut dyn CodeIssuer) -> Result<InviteEvent, InviteError> {
        if self.is_finished() {
            return Err(InviteError::Finished);
        }
        let method = self.method.ok_or(InviteError::Missing("invitation method"))?;
        if self.member_name.trim().is_empty() {
            return Err(InviteError::Missing("name"));
        }
        if self.contact.trim().is_empty() {
            return Err(InviteError::Missing(match method {
                ContactMethod::Email => "email address",
                ContactMethod::Phone => "phone number",
            }));
        }
        if self.relationship.is_none() {
            return Err(InviteError::Missing("relationship"));
        }

        let ok = match method {
            ContactMethod::Email => validate::is_valid_email(&self.contact),
            ContactMethod::Phone => validate::is_valid_phone(&self.contact),
        };
        if !ok {
            return Err(InviteError::BadContact(method));
        }

        self.expected_code = Some(issuer.issue(&self.contact, method));
        self.code_sent = true;
        Ok(InviteEvent::CodeDispatched {
            contact: self.contact.clone(),
            method,
        })
    }

    /// Withdraws the outstanding code and reopens the form. All other fields
    /// are kept.
    pub fn resend(&mut self) {
        self.code_sent = false;
        self.expected_code = None;
    }

    pub fn push_code_digit(&mut self, c: char) {
        if c.is_ascii_digit() && self.code_input.len() < 6 {
            self.code_input.push(c);
        }
    }

    pub fn pop_code_digit(&mut self) {
        self.code_input.pop();
    }

    /// Checks the typed code against the issued one. A match completes the
    /// wizard; a mismatch leaves it in place for another try.
    pub fn verify(&mut self) -> Result<InviteEvent, InviteError> {
        if self.is_finished() {
            return Err(InviteError::Finished);
        }
        if self.code_input.len() != 6 || !self.code_input.chars().all(|c| c.is_ascii_digit()) {
            return Err(InviteError::BadCode);
        }
        let matches = self.code_sent && self.expected_code.as_deref() == Some(self.code_input.as_str());
        if !matches {
            return Err(InviteError::WrongCode);
        }

        let method = self.method.ok_or(InviteError::Missing("invitation method"))?;
        let relationship = self.relationship.ok_or(InviteError::Missing("relationship"))?;
        self.completed = true;
        Ok(InviteEvent::Completed {
            contact: self.contact.clone(),
            method,
            name: self.member_name.clone(),
            relationship,
        })
    }

    /// Dismisses the wizard. Only available before a code goes out; once one
    /// is outstanding the UI routes Esc through `resend` instead.
    pub fn cancel(&mut self) -> Option<InviteEvent> {
        if self.is_finished() || self.code_sent {
            return None;
        }
        self.cancelled = true;
        Some(InviteEvent::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_email_flow() -> InvitationFlow {
        let mut flow = InvitationFlow::new();
        flow.select_method(ContactMethod::Email);
        flow.next_from_method().unwrap();
        flow.contact = "maria@example.com".to_string();
        flow.member_name = "Мария Петрова".to_string();
        flow.relationship = Some(Relationship::Spouse);
        flow
    }

    #[test]
    fn continue_without_method_is_an_error() {
        let mut flow = InvitationFlow::new();
        assert_eq!(
            flow.next_from_method(),
            Err(InviteError::Missing("invitation method"))
        );
        assert_eq!(flow.step, InviteStep::Method);

        flow.select_method(ContactMethod::Phone);
        flow.next_from_method().unwrap();
        assert_eq!(flow.step, InviteStep::Contact);
    }

    #[test]
    fn send_code_happy_path_dispatches_once() {
        let mut flow = filled_email_flow();
        flow.code_input = "999".to_string();

        let event = flow.send_code(&mut DemoCodeIssuer).unwrap();
        assert_eq!(
            event,
            InviteEvent::CodeDispatched {
                contact: "maria@example.com".to_string(),
                method: ContactMethod::Email,
            }
        );
        assert!(flow.code_sent);
        // the typed code is not touched by dispatching
        assert_eq!(flow.code_input, "999");
    }

    #[test]
    fn send_code_reports_first_missing_field() {
        let mut flow = InvitationFlow::new();
        flow.select_method(ContactMethod::Email);
        flow.next_from_method().unwrap();

        assert_eq!(
            flow.send_code(&mut DemoCodeIssuer),
            Err(InviteError::Missing("name"))
        );
        flow.member_name = "Anna Lee".to_string();
        assert_eq!(
            flow.send_code(&mut DemoCodeIssuer),
            Err(InviteError::Missing("email address"))
        );
        flow.contact = "anna@example.com".to_string();
        assert_eq!(
            flow.send_code(&mut DemoCodeIssuer),
            Err(InviteError::Missing("relationship"))
        );
        assert!(!flow.code_sent);
    }

    #[test]
    fn malformed_contact_blocks_dispatch() {
        let mut flow = InvitationFlow::new();
        flow.select_method(ContactMethod::Phone);
        flow.next_from_method().unwrap();
        flow.member_name = "Ivan Ivanov".to_string();
        flow.contact = "123".to_string();
        flow.relationship = Some(Relationship::Child);

        assert_eq!(
            flow.send_code(&mut DemoCodeIssuer),
            Err(InviteError::BadContact(ContactMethod::Phone))
        );
        assert!(!flow.code_sent);
    }

    #[test]
    fn verify_with_issued_code_completes_exactly_once() {
        let mut flow = filled_email_flow();
        flow.send_code(&mut DemoCodeIssuer).unwrap();
        flow.code_input = DEMO_CODE.to_string();

        let event = flow.verify().unwrap();
        assert_eq!(
            event,
            InviteEvent::Completed {
                contact: "maria@example.com".to_string(),
                method: ContactMethod::Email,
                name: "Мария Петрова".to_string(),
                relationship: Relationship::Spouse,
            }
        );
        assert!(flow.is_finished());

        // a second submit cannot fire the event again
        assert_eq!(flow.verify(), Err(InviteError::Finished));
    }

    #[test]
    fn verify_rejects_short_and_wrong_codes() {
        let mut flow = filled_email_flow();
        flow.send_code(&mut DemoCodeIssuer).unwrap();

        flow.code_input = "123".to_string();
        assert_eq!(flow.verify(), Err(InviteError::BadCode));

        flow.code_input = "654321".to_string();
        assert_eq!(flow.verify(), Err(InviteError::WrongCode));
        assert!(!flow.is_finished());

        // retry is unlimited
        flow.code_input = DEMO_CODE.to_string();
        assert!(flow.verify().is_ok());
    }

    #[test]
    fn verify_without_dispatch_never_completes() {
        let mut flow = filled_email_flow();
        flow.code_input = DEMO_CODE.to_string();
        assert_eq!(flow.verify(), Err(InviteError::WrongCode));
    }

    #[test]
    fn resend_reopens_code_entry_without_losing_fields() {
        let mut flow = filled_email_flow();
        flow.send_code(&mut DemoCodeIssuer).unwrap();
        flow.resend();

        assert!(!flow.code_sent);
        assert_eq!(flow.contact, "maria@example.com");
        assert_eq!(flow.member_name, "Мария Петрова");
        assert_eq!(flow.relationship, Some(Relationship::Spouse));

        // the withdrawn code no longer verifies
        flow.code_input = DEMO_CODE.to_string();
        assert_eq!(flow.verify(), Err(InviteError::WrongCode));
    }

    #[test]
    fn cancel_fires_once_and_only_before_dispatch() {
        let mut flow = InvitationFlow::new();
        assert_eq!(flow.cancel(), Some(InviteEvent::Cancelled));
        assert_eq!(flow.cancel(), None);

        let mut sent = filled_email_flow();
        sent.send_code(&mut DemoCodeIssuer).unwrap();
        assert_eq!(sent.cancel(), None);
    }

    #[test]
    fn back_clears_contact_and_keeps_the_rest() {
        let mut flow = filled_email_flow();
        flow.back_to_method();

        assert_eq!(flow.step, InviteStep::Method);
        assert_eq!(flow.contact, "");
        assert_eq!(flow.member_name, "Мария Петрова");
        assert_eq!(flow.relationship, Some(Relationship::Spouse));
    }

    #[test]
    fn back_is_blocked_while_a_code_is_outstanding() {
        let mut flow = filled_email_flow();
        flow.send_code(&mut DemoCodeIssuer).unwrap();
        flow.back_to_method();
        assert_eq!(flow.step, InviteStep::Contact);
        assert_eq!(flow.contact, "maria@example.com");
    }

    #[test]
    fn code_input_only_takes_six_digits() {
        let mut flow = InvitationFlow::new();
        for c in "12ab34!56789".chars() {
            flow.push_code_digit(c);
        }
        assert_eq!(flow.code_input, "123456");
        flow.pop_code_digit();
        assert_eq!(flow.code_input, "12345");
    }
}
