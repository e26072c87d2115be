//! Email templates for registration and admin flows

use super::mailer::EmailMessage;

/// Verification email sent right after registration
pub fn verification_email(to: &str, full_name: &str, verification_url: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Hackathon Registration: Email Verification".to_string(),
        html: format!(
            "<h1>Email Verification</h1>\
             <p>Hello {full_name},</p>\
             <p>Thank you for registering for our hackathon! Please verify your email \
             by clicking the link below:</p>\
             <p><a href=\"{verification_url}\">Verify your email</a></p>\
             <p>This link will expire in 24 hours.</p>\
             <p>If you did not register for this event, please ignore this email.</p>"
        ),
    }
}

/// Team code email sent to a leader once their team is created
pub fn team_code_email(to: &str, full_name: &str, team_name: &str, code: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Your Team Code".to_string(),
        html: format!(
            "<h1>Your team is ready</h1>\
             <p>Hello {full_name},</p>\
             <p>Your team <strong>{team_name}</strong> has been created.</p>\
             <p>Share this code with your teammates so they can join:</p>\
             <h2>{code}</h2>\
             <p>Teams can have up to 4 members.</p>"
        ),
    }
}

/// Confirmation email sent to a member who joined a team
pub fn team_joined_email(
    to: &str,
    full_name: &str,
    team_name: &str,
    leader_name: &str,
) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: format!("You joined team {team_name}"),
        html: format!(
            "<h1>Welcome aboard</h1>\
             <p>Hello {full_name},</p>\
             <p>You are now a member of <strong>{team_name}</strong>, \
             led by {leader_name}.</p>\
             <p>See you at the event!</p>"
        ),
    }
}

/// Acceptance notification for members of accepted teams
pub fn acceptance_email(to: &str, full_name: &str, team_name: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Congratulations - your team has been accepted!".to_string(),
        html: format!(
            "<h1>You're in!</h1>\
             <p>Hello {full_name},</p>\
             <p>Your team <strong>{team_name}</strong> has been accepted for the \
             hackathon. We look forward to seeing you there.</p>"
        ),
    }
}

/// Waitlist notification for members of teams that were not accepted
pub fn waitlist_email(to: &str, full_name: &str, team_name: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Hackathon registration update".to_string(),
        html: format!(
            "<p>Hello {full_name},</p>\
             <p>Thank you for registering with team <strong>{team_name}</strong>. \
             Your team is currently on the waitlist; we will notify you as soon \
             as a spot opens up.</p>"
        ),
    }
}

/// Password reset email for admins
pub fn reset_password_email(to: &str, reset_link: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Reset your password".to_string(),
        html: format!(
            "<p>Hello Admin,</p>\
             <p>Click the link below to reset your password:</p>\
             <a href=\"{reset_link}\">{reset_link}</a>\
             <p>This link will expire in 15 minutes.</p>"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_email_contains_url() {
        let msg = verification_email(
            "p@example.com",
            "Amel",
            "http://localhost:8080/api/participants/verify-email/abc",
        );

        assert_eq!(msg.to, "p@example.com");
        assert!(msg.html.contains("Amel"));
        assert!(msg.html.contains("verify-email/abc"));
        assert!(msg.html.contains("24 hours"));
    }

    #[test]
    fn test_team_code_email_contains_code() {
        let msg = team_code_email("lead@example.com", "Amel", "Alpha", "ABC123");

        assert!(msg.html.contains("ABC123"));
        assert!(msg.html.contains("Alpha"));
    }

    #[test]
    fn test_team_joined_email_names_leader() {
        let msg = team_joined_email("m@example.com", "Yanis", "Alpha", "Amel");

        assert!(msg.subject.contains("Alpha"));
        assert!(msg.html.contains("Amel"));
    }

    #[test]
    fn test_reset_email_contains_link() {
        let msg = reset_password_email("a@example.com", "https://app/reset?token=t");

        assert!(msg.html.contains("https://app/reset?token=t"));
        assert!(msg.html.contains("15 minutes"));
    }
}
