//! Developer notification.
//!
//! There is no mail transport; [`ConsoleMailer`] prints the message instead.
//! Delivery always counts as successful.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{required_str, Tool};

/// An outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Sink for outgoing notifications.
pub trait Mailer: Send + Sync {
    fn deliver(&self, notification: &Notification);
}

/// Prints notifications to stdout.
pub struct ConsoleMailer {
    sender: String,
}

impl ConsoleMailer {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }

    fn render(&self, notification: &Notification) -> String {
        format!(
            "\n--- Email delivery (simulated) ---\nFrom: {}\nTo: {}\nSubject: {}\nBody:\n{}\n----------------------------------\n",
            self.sender, notification.recipient, notification.subject, notification.body
        )
    }
}

impl Mailer for ConsoleMailer {
    fn deliver(&self, notification: &Notification) {
        tracing::info!(
            recipient = %notification.recipient,
            subject = %notification.subject,
            "Delivering notification to console"
        );
        println!("{}", self.render(notification));
    }
}

/// Email the analysis to a developer.
pub struct SendEmail {
    mailer: Arc<dyn Mailer>,
}

impl SendEmail {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl Tool for SendEmail {
    fn name(&self) -> &str {
        "send_email_to_developer"
    }

    fn description(&self) -> &str {
        "Send the build error analysis to a developer by email. Returns a message describing the delivery result."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "recipient_email": {
                    "type": "string",
                    "description": "Recipient email address"
                },
                "subject": {
                    "type": "string",
                    "description": "Email subject"
                },
                "body": {
                    "type": "string",
                    "description": "Email body"
                }
            },
            "required": ["recipient_email", "subject", "body"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let recipient = required_str(&args, "recipient_email")?;
        let subject = required_str(&args, "subject")?;
        let body = required_str(&args, "body")?;
        Ok(send_email_to_developer(
            recipient,
            subject,
            body,
            self.mailer.as_ref(),
        ))
    }
}

/// Hand the message to `mailer` and return a status line.
pub fn send_email_to_developer(
    recipient: &str,
    subject: &str,
    body: &str,
    mailer: &dyn Mailer,
) -> String {
    let notification = Notification {
        recipient: recipient.to_string(),
        subject: subject.to_string(),
        body: body.to_string(),
    };
    mailer.deliver(&notification);
    format!("Email successfully sent to {}.", recipient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<Notification>>,
    }

    impl Mailer for RecordingMailer {
        fn deliver(&self, notification: &Notification) {
            self.sent.lock().unwrap().push(notification.clone());
        }
    }

    #[test]
    fn send_reports_success_with_recipient() {
        let mailer = RecordingMailer::default();
        let status = send_email_to_developer(
            "developer_A@company.com",
            "Build failure in file_A.cc",
            "CXX compile failed at line 200.",
            &mailer,
        );

        assert!(status.contains("developer_A@company.com"));
        assert!(status.contains("successfully sent"));

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Build failure in file_A.cc");
    }

    #[test]
    fn empty_fields_still_succeed() {
        let status = send_email_to_developer("", "", "", &ConsoleMailer::new("bot@company.com"));
        assert!(status.contains("successfully sent"));
    }

    #[test]
    fn console_render_includes_all_fields() {
        let mailer = ConsoleMailer::new("bot@company.com");
        let text = mailer.render(&Notification {
            recipient: "dev@company.com".to_string(),
            subject: "Broken build".to_string(),
            body: "see log".to_string(),
        });
        assert!(text.contains("From: bot@company.com"));
        assert!(text.contains("To: dev@company.com"));
        assert!(text.contains("Subject: Broken build"));
        assert!(text.contains("see log"));
    }

    #[test]
    fn tool_requires_all_arguments() {
        let tool = SendEmail::new(Arc::new(RecordingMailer::default()));
        let err = tokio_test::block_on(tool.execute(json!({
            "recipient_email": "dev@company.com",
            "subject": "hi"
        })))
        .unwrap_err();
        assert!(err.to_string().contains("Missing 'body' argument"));
    }
}
