use async_trait::async_trait;
use platform_completion::{CompletionClient, WelcomePrompt};
use platform_mail::Mailer;

/// Drafts welcome copy. Implementations always produce text.
#[async_trait]
pub trait WelcomeWriter: Send + Sync {
    async fn welcome_text(&self, name: &str, role: &str, field: &str, organization: &str) -> String;
}

/// Best-effort delivery; failures stay inside the implementation.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, to: &str, subject: &str, body: &str);
}

#[async_trait]
impl WelcomeWriter for CompletionClient {
    async fn welcome_text(&self, name: &str, role: &str, field: &str, organization: &str) -> String {
        let prompt = WelcomePrompt {
            name,
            role,
            field,
            organization,
        };
        self.generate_welcome_text(prompt).await
    }
}

#[async_trait]
impl Notifier for Mailer {
    async fn notify(&self, to: &str, subject: &str, body: &str) {
        self.send(to, subject, body).await;
    }
}
