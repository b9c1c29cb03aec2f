use askama::Template;
use imperial_core::{Email, EmailClient, EmailClientError, OneTimeCode};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};

const MESSAGE_STREAM: &str = "outbound";
const POSTMARK_AUTH_HEADER: &str = "X-Postmark-Server-Token";

const VERIFICATION_SUBJECT: &str = "Confirm your email address";
const RESET_SUBJECT: &str = "Reset your password";

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!doctype html>
<html>
  <body>
    <p>{{ intro }}</p>
    <p style="font-size:24px;letter-spacing:4px"><strong>{{ code }}</strong></p>
    <p>If you did not request this, you can ignore this email.</p>
  </body>
</html>"#
)]
struct CodeEmail<'a> {
    intro: &'a str,
    code: &'a str,
}

/// Sends codes through Postmark's `/email` endpoint.
pub struct PostmarkEmailClient {
    http_client: Client,
    base_url: String,
    sender: Email,
    authorization_token: Secret<String>,
}

impl PostmarkEmailClient {
    pub fn new(
        base_url: String,
        sender: Email,
        authorization_token: Secret<String>,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            base_url,
            sender,
            authorization_token,
        }
    }

    #[tracing::instrument(name = "Sending email", skip_all, fields(subject = subject))]
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<(), EmailClientError> {
        let base = Url::parse(&self.base_url).map_err(|e| EmailClientError(e.to_string()))?;
        let url = base
            .join("/email")
            .map_err(|e| EmailClientError(e.to_string()))?;

        let request_body = SendEmailRequest {
            from: self.sender.as_str(),
            to: recipient.as_str(),
            subject,
            html_body,
            text_body,
            message_stream: MESSAGE_STREAM,
        };

        self.http_client
            .post(url)
            .header(
                POSTMARK_AUTH_HEADER,
                self.authorization_token.expose_secret(),
            )
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EmailClientError(e.to_string()))?
            .error_for_status()
            .map_err(|e| EmailClientError(e.to_string()))?;

        Ok(())
    }

    async fn send_code(
        &self,
        recipient: &Email,
        subject: &str,
        intro: &str,
        code: &OneTimeCode,
    ) -> Result<(), EmailClientError> {
        let html_body = CodeEmail {
            intro,
            code: code.as_str(),
        }
        .render()
        .map_err(|e| EmailClientError(e.to_string()))?;
        let text_body = format!("{intro}\n\n{}", code.as_str());

        self.send_email(recipient, subject, &html_body, &text_body)
            .await
    }
}

#[async_trait::async_trait]
impl EmailClient for PostmarkEmailClient {
    async fn send_verification_code(
        &self,
        recipient: &Email,
        code: &OneTimeCode,
    ) -> Result<(), EmailClientError> {
        self.send_code(
            recipient,
            VERIFICATION_SUBJECT,
            "Use this code to confirm your email address:",
            code,
        )
        .await
    }

    async fn send_password_reset_code(
        &self,
        recipient: &Email,
        code: &OneTimeCode,
    ) -> Result<(), EmailClientError> {
        self.send_code(
            recipient,
            RESET_SUBJECT,
            "Use this code to choose a new password:",
            code,
        )
        .await
    }
}

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
}
