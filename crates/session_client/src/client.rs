use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use log::{debug, warn};
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use url::Url;
use widget_core::{BotDetails, Message, MessageFeedback, SessionInfo, TriggerKind};

use crate::api::{AnswerStream, SessionApi};
use crate::error::{ClientError, Result};
use crate::models::{
    AnswerEvent, CreateSessionRequest, CreateSessionResponse, ListMessagesResponse,
    MessageFeedbackRequest, SessionFeedbackRequest, TriggerBotMessageRequest, UserGuidBody,
};

/// Reqwest-backed implementation of [`SessionApi`].
#[derive(Debug, Clone)]
pub struct HttpSessionClient {
    client: Client,
    base: Url,
}

impl HttpSessionClient {
    pub fn new(api_base: &str) -> Result<Self> {
        let base = Url::parse(api_base)?;
        let client = Client::builder()
            .default_headers(Self::default_headers())
            .build()?;
        Ok(Self { client, base })
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, "application/json".parse().expect("static header"));
        headers.insert(
            CONTENT_TYPE,
            "application/json".parse().expect("static header"),
        );
        headers
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    /// Turn a non-2xx response into an [`ClientError::Api`], preferring
    /// the body-provided error message over the generic fallback.
    async fn check(response: Response, fallback: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.json::<serde_json::Value>().await.ok();
        warn!("backend returned {} for: {}", status, fallback);
        Err(ClientError::api(status.as_u16(), body, fallback))
    }
}

#[async_trait]
impl SessionApi for HttpSessionClient {
    async fn create_session(&self, bot_guid: &str, user_guid: &str) -> Result<String> {
        let url = self.endpoint("/session/create")?;
        let response = self
            .client
            .post(url)
            .json(&CreateSessionRequest {
                user_guid,
                bot_guid,
            })
            .send()
            .await?;
        let response = Self::check(response, "Failed to create session.").await?;
        let created: CreateSessionResponse = response.json().await?;
        debug!("created session {}", created.guid);
        Ok(created.guid)
    }

    async fn end_session(&self, session_guid: &str, user_guid: &str) -> Result<()> {
        let url = self.endpoint(&format!("/session/end/{}", session_guid))?;
        let response = self
            .client
            .delete(url)
            .json(&UserGuidBody { user_guid })
            .send()
            .await?;
        Self::check(response, "Failed to end session.").await?;
        Ok(())
    }

    async fn session_status(&self, session_guid: &str, user_guid: &str) -> Result<SessionInfo> {
        let mut url = self.endpoint(&format!("/session/status/{}", session_guid))?;
        url.query_pairs_mut().append_pair("user_guid", user_guid);
        let response = self.client.get(url).send().await?;
        let response = Self::check(response, "Failed to get session status.").await?;
        Ok(response.json().await?)
    }

    async fn list_messages(&self, session_guid: &str, user_guid: &str) -> Result<Vec<Message>> {
        let mut url = self.endpoint(&format!("/session/list_messages/{}", session_guid))?;
        url.query_pairs_mut().append_pair("user_guid", user_guid);
        let response = self.client.get(url).send().await?;
        let response = Self::check(response, "Failed to get messages.").await?;
        let listed: ListMessagesResponse = response.json().await?;
        Ok(listed.messages)
    }

    async fn trigger_bot_message(
        &self,
        session_guid: &str,
        user_guid: &str,
        kind: TriggerKind,
    ) -> Result<Message> {
        let url = self.endpoint(&format!("/session/trigger_bot_message/{}", session_guid))?;
        let response = self
            .client
            .post(url)
            .json(&TriggerBotMessageRequest {
                user_guid,
                message_type: kind.as_str(),
            })
            .send()
            .await?;
        let response = Self::check(response, "Failed to trigger bot message.").await?;
        Ok(response.json().await?)
    }

    async fn message_feedback(
        &self,
        session_guid: &str,
        message_guid: &str,
        user_guid: &str,
        feedback: Option<MessageFeedback>,
    ) -> Result<()> {
        let url = self.endpoint(&format!(
            "/session/feedback/{}/message/{}",
            session_guid, message_guid
        ))?;
        let response = self
            .client
            .post(url)
            .json(&MessageFeedbackRequest {
                user_guid,
                feedback,
            })
            .send()
            .await?;
        Self::check(response, "Failed to send message feedback.").await?;
        Ok(())
    }

    async fn session_feedback(
        &self,
        session_guid: &str,
        user_guid: &str,
        rating: Option<u8>,
    ) -> Result<()> {
        let url = self.endpoint(&format!("/session/feedback/{}", session_guid))?;
        let response = self
            .client
            .post(url)
            .json(&SessionFeedbackRequest {
                user_guid,
                feedback: rating,
            })
            .send()
            .await?;
        Self::check(response, "Failed to send session feedback.").await?;
        Ok(())
    }

    async fn bot_details(&self, bot_guid: &str) -> Result<BotDetails> {
        let url = self.endpoint(&format!("/bot/details/{}", bot_guid))?;
        let response = self.client.get(url).send().await?;
        let response = Self::check(response, "Failed to load bot data.").await?;
        Ok(response.json().await?)
    }

    async fn answer_question(
        &self,
        session_guid: &str,
        user_guid: &str,
        question: &str,
    ) -> Result<AnswerStream> {
        let mut url = self.endpoint(&format!("/session/answer_question/{}", session_guid))?;
        url.query_pairs_mut()
            .append_pair("question", question)
            .append_pair("user_guid", user_guid);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;
        let response = Self::check(response, "Failed to send message.").await?;

        let events = response.bytes_stream().eventsource().map(|item| match item {
            Ok(event) => serde_json::from_str::<AnswerEvent>(&event.data)
                .map_err(|err| ClientError::MalformedEvent(format!("{}: {}", err, event.data))),
            Err(err) => Err(ClientError::Stream(err.to_string())),
        });

        Ok(Box::pin(events))
    }
}
