//! REST adapter for the content API.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use folio_core::models::{
    About, ContactMessage, ContactSettings, Experience, Hero, Project, Skill, SkillCategory,
    SiteSettings,
};
use folio_core::{AdminProfile, CategoryId, Document, Flag, MessageId, Resource, SessionHandle};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::traits::{DocumentStore, MessageStore, RemoteStore};

/// Route table for a per-entity resource.
pub trait Endpoint: Resource {
    fn list_path(config: &StoreConfig) -> String;

    fn create_path() -> String;

    fn item_path(id: &Self::Id) -> String;

    fn reorder_path(scope: &Self::Scope) -> String;

    fn toggle_path(_id: &Self::Id, _flag: Flag) -> Option<String> {
        None
    }

    /// Turns the list response into entities.
    fn decode_list(body: serde_json::Value) -> Result<Vec<Self>, StoreError> {
        Ok(serde_json::from_value(body)?)
    }
}

pub trait DocumentEndpoint: Document {
    const PATH: &'static str;
}

fn hidden_query(config: &StoreConfig) -> &'static str {
    if config.include_hidden { "?all=true" } else { "" }
}

impl Endpoint for Project {
    fn list_path(config: &StoreConfig) -> String {
        format!("/projects{}", hidden_query(config))
    }

    fn create_path() -> String {
        "/projects".to_string()
    }

    fn item_path(id: &Self::Id) -> String {
        format!("/projects/{id}")
    }

    fn reorder_path(_: &()) -> String {
        "/projects/reorder".to_string()
    }

    fn toggle_path(id: &Self::Id, flag: Flag) -> Option<String> {
        Some(match flag {
            Flag::Visible => format!("/projects/{id}/toggle-visibility"),
            Flag::Featured => format!("/projects/{id}/toggle-featured"),
        })
    }
}

impl Endpoint for Experience {
    fn list_path(config: &StoreConfig) -> String {
        format!("/experience{}", hidden_query(config))
    }

    fn create_path() -> String {
        "/experience".to_string()
    }

    fn item_path(id: &Self::Id) -> String {
        format!("/experience/{id}")
    }

    fn reorder_path(_: &()) -> String {
        "/experience/reorder".to_string()
    }

    fn toggle_path(id: &Self::Id, flag: Flag) -> Option<String> {
        match flag {
            Flag::Visible => Some(format!("/experience/{id}/toggle-visibility")),
            Flag::Featured => None,
        }
    }
}

impl Endpoint for SkillCategory {
    fn list_path(_: &StoreConfig) -> String {
        "/skills".to_string()
    }

    fn create_path() -> String {
        "/skills/categories".to_string()
    }

    fn item_path(id: &Self::Id) -> String {
        format!("/skills/categories/{id}")
    }

    fn reorder_path(_: &()) -> String {
        "/skills/categories/reorder".to_string()
    }

    fn decode_list(body: serde_json::Value) -> Result<Vec<Self>, StoreError> {
        let mut categories: Vec<SkillCategory> = serde_json::from_value(body)?;
        for category in &mut categories {
            category.skills.clear();
        }
        Ok(categories)
    }
}

impl Endpoint for Skill {
    fn list_path(_: &StoreConfig) -> String {
        "/skills".to_string()
    }

    fn create_path() -> String {
        "/skills".to_string()
    }

    fn item_path(id: &Self::Id) -> String {
        format!("/skills/{id}")
    }

    fn reorder_path(category: &CategoryId) -> String {
        format!("/skills/categories/{category}/reorder")
    }

    /// Skills arrive nested inside their categories.
    fn decode_list(body: serde_json::Value) -> Result<Vec<Self>, StoreError> {
        let categories: Vec<SkillCategory> = serde_json::from_value(body)?;
        Ok(categories.into_iter().flat_map(|c| c.skills).collect())
    }
}

impl DocumentEndpoint for About {
    const PATH: &'static str = "/about";
}

impl DocumentEndpoint for Hero {
    const PATH: &'static str = "/hero";
}

impl DocumentEndpoint for SiteSettings {
    const PATH: &'static str = "/settings/site";
}

impl DocumentEndpoint for ContactSettings {
    const PATH: &'static str = "/settings/contact";
}

#[derive(Serialize)]
struct ReorderItem<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct ReorderBody<'a> {
    items: Vec<ReorderItem<'a>>,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    access_token: String,
    admin: AdminProfile,
}

#[derive(Deserialize)]
struct CountResponse {
    count: usize,
}

/// Pulls a human-readable reason out of an error body. The API sends
/// `{"message": "..."}` or, for validation failures, `{"message": ["...", ...]}`.
pub fn rejection_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|v| v.get("message")).and_then(|m| match m {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|i| i.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        ),
        _ => None,
    });
    match message {
        Some(m) if !m.is_empty() => m,
        _ => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}

pub struct HttpStore {
    client: Client,
    config: StoreConfig,
    session: SessionHandle,
}

impl HttpStore {
    pub fn new(config: StoreConfig, session: SessionHandle) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.config.url(path));
        match self.session.read().token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(&self, response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::info!("API rejected credentials, clearing session");
            self.session.write().clear();
            return Err(StoreError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message: rejection_message(status, &body),
            });
        }
        Ok(response)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, StoreError> {
        let response = self.check(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), StoreError> {
        self.check(builder.send().await?).await?;
        Ok(())
    }

    /// Email/password login; establishes the session on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminProfile, StoreError> {
        let builder = self
            .request(Method::POST, "/auth/login")
            .json(&LoginBody { email, password });
        let auth: AuthResponse = self.send(builder).await?;
        tracing::info!(admin = %auth.admin.email, "logged in");
        self.session
            .write()
            .establish(auth.access_token, auth.admin.clone());
        Ok(auth.admin)
    }

    /// OAuth callback path: the token arrives first, the profile is fetched with it.
    pub async fn login_with_token(&self, token: &str) -> Result<AdminProfile, StoreError> {
        *self.session.write() = folio_core::Session::with_token(token);
        match self.send::<AdminProfile>(self.request(Method::GET, "/auth/me")).await {
            Ok(admin) => {
                self.session.write().establish(token, admin.clone());
                Ok(admin)
            }
            Err(e) => {
                self.session.write().clear();
                Err(e)
            }
        }
    }

    /// Validates a stored token at startup. Returns whether the session is live.
    pub async fn check_auth(&self) -> Result<bool, StoreError> {
        let token = self.session.read().token().map(str::to_string);
        let Some(token) = token else {
            self.session.write().mark_initialized();
            return Ok(false);
        };
        match self.send::<AdminProfile>(self.request(Method::GET, "/auth/me")).await {
            Ok(admin) => {
                self.session.write().establish(token, admin);
                Ok(true)
            }
            Err(StoreError::Unauthorized) => Ok(false),
            Err(e) => {
                self.session.write().clear();
                Err(e)
            }
        }
    }

    pub fn logout(&self) {
        tracing::info!("logged out");
        self.session.write().clear();
    }
}

#[async_trait]
impl<E: Endpoint> RemoteStore<E> for HttpStore {
    async fn fetch_all(&self) -> Result<Vec<E>, StoreError> {
        let path = E::list_path(&self.config);
        tracing::debug!(%path, "fetch");
        let body: serde_json::Value = self.send(self.request(Method::GET, &path)).await?;
        E::decode_list(body)
    }

    async fn create(&self, draft: &E::Draft) -> Result<E, StoreError> {
        let builder = self.request(Method::POST, &E::create_path()).json(draft);
        self.send(builder).await
    }

    async fn update(&self, id: &E::Id, patch: &E::Patch) -> Result<E, StoreError> {
        let builder = self.request(Method::PUT, &E::item_path(id)).json(patch);
        self.send(builder).await
    }

    async fn delete(&self, id: &E::Id) -> Result<(), StoreError> {
        self.send_empty(self.request(Method::DELETE, &E::item_path(id)))
            .await
    }

    async fn reorder_batch(
        &self,
        scope: &E::Scope,
        ordered_ids: &[E::Id],
    ) -> Result<(), StoreError> {
        let keys: Vec<String> = ordered_ids.iter().map(|id| id.to_string()).collect();
        let body = ReorderBody {
            items: keys.iter().map(|id| ReorderItem { id }).collect(),
        };
        let builder = self
            .request(Method::PUT, &E::reorder_path(scope))
            .json(&body);
        self.send_empty(builder).await
    }

    async fn toggle_flag(&self, id: &E::Id, flag: Flag) -> Result<E, StoreError> {
        let path = E::toggle_path(id, flag).ok_or(StoreError::Unsupported("toggle"))?;
        self.send(self.request(Method::PUT, &path)).await
    }
}

#[async_trait]
impl<D: DocumentEndpoint> DocumentStore<D> for HttpStore {
    async fn fetch(&self) -> Result<D, StoreError> {
        self.send(self.request(Method::GET, D::PATH)).await
    }

    async fn replace(&self, patch: &D::Patch) -> Result<D, StoreError> {
        self.send(self.request(Method::PUT, D::PATH).json(patch))
            .await
    }
}

#[async_trait]
impl MessageStore for HttpStore {
    async fn messages(&self) -> Result<Vec<ContactMessage>, StoreError> {
        self.send(self.request(Method::GET, "/settings/messages"))
            .await
    }

    async fn unread_count(&self) -> Result<usize, StoreError> {
        let count: CountResponse = self
            .send(self.request(Method::GET, "/settings/messages/unread-count"))
            .await?;
        Ok(count.count)
    }

    async fn mark_read(&self, id: &MessageId) -> Result<(), StoreError> {
        let path = format!("/settings/messages/{id}/read");
        self.send_empty(self.request(Method::PUT, &path)).await
    }

    async fn mark_all_read(&self) -> Result<(), StoreError> {
        self.send_empty(self.request(Method::PUT, "/settings/messages/mark-all-read"))
            .await
    }

    async fn delete_message(&self, id: &MessageId) -> Result<(), StoreError> {
        let path = format!("/settings/messages/{id}");
        self.send_empty(self.request(Method::DELETE, &path)).await
    }
}
