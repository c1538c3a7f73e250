//! HTTP transport for the Trello REST API
//!
//! Every call appends the key and token as query parameters. Any non-2xx
//! status becomes a [`TresError::Http`] carrying the status text.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Credentials;
use crate::error::TresError;
use crate::model::{BoardList, Card, Checklist, Comment, Member, NameEntry, SearchResult};

pub const DEFAULT_API_BASE: &str = "https://api.trello.com";

#[derive(Debug, Serialize)]
struct NewList<'a> {
    name: &'a str,
    pos: &'a str,
}

pub struct TrelloClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl TrelloClient {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn user(&self) -> &str {
        &self.credentials.user
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth(&self) -> [(&'static str, &str); 2] {
        [
            ("key", self.credentials.key.as_str()),
            ("token", self.credentials.token.as_str()),
        ]
    }

    /// Performs a GET and returns the raw response body
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        let url = self.url(path);
        tracing::debug!(%url, ?query, "GET");
        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&self.auth())
            .send()
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;
        read_body(response).await
    }

    /// Performs a POST with a JSON body and returns the raw response body
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Vec<u8>> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let response = self
            .http
            .post(&url)
            .query(&self.auth())
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;
        read_body(response).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let body = self.get(path, query).await?;
        serde_json::from_slice(&body)
            .with_context(|| format!("Failed to parse response from {}", path))
    }

    /// Boards visible to a member (`me` for the authenticated user)
    pub async fn board_names(&self, member: &str) -> Result<Vec<NameEntry>> {
        let path = format!("/1/members/{}/boards", member.trim());
        self.get_json(&path, &[("fields", "name")]).await
    }

    pub async fn list_names(&self, board_id: &str) -> Result<Vec<NameEntry>> {
        let path = format!("/1/boards/{}/lists", board_id.trim());
        self.get_json(&path, &[("fields", "name")]).await
    }

    pub async fn board_members(&self, board_id: &str) -> Result<Vec<Member>> {
        let path = format!("/1/board/{}/members", board_id.trim());
        self.get_json(&path, &[("fields", "all")]).await
    }

    pub async fn card_comments(&self, card_id: &str) -> Result<Vec<Comment>> {
        let path = format!("/1/card/{}/actions", card_id.trim());
        self.get_json(&path, &[("filter", "commentCard")]).await
    }

    pub async fn card_checklists(&self, card_id: &str) -> Result<Vec<Checklist>> {
        let path = format!("/1/card/{}/checklists", card_id.trim());
        self.get_json(&path, &[("fields", "name,idBoard,idCard")]).await
    }

    pub async fn search_cards(&self, query: &str, limit: usize) -> Result<Vec<Card>> {
        let limit = limit.to_string();
        let result: SearchResult = self
            .get_json(
                "/1/search",
                &[
                    ("modelTypes", "cards"),
                    ("card_fields", "all"),
                    ("cards_limit", limit.as_str()),
                    ("query", query),
                ],
            )
            .await?;
        Ok(result.cards)
    }

    /// Creates a list on a board; `pos` is `top`, `bottom` or a number
    pub async fn create_list(&self, board_id: &str, name: &str, pos: &str) -> Result<BoardList> {
        let path = format!("/1/board/{}/lists", board_id.trim());
        let body = self.post(&path, &NewList { name, pos }).await?;
        serde_json::from_slice(&body).context("Failed to parse created list")
    }
}

async fn read_body(response: reqwest::Response) -> Result<Vec<u8>> {
    let status = response.status();
    if !status.is_success() {
        return Err(TresError::Http {
            status: status.to_string(),
        }
        .into());
    }
    let bytes = response
        .bytes()
        .await
        .context("Failed to read response body")?;
    Ok(bytes.to_vec())
}
