//! Firestore REST client

use std::collections::BTreeSet;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use super::value::{decode_article, encode_article, Document, CREATED_AT, UPDATED_AT};
use super::{prepare_for_save, RemoteError, RemoteResult, RemoteStore, COLLECTION};
use crate::config::RemoteCredentials;
use crate::models::{Article, ServerTimestamp};

/// Public Firestore REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Documents requested per list page
const PAGE_SIZE: u32 = 300;

/// Article fields left out of the encoded document when empty. A masked
/// update must still name them so the server clears any stored value.
const CLEARABLE_FIELDS: [&str; 6] = [
    "cardImageUrl",
    "heroImageUrl",
    "quote",
    "description",
    "intel",
    "published",
];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Article collection stored in Cloud Firestore
pub struct FirestoreRemote {
    client: Client,
    base_url: String,
    credentials: RemoteCredentials,
}

impl FirestoreRemote {
    pub fn new(credentials: RemoteCredentials) -> RemoteResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("travel-guru/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials,
        })
    }

    /// Point the client at another endpoint (emulator or test server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Resource path of the default database's document root
    fn documents_path(&self) -> String {
        format!(
            "projects/{}/databases/(default)/documents",
            self.credentials.project_id
        )
    }

    fn document_name(&self, id: &str) -> String {
        format!("{}/{}/{}", self.documents_path(), COLLECTION, id)
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/{}{}", self.base_url, self.documents_path(), suffix)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.client
            .request(method, url)
            .query(&[("key", self.credentials.api_key.as_str())])
            .header("X-Firebase-GMPID", &self.credentials.app_id)
    }

    async fn fetch_articles(&self) -> RemoteResult<Vec<Article>> {
        let mut articles = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .request(Method::GET, self.url(&format!("/{}", COLLECTION)))
                .query(&[("orderBy", "createdAt desc")])
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = check(request.send().await?, "list").await?;
            let page: ListResponse = response.json().await?;

            for document in &page.documents {
                match decode_article(document) {
                    Ok(article) => articles.push(article),
                    Err(e) => warn!("Skipping unreadable document: {}", e),
                }
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(articles)
    }

    fn commit_body(&self, article: &Article) -> RemoteResult<Value> {
        let fields = encode_article(article)?;
        let mut transforms = vec![json!({
            "fieldPath": UPDATED_AT,
            "setToServerValue": "REQUEST_TIME"
        })];

        let mut write = json!({});
        match article.created_at {
            ServerTimestamp::Unset => transforms.push(json!({
                "fieldPath": CREATED_AT,
                "setToServerValue": "REQUEST_TIME"
            })),
            // The server already holds a creation time we have not read back:
            // update every other field and leave it alone.
            ServerTimestamp::Pending => {
                let paths: BTreeSet<&str> = fields
                    .keys()
                    .map(String::as_str)
                    .chain(CLEARABLE_FIELDS)
                    .collect();
                write["updateMask"] = json!({ "fieldPaths": paths });
            }
            ServerTimestamp::Confirmed(_) => {}
        }

        write["update"] = json!({
            "name": self.document_name(&article.id),
            "fields": fields,
        });
        write["updateTransforms"] = Value::Array(transforms);

        Ok(json!({ "writes": [write] }))
    }
}

#[async_trait]
impl RemoteStore for FirestoreRemote {
    fn is_ready(&self) -> bool {
        true
    }

    async fn load_articles(&self) -> Vec<Article> {
        match self.fetch_articles().await {
            Ok(articles) => {
                debug!("Loaded {} articles from the remote store", articles.len());
                articles
            }
            Err(e) => {
                error!("Error loading articles from the remote store: {}", e);
                Vec::new()
            }
        }
    }

    async fn save_article(&self, article: &Article) -> RemoteResult<()> {
        let body = self.commit_body(&prepare_for_save(article))?;
        let response = self
            .request(Method::POST, self.url(":commit"))
            .json(&body)
            .send()
            .await?;
        check(response, "save").await?;
        debug!("Saved article '{}' to the remote store", article.id);
        Ok(())
    }

    async fn delete_article(&self, id: &str) -> RemoteResult<()> {
        let response = self
            .request(Method::DELETE, self.url(&format!("/{}/{}", COLLECTION, id)))
            .send()
            .await?;
        check(response, "delete").await?;
        debug!("Deleted article '{}' from the remote store", id);
        Ok(())
    }

    async fn slug_exists(&self, slug: &str) -> RemoteResult<bool> {
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": COLLECTION }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "slug" },
                        "op": "EQUAL",
                        "value": { "stringValue": slug }
                    }
                },
                "limit": 1
            }
        });

        let response = self
            .request(Method::POST, self.url(":runQuery"))
            .json(&body)
            .send()
            .await?;
        let results: Vec<QueryResult> = check(response, "query").await?.json().await?;
        Ok(results.iter().any(|r| r.document.is_some()))
    }
}

/// Turn a non-success response into [`RemoteError::Rejected`]
async fn check(response: Response, operation: &'static str) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&text)
        .map(|envelope| envelope.error.message)
        .unwrap_or(text);

    Err(RemoteError::Rejected {
        operation,
        status: status.as_u16(),
        message,
    })
}
