use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use super::{Profile, ProfileError, ProfilePost, ProfileProvider, RECENT_POSTS};
use crate::fetch::{FetchError, HttpClient};

/// Profile provider backed by the RapidAPI Instagram scraper endpoint
#[derive(Debug, Clone)]
pub struct RapidApiProvider {
    http: Arc<HttpClient>,
    base_url: String,
    api_host: String,
    api_key: String,
}

impl RapidApiProvider {
    pub fn new(http: Arc<HttpClient>, base_url: String, api_host: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_host,
            api_key,
        }
    }

    fn info_url(&self, username: &str) -> Result<Url, ProfileError> {
        let mut url = Url::parse(&self.base_url)
            .and_then(|base| base.join("v1/info"))
            .map_err(|e| ProfileError::Upstream(format!("invalid provider URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("username_or_id_or_url", username);
        Ok(url)
    }
}

#[async_trait]
impl ProfileProvider for RapidApiProvider {
    async fn lookup(&self, username: &str) -> Result<Profile, ProfileError> {
        let url = self.info_url(username)?;
        let headers = vec![
            ("X-RapidAPI-Key".to_string(), self.api_key.clone()),
            ("X-RapidAPI-Host".to_string(), self.api_host.clone()),
            ("Accept".to_string(), "application/json".to_string()),
        ];

        debug!(username, "Looking up profile");
        let body = self
            .http
            .fetch_page(url.as_str(), &headers)
            .await
            .map_err(|e| match e {
                FetchError::Status { status: 404, .. } => {
                    ProfileError::UserNotFound(username.to_string())
                }
                FetchError::Status { status: 429, .. } => ProfileError::RateLimited,
                other => ProfileError::Upstream(other.to_string()),
            })?;

        let response: InfoResponse = serde_json::from_str(&body)
            .map_err(|e| ProfileError::Upstream(format!("unexpected response: {e}")))?;

        response
            .data
            .map(UserData::into_profile)
            .ok_or_else(|| ProfileError::UserNotFound(username.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct InfoResponse {
    data: Option<UserData>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    username: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    biography: Option<String>,
    #[serde(default)]
    profile_pic_url_hd: Option<String>,
    #[serde(default)]
    profile_pic_url: Option<String>,
    #[serde(default)]
    is_verified: bool,
    #[serde(default)]
    edge_owner_to_timeline_media: Option<MediaEdges>,
    #[serde(default)]
    edge_followed_by: Option<Count>,
    #[serde(default)]
    edge_follow: Option<Count>,
}

#[derive(Debug, Deserialize)]
struct Count {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct MediaEdges {
    count: u64,
    #[serde(default)]
    edges: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
struct Edge {
    node: Node,
}

#[derive(Debug, Deserialize)]
struct Node {
    id: String,
    #[serde(default)]
    thumbnail_src: Option<String>,
    #[serde(default)]
    is_video: bool,
    #[serde(default)]
    edge_liked_by: Option<Count>,
    #[serde(default)]
    edge_media_to_comment: Option<Count>,
}

fn count(c: Option<Count>) -> u64 {
    c.map(|c| c.count).unwrap_or(0)
}

impl UserData {
    fn into_profile(self) -> Profile {
        let (posts_count, edges) = self
            .edge_owner_to_timeline_media
            .map(|m| (m.count, m.edges))
            .unwrap_or_default();

        Profile {
            username: self.username,
            full_name: self.full_name.unwrap_or_default(),
            bio: self.biography.unwrap_or_default(),
            profile_pic_url: self.profile_pic_url_hd.or(self.profile_pic_url),
            posts_count,
            followers_count: count(self.edge_followed_by),
            following_count: count(self.edge_follow),
            is_verified: self.is_verified,
            posts: edges
                .into_iter()
                .take(RECENT_POSTS)
                .map(|edge| ProfilePost {
                    id: edge.node.id,
                    thumbnail: edge.node.thumbnail_src,
                    is_video: edge.node.is_video,
                    likes: count(edge.node.edge_liked_by),
                    comments: count(edge.node.edge_media_to_comment),
                })
                .collect(),
        }
    }
}
