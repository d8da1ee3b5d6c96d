//! REST-backed location source
//!
//! Endpoints, relative to the configured base URL:
//!
//! | Call | Request |
//! |---|---|
//! | provinces | `GET /locations/provinces` |
//! | cities | `GET /locations/cities?provinceId=<id>` |
//! | districts | `GET /locations/districts?cityId=<id>` |
//! | localities | `GET /locations/localities?districtId=<id>` |
//! | point lookup | `GET /locations/<level>/<id>` |

use crate::error::{SourceError, SourceResult};
use crate::level::LocationLevel;
use crate::node::{LocationId, LocationNode};
use crate::response::{decode_node, decode_nodes, unwrap_item_response};
use crate::source::LocationSource;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

/// Location source talking to the admin REST API
#[derive(Debug, Clone)]
pub struct HttpLocationSource {
    client: Client,
    base_url: Url,
}

impl HttpLocationSource {
    /// Create source with a default client
    ///
    /// # Errors
    /// [`SourceError::InvalidUrl`] if `base_url` does not parse or cannot carry a path.
    pub fn new(base_url: &str) -> SourceResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create source reusing an existing client (timeouts, auth headers)
    ///
    /// # Errors
    /// [`SourceError::InvalidUrl`] if `base_url` does not parse or cannot carry a path.
    pub fn with_client(client: Client, base_url: &str) -> SourceResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| SourceError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// Base URL requests are built from
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Collection segment for a level (`cities`)
    #[inline]
    #[must_use]
    pub const fn list_segment(level: LocationLevel) -> &'static str {
        match level {
            LocationLevel::Province => "provinces",
            LocationLevel::City => "cities",
            LocationLevel::District => "districts",
            LocationLevel::Locality => "localities",
        }
    }

    /// Build `<base>/locations/<segments..>`
    fn endpoint(&self, segments: &[&str]) -> SourceResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| SourceError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty().push("locations").extend(segments);
        }
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> SourceResult<(StatusCode, Option<Value>)> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok((status, None));
        }
        if !status.is_success() {
            return Err(SourceError::status(status.as_u16(), url.as_str()));
        }

        Ok((status, Some(response.json::<Value>().await?)))
    }
}

#[async_trait]
impl LocationSource for HttpLocationSource {
    async fn children(
        &self,
        level: LocationLevel,
        parent: Option<LocationId>,
    ) -> SourceResult<Vec<LocationNode>> {
        let mut url = self.endpoint(&[Self::list_segment(level)])?;

        if let Some(key) = level.parent_key() {
            let Some(parent) = parent.filter(|p| !p.is_blank()) else {
                return Ok(Vec::new());
            };
            url.query_pairs_mut().append_pair(key, parent.as_str());

            let (status, body) = self.get_json(url.clone()).await?;
            let body = body.ok_or_else(|| SourceError::status(status.as_u16(), url.as_str()))?;

            // Some list endpoints omit the parent key; it is implied by the query.
            return Ok(decode_nodes(level, body)
                .into_iter()
                .map(|mut node| {
                    if node.parent_id().is_none() {
                        node.parent = Some(parent.clone());
                    }
                    node
                })
                .collect());
        }

        let (status, body) = self.get_json(url.clone()).await?;
        let body = body.ok_or_else(|| SourceError::status(status.as_u16(), url.as_str()))?;
        Ok(decode_nodes(level, body))
    }

    async fn lookup(
        &self,
        level: LocationLevel,
        id: LocationId,
    ) -> SourceResult<LocationNode> {
        let url = self.endpoint(&[level.as_str(), id.as_str()])?;

        let (_, body) = self.get_json(url).await?;
        let not_found = || SourceError::NotFound {
            level,
            id: id.clone(),
        };

        let item = body.and_then(unwrap_item_response).ok_or_else(not_found)?;
        decode_node(level, &item)
    }
}
