use crate::aggregate;
use crate::errors::{check, AggregateError, DeleteError, StemError};
use crate::models::{Portal, ResourceType};
use crate::query::Query;
use crate::types::StemUrl;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::Value;

/// Authenticated BrainSTEM client object.
#[derive(Debug)]
pub struct StemClient {
    client: reqwest::Client,
    url: StemUrl,
}

fn token2header(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let auth_data = format!("Bearer {}", token);
    let mut value: HeaderValue = auth_data.parse().unwrap();
    value.set_sensitive(true);
    headers.insert(AUTHORIZATION, value);
    headers.insert(ACCEPT, "application/json".parse().unwrap());
    headers
}

impl StemClient {
    /// Create a client around a pre-issued token. No network call is
    /// made; the token is attached to every request as a sensitive
    /// `Authorization: Bearer` header.
    pub fn new(url: StemUrl, token: impl AsRef<str>) -> Result<Self, reqwest::Error> {
        let client = reqwest::ClientBuilder::new()
            .default_headers(token2header(token.as_ref()))
            .build()?;
        Ok(StemClient { client, url })
    }

    /// Get the URL this client is connected to.
    pub fn url(&self) -> &StemUrl {
        &self.url
    }

    fn resource_url(&self, portal: Portal, model: ResourceType, tail: &str) -> String {
        format!(
            "{}{}/{}/{}/{}",
            self.url,
            portal,
            model.namespace(),
            model,
            tail
        )
    }

    /// GET a record by id, or a collection restricted by [Query]
    /// modifiers. When an id is given the query modifiers are ignored:
    /// id-based and collection addressing are mutually exclusive.
    ///
    /// The decoded body is returned as-is; the client does not
    /// validate or reshape it.
    pub async fn load(
        &self,
        model: ResourceType,
        portal: Portal,
        id: Option<&str>,
        query: &Query,
    ) -> Result<Value, StemError> {
        let tail = match id {
            Some(id) => format!("{}/", id),
            None => query.to_tail(),
        };
        let res = self
            .client
            .get(self.resource_url(portal, model, &tail))
            .send()
            .await?;
        let body = check(res).await?.json().await?;
        Ok(body)
    }

    /// GET one record by id and unwrap the model's singular response
    /// key, e.g. `{"dataset": {...}}` for a dataset.
    pub async fn load_one(
        &self,
        model: ResourceType,
        portal: Portal,
        id: &str,
    ) -> Result<Value, StemError> {
        let mut body = self.load(model, portal, Some(id), &Query::new()).await?;
        body.as_object_mut()
            .and_then(|object| object.remove(model.singular_key()))
            .ok_or(StemError::MissingKey(model.singular_key()))
    }

    /// GET a collection and unwrap the model's list response key.
    pub async fn load_list(
        &self,
        model: ResourceType,
        portal: Portal,
        query: &Query,
    ) -> Result<Vec<Value>, StemError> {
        let mut body = self.load(model, portal, None, query).await?;
        let records = body
            .as_object_mut()
            .and_then(|object| object.remove(model.list_key()))
            .ok_or(StemError::MissingKey(model.list_key()))?;
        match records {
            Value::Array(records) => Ok(records),
            one => Ok(vec![one]),
        }
    }

    /// Create or update a record. With an id this is a PATCH to the
    /// id-qualified path (partial-update semantics), otherwise a POST
    /// to the collection path.
    pub async fn save(
        &self,
        model: ResourceType,
        portal: Portal,
        id: Option<&str>,
        data: &Value,
    ) -> Result<Value, StemError> {
        let req = match id {
            Some(id) => {
                let url = self.resource_url(portal, model, &format!("{}/", id));
                self.client.patch(url)
            }
            None => self.client.post(self.resource_url(portal, model, "")),
        };
        let res = req.json(data).send().await?;
        let saved = check(res).await?.json().await?;
        Ok(saved)
    }

    /// DELETE a record by id. An empty id is refused before any
    /// request is made.
    pub async fn delete(
        &self,
        model: ResourceType,
        portal: Portal,
        id: &str,
    ) -> Result<(), DeleteError> {
        if id.is_empty() {
            return Err(DeleteError::MissingId);
        }
        let url = self.resource_url(portal, model, &format!("{}/", id));
        let res = self.client.delete(url).send().await.map_err(StemError::Raw)?;
        check(res).await?;
        Ok(())
    }

    /// Assemble the denormalized metadata document for a dataset by
    /// following its fixed set of id relations, one GET per hop.
    pub async fn dataset_metadata(
        &self,
        portal: Portal,
        dataset_id: &str,
    ) -> Result<Value, AggregateError> {
        aggregate::dataset_metadata(self, portal, dataset_id).await
    }
}
