//! In-memory catalog connection for strategy tests.

use async_trait::async_trait;

use crate::core::traits::{CatalogConnection, CatalogRow};
use crate::error::Result;

struct Response {
    fragment: String,
    params: Option<Vec<String>>,
    rows: Vec<CatalogRow>,
}

/// Answers queries from canned responses and records what was executed.
///
/// A query is answered by the first response whose fragment occurs in the
/// query text (and whose params, when given, equal the bound params).
/// Unmatched queries return no rows.
pub(crate) struct RecordingConnection {
    driver: String,
    version: String,
    id: String,
    responses: Vec<Response>,
    executed: Vec<(String, Vec<String>)>,
}

impl RecordingConnection {
    pub(crate) fn new(driver: &str, version: &str) -> Self {
        Self {
            driver: driver.to_string(),
            version: version.to_string(),
            id: format!("recording-{}", driver),
            responses: Vec::new(),
            executed: Vec::new(),
        }
    }

    pub(crate) fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub(crate) fn respond(mut self, fragment: &str, rows: Vec<CatalogRow>) -> Self {
        self.responses.push(Response {
            fragment: fragment.to_string(),
            params: None,
            rows,
        });
        self
    }

    pub(crate) fn respond_with_params(
        mut self,
        fragment: &str,
        params: &[&str],
        rows: Vec<CatalogRow>,
    ) -> Self {
        self.responses.push(Response {
            fragment: fragment.to_string(),
            params: Some(params.iter().map(|p| p.to_string()).collect()),
            rows,
        });
        self
    }

    /// Queries in execution order, with their bound params.
    pub(crate) fn executed(&self) -> &[(String, Vec<String>)] {
        &self.executed
    }
}

#[async_trait]
impl CatalogConnection for RecordingConnection {
    fn driver_name(&self) -> &str {
        &self.driver
    }

    fn connection_id(&self) -> &str {
        &self.id
    }

    async fn server_version(&mut self) -> Result<String> {
        Ok(self.version.clone())
    }

    async fn fetch_all(&mut self, query: &str, params: &[String]) -> Result<Vec<CatalogRow>> {
        self.executed.push((query.to_string(), params.to_vec()));

        let rows = self
            .responses
            .iter()
            .find(|r| {
                query.contains(&r.fragment)
                    && r.params.as_ref().map_or(true, |p| p.as_slice() == params)
            })
            .map(|r| r.rows.clone())
            .unwrap_or_default();

        Ok(rows)
    }
}
