//! Wikidata SPARQL event source.
//!
//! Queries the Wikidata Query Service for occurrences (instances of any
//! subclass of `Q13418847`, "historical event") with a start time (`P580`),
//! end time (`P582`), and a location (`P276`) whose coordinates (`P625`) fall
//! inside the requested box.

use crate::config::{Config, WikidataConfig};
use crate::error::{Result, TimescapeError};
use crate::event::{RawCoordinate, RawEventRecord};
use crate::source::{EventSource, FetchQuery, SourceError};
use crate::store::EventStore;
use chrono::SecondsFormat;
use reqwest::header::ACCEPT;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::future::Future;

/// [`EventSource`] backed by a Wikidata SPARQL endpoint.
#[derive(Debug, Clone)]
pub struct WikidataSource {
    client: reqwest::Client,
    config: WikidataConfig,
}

impl WikidataSource {
    pub fn new(config: WikidataConfig) -> std::result::Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &WikidataConfig {
        &self.config
    }
}

impl EventStore<WikidataSource> {
    /// Create a store that fetches from Wikidata using `config.wikidata`.
    pub fn wikidata(config: Config) -> Result<Self> {
        config.validate().map_err(TimescapeError::InvalidConfig)?;
        let source = WikidataSource::new(config.wikidata.clone())
            .map_err(|e| TimescapeError::InvalidConfig(e.to_string()))?;
        EventStore::with_config(source, config)
    }
}

impl EventSource for WikidataSource {
    fn fetch_events(
        &self,
        query: &FetchQuery,
    ) -> impl Future<Output = std::result::Result<Vec<RawEventRecord>, SourceError>> + Send {
        let limit = query.limit;
        let request = build_sparql(query, &self.config.language).map(|sparql| {
            log::debug!("{}", sparql);
            self.client
                .get(&self.config.endpoint)
                .query(&[("query", sparql.as_str()), ("format", "json")])
                .header(ACCEPT, "application/sparql-results+json")
        });

        async move {
            let response = request?
                .send()
                .await
                .map_err(|e| SourceError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(SourceError::Service {
                    status: status.as_u16(),
                    message,
                });
            }

            let body: SparqlResponse = response
                .json()
                .await
                .map_err(|e| SourceError::Decode(e.to_string()))?;
            Ok(records_from_response(body, limit))
        }
    }
}

/// Build the SPARQL text for `query`.
///
/// Duration-valued bounds are resolved against the other side first; an
/// interval with no concrete side, or an empty one, cannot be queried.
pub fn build_sparql(
    query: &FetchQuery,
    language: &str,
) -> std::result::Result<String, SourceError> {
    let interval = query.interval.resolve().ok_or_else(|| {
        SourceError::InvalidQuery(format!("interval {} has no concrete bound", query.interval))
    })?;
    if interval.is_empty() {
        return Err(SourceError::InvalidQuery(format!(
            "interval {} is empty",
            query.interval
        )));
    }
    let (Some(start), Some(end)) = (interval.start_instant(), interval.end_instant()) else {
        return Err(SourceError::InvalidQuery(format!(
            "interval {} did not resolve",
            query.interval
        )));
    };
    let region = &query.region;

    Ok(format!(
        r#"SELECT ?event ?eventLabel ?start ?end (SAMPLE(?coord) AS ?coord)
WHERE
{{
  ?event wdt:P31/wdt:P279* wd:Q13418847.

  OPTIONAL {{ ?event wdt:P580 ?start. }}
  OPTIONAL {{ ?event wdt:P582 ?end. }}
  FILTER (?start >= "{start}"^^xsd:dateTime &&
          ?end <= "{end}"^^xsd:dateTime)
  ?event wdt:P276 ?location.
  ?location wdt:P625 ?coord.
  FILTER(geof:latitude(?coord) >= {min_lat} &&
         geof:latitude(?coord) <= {max_lat} &&
         geof:longitude(?coord) >= {min_lon} &&
         geof:longitude(?coord) <= {max_lon})
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{language}". }}
}}
GROUP BY ?event ?eventLabel ?start ?end
ORDER BY ?start
LIMIT {limit}
"#,
        start = start.to_rfc3339_opts(SecondsFormat::Millis, true),
        end = end.to_rfc3339_opts(SecondsFormat::Millis, true),
        min_lat = region.min_lat(),
        max_lat = region.max_lat(),
        min_lon = region.min_lon(),
        max_lon = region.max_lon(),
        language = language,
        limit = query.limit,
    ))
}

#[derive(Debug, Deserialize)]
pub struct SparqlResponse {
    pub results: SparqlResults,
}

#[derive(Debug, Deserialize)]
pub struct SparqlResults {
    pub bindings: Vec<FxHashMap<String, SparqlValue>>,
}

#[derive(Debug, Deserialize)]
pub struct SparqlValue {
    pub value: String,
}

/// Flatten SPARQL JSON bindings into raw records.
///
/// Entity ids are taken from the last path segment of the entity URI.
/// Bindings without an entity or coordinate are dropped.
pub fn records_from_response(response: SparqlResponse, limit: usize) -> Vec<RawEventRecord> {
    let value = |binding: &FxHashMap<String, SparqlValue>, key: &str| {
        binding.get(key).map(|v| v.value.clone())
    };

    response
        .results
        .bindings
        .iter()
        .filter_map(|binding| {
            let uri = value(binding, "event")?;
            let coord = value(binding, "coord")?;
            let id = uri.rsplit('/').next().unwrap_or(uri.as_str()).to_string();
            Some(RawEventRecord {
                label: value(binding, "eventLabel").unwrap_or_else(|| id.clone()),
                id,
                start: value(binding, "start"),
                end: value(binding, "end"),
                coord: RawCoordinate::Text(coord),
            })
        })
        .take(limit)
        .collect()
}
