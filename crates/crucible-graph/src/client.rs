//! Neo4j connection management and shared graph client.

use neo4rs::{ConfigBuilder, Graph, Query};

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error in {op}: {source}")]
    Query {
        op: &'static str,
        #[source]
        source: neo4rs::Error,
    },

    #[error("failed to decode {column} in {op}: {message}")]
    Decode {
        op: &'static str,
        column: &'static str,
        message: String,
    },

    #[error("endpoint not found: {label} {key:?}")]
    EndpointNotFound { label: &'static str, key: String },

    #[error("{rel} connects {expected_from}->{expected_to}, got {got_from}->{got_to}")]
    EndpointKind {
        rel: &'static str,
        expected_from: &'static str,
        expected_to: &'static str,
        got_from: &'static str,
        got_to: &'static str,
    },

    #[error("{0} nodes are append-only; use create_node")]
    AppendOnly(&'static str),

    #[error("{0} nodes are keyed by natural identity; use upsert_node")]
    MergeKeyed(&'static str),

    #[error("unknown attribute {name:?} for {target}")]
    UnknownAttribute { target: &'static str, name: String },

    #[error("natural key must be non-empty")]
    EmptyKey,
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "crucible-dev".to_string(),
            max_connections: 16,
            fetch_size: 256,
        }
    }
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// This is the single point of access for all knowledge graph operations.
/// Clone is cheap (inner Arc). Each operation checks out one pooled
/// connection for exactly one statement; the driver returns it on every
/// exit path, so a failed query never leaks a connection.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Release the connection pool.
    ///
    /// Consumes the client, so no operation can still be in flight through it.
    pub fn close(self) {
        tracing::info!("Closed Neo4j connection");
    }

    /// Execute a write-only statement (CREATE, MERGE, DELETE, SET).
    pub async fn run(&self, op: &'static str, query: Query) -> Result<(), GraphError> {
        self.graph
            .run(query)
            .await
            .map_err(|source| GraphError::Query { op, source })
    }

    /// Execute a query and collect all rows.
    pub async fn query_rows(
        &self,
        op: &'static str,
        query: Query,
    ) -> Result<Vec<neo4rs::Row>, GraphError> {
        let mut stream = self
            .graph
            .execute(query)
            .await
            .map_err(|source| GraphError::Query { op, source })?;
        let mut rows = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|source| GraphError::Query { op, source })?
        {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a query and return the first row, if any.
    pub async fn query_one(
        &self,
        op: &'static str,
        query: Query,
    ) -> Result<Option<neo4rs::Row>, GraphError> {
        let mut stream = self
            .graph
            .execute(query)
            .await
            .map_err(|source| GraphError::Query { op, source })?;
        stream
            .next()
            .await
            .map_err(|source| GraphError::Query { op, source })
    }
}
