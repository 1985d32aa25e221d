//! Addresses of mapping sources and targets.
//!
//! Two input grammars are accepted and both normalize to the same value:
//!
//! ```text
//! protocol://...                      redb, mcp, stream, webhook
//!   redb://data/database/{db}[/table/{table}[/column/{column}]]
//!   redb://database/{db}[/table/{table}[/column/{column}]]
//!   redb://{db}[/{table}[/{column}]]
//!   mcp://{server}/{resource...}
//!   stream://{platform}/{topic...}
//!   webhook://{host}[/{path...}]
//! database[.table[.column]]          legacy dotted form
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    Database {
        database: String,
        table: Option<String>,
        column: Option<String>,
    },
    Mcp {
        server: String,
        resource: String,
    },
    Stream {
        platform: String,
        topic: String,
    },
    Webhook {
        host: String,
        path: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceUriError {
    #[error("resource URI is empty")]
    Empty,

    #[error("unsupported resource protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("malformed resource URI '{uri}': {reason}")]
    Malformed { uri: String, reason: String },
}

fn malformed(uri: &str, reason: impl Into<String>) -> ResourceUriError {
    ResourceUriError::Malformed {
        uri: uri.to_string(),
        reason: reason.into(),
    }
}

impl ResourceUri {
    pub fn parse(input: &str) -> Result<Self, ResourceUriError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ResourceUriError::Empty);
        }
        if input.contains("://") {
            Self::parse_protocol(input)
        } else {
            Self::parse_dotted(input)
        }
    }

    /// Canonical `protocol://` rendering, the form forwarded to the backend.
    pub fn normalize(input: &str) -> Result<String, ResourceUriError> {
        Self::parse(input).map(|uri| uri.to_string())
    }

    pub fn protocol(&self) -> &'static str {
        match self {
            ResourceUri::Database { .. } => "redb",
            ResourceUri::Mcp { .. } => "mcp",
            ResourceUri::Stream { .. } => "stream",
            ResourceUri::Webhook { .. } => "webhook",
        }
    }

    /// Legacy `database[.table[.column]]` rendering; only database addresses have one.
    pub fn to_dotted(&self) -> Option<String> {
        match self {
            ResourceUri::Database { database, table, column } => {
                let mut dotted = database.clone();
                for part in [table, column].into_iter().flatten() {
                    dotted.push('.');
                    dotted.push_str(part);
                }
                Some(dotted)
            }
            _ => None,
        }
    }

    fn parse_protocol(input: &str) -> Result<Self, ResourceUriError> {
        let url = Url::parse(input).map_err(|e| malformed(input, e.to_string()))?;
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| malformed(input, "missing authority"))?
            .to_string();
        let path: Vec<String> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).map(str::to_string).collect())
            .unwrap_or_default();

        match url.scheme() {
            "redb" => {
                let mut segments = Vec::with_capacity(path.len() + 1);
                segments.push(host);
                segments.extend(path);
                Self::database_from_segments(input, segments)
            }
            "mcp" => {
                if path.is_empty() {
                    return Err(malformed(input, "expected mcp://{server}/{resource}"));
                }
                Ok(ResourceUri::Mcp {
                    server: host,
                    resource: path.join("/"),
                })
            }
            "stream" => {
                if path.is_empty() {
                    return Err(malformed(input, "expected stream://{platform}/{topic}"));
                }
                Ok(ResourceUri::Stream {
                    platform: host,
                    topic: path.join("/"),
                })
            }
            "webhook" => Ok(ResourceUri::Webhook {
                host,
                path: path.join("/"),
            }),
            other => Err(ResourceUriError::UnsupportedProtocol(other.to_string())),
        }
    }

    fn database_from_segments(input: &str, mut segments: Vec<String>) -> Result<Self, ResourceUriError> {
        if segments.iter().any(|s| s.contains('%')) {
            return Err(malformed(input, "invalid character in database address"));
        }
        if segments.first().map(String::as_str) == Some("data")
            && segments.get(1).map(String::as_str) == Some("database")
        {
            segments.remove(0);
        }

        if segments.first().map(String::as_str) == Some("database") {
            // Keyed form: database/{db}/table/{table}/column/{column}
            if segments.len() % 2 != 0 {
                return Err(malformed(input, "keyed path segments must come in pairs"));
            }
            let mut database = None;
            let mut table = None;
            let mut column = None;
            for pair in segments.chunks(2) {
                let slot = match (pair[0].as_str(), database.is_some(), table.is_some()) {
                    ("database", false, _) => &mut database,
                    ("table", true, false) => &mut table,
                    ("column", true, true) => &mut column,
                    (key, _, _) => return Err(malformed(input, format!("unexpected segment '{}'", key))),
                };
                if slot.is_some() {
                    return Err(malformed(input, format!("duplicate segment '{}'", pair[0])));
                }
                *slot = Some(pair[1].clone());
            }
            let database = database.ok_or_else(|| malformed(input, "missing database name"))?;
            return Ok(ResourceUri::Database { database, table, column });
        }

        // Short form: {db}/{table}/{column}
        if segments.len() > 3 {
            return Err(malformed(input, "too many path segments"));
        }
        let mut parts = segments.into_iter();
        Ok(ResourceUri::Database {
            database: parts.next().ok_or_else(|| malformed(input, "missing database name"))?,
            table: parts.next(),
            column: parts.next(),
        })
    }

    fn parse_dotted(input: &str) -> Result<Self, ResourceUriError> {
        let parts: Vec<&str> = input.split('.').collect();
        if parts.len() > 3 {
            return Err(malformed(input, "expected database[.table[.column]]"));
        }
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(malformed(input, "empty name in dotted address"));
        }
        if parts.iter().any(|p| p.contains('/') || p.contains(char::is_whitespace)) {
            return Err(malformed(input, "invalid character in dotted address"));
        }
        let mut parts = parts.into_iter().map(str::to_string);
        Ok(ResourceUri::Database {
            database: parts.next().unwrap_or_default(),
            table: parts.next(),
            column: parts.next(),
        })
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceUri::Database { database, table, column } => {
                write!(f, "redb://data/database/{}", database)?;
                if let Some(table) = table {
                    write!(f, "/table/{}", table)?;
                }
                if let Some(column) = column {
                    write!(f, "/column/{}", column)?;
                }
                Ok(())
            }
            ResourceUri::Mcp { server, resource } => write!(f, "mcp://{}/{}", server, resource),
            ResourceUri::Stream { platform, topic } => write!(f, "stream://{}/{}", platform, topic),
            ResourceUri::Webhook { host, path } if path.is_empty() => write!(f, "webhook://{}", host),
            ResourceUri::Webhook { host, path } => write!(f, "webhook://{}/{}", host, path),
        }
    }
}

impl FromStr for ResourceUri {
    type Err = ResourceUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceUri::parse(s)
    }
}
