use std::fmt;
use thiserror::Error;

/// Navigation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`, optionally remembering the artwork the user came back from.
    Listing { previous: Option<u64> },
    /// `/detail/:id`
    Detail { id: u64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("No route matches \"{0}\"")]
    NotFound(String),

    #[error("Invalid artwork id \"{0}\"")]
    InvalidId(String),
}

impl Route {
    pub fn root() -> Self {
        Self::Listing { previous: None }
    }

    /// Resolve a path. The leading slash is optional.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let trimmed = path.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let segments: Vec<&str> = trimmed.split('/').collect();
        match segments.as_slice() {
            ["detail", id] => id
                .parse::<u64>()
                .map(|id| Self::Detail { id })
                .map_err(|_| RouteError::InvalidId(id.to_string())),
            _ => Err(RouteError::NotFound(path.trim().to_string())),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Listing { .. } => "/".to_string(),
            Self::Detail { id } => format!("/detail/{}", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
