use std::{
    fmt::Debug,
    io::{self, BufReader, BufWriter},
    path::PathBuf,
};

use fs_err::File;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Cookies of a logged-in browser session, persisted between runs.
#[derive(Default, Serialize, Deserialize)]
pub struct CookieStore {
    pub cookies: Vec<StoredCookie>,
}
impl Debug for CookieStore {
    // Cookie values are credentials; only their names are shown.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieStore")
            .field(
                "cookies",
                &self.cookies.iter().map(|c| &c.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[derive(Clone, PartialEq, Debug, TypedBuilder, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[builder(default = "/".to_owned())]
    pub path: String,
    /// Seconds since the epoch; `None` for session cookies.
    #[builder(default)]
    #[serde(default)]
    pub expires: Option<f64>,
    #[builder(default)]
    #[serde(default)]
    pub http_only: bool,
    #[builder(default)]
    #[serde(default)]
    pub secure: bool,
}

impl CookieStore {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CookieStoreLoadError> {
        Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
    }

    pub fn save(&self, path: impl Into<PathBuf>) -> std::io::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CookieStoreLoadError {
    #[error("Cookie store was not found.")]
    NotFound,
    #[error("An I/O error occurred when loading the cookie store: {0:?}")]
    IOError(io::Error),
    #[error("The cookie store json file is corrupted and could not be loaded: {0:?}")]
    JsonError(#[from] serde_json::Error),
}
impl From<io::Error> for CookieStoreLoadError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::IOError(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CookieStore, CookieStoreLoadError, StoredCookie};

    #[test]
    fn test_missing_file() {
        let res = CookieStore::load("this/path/does/not/exist/linkedin.auth.json");
        assert!(matches!(res, Err(CookieStoreLoadError::NotFound)));
    }

    #[test]
    fn test_cookie_json() {
        let cookie = StoredCookie::builder()
            .name("li_at".to_owned())
            .value("secret".to_owned())
            .domain(".www.linkedin.com".to_owned())
            .secure(true)
            .build();
        let json = serde_json::to_string(&cookie).unwrap();
        assert_eq!(
            json,
            r#"{"name":"li_at","value":"secret","domain":".www.linkedin.com","path":"/","expires":null,"httpOnly":false,"secure":true}"#
        );
        let store: CookieStore = serde_json::from_str(
            r#"{"cookies":[{"name":"JSESSIONID","value":"v","domain":".linkedin.com","path":"/"}]}"#,
        )
        .unwrap();
        assert_eq!(store.cookies[0].expires, None);
        assert!(!store.cookies[0].http_only);
        assert_eq!(format!("{store:?}"), r#"CookieStore { cookies: ["JSESSIONID"] }"#);
    }
}
