//! Cookie plumbing shared by the gateway and the OTP endpoints.
//!
//! Two cookies exist in this system: the HttpOnly session cookie that
//! carries the signed token, and a short-lived marker the gateway sets
//! when it bounces an authenticated user off an auth page. Both are
//! described by a [`CookieConfig`].

use std::fmt;

use axum::http::{HeaderMap, HeaderValue, header};

/// SameSite attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        })
    }
}

/// Attributes for one named cookie.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "auth_session".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// Config for a short-lived marker cookie.
    ///
    /// Not HttpOnly: the marker exists to be read by frontend script,
    /// and it carries no authorization weight.
    pub fn ephemeral(name: impl Into<String>, max_age_secs: i64) -> Self {
        Self {
            name: name.into(),
            http_only: false,
            max_age_secs: Some(max_age_secs),
            ..Default::default()
        }
    }

    /// Render a `Set-Cookie` value for this cookie.
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut attrs = vec![format!("{}={}", self.name, value)];
        if self.http_only {
            attrs.push("HttpOnly".to_string());
        }
        if self.secure {
            attrs.push("Secure".to_string());
        }
        attrs.push(format!("SameSite={}", self.same_site));
        attrs.push(format!("Path={}", self.path));
        if let Some(max_age) = self.max_age_secs {
            attrs.push(format!("Max-Age={max_age}"));
        }
        attrs.join("; ")
    }
}

/// Pull one cookie's value out of a request's `Cookie` header.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in raw.split(';') {
        if let Some((key, value)) = pair.trim().split_once('=')
            && key == name
        {
            return Some(value.to_string());
        }
    }
    None
}

/// [`CookieConfig::build_set_cookie`] as a ready [`HeaderValue`].
pub fn set_cookie_header(config: &CookieConfig, value: &str) -> HeaderValue {
    HeaderValue::from_str(&config.build_set_cookie(value))
        .unwrap_or_else(|_| HeaderValue::from_static(""))
}
