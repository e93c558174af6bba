//! Security headers middleware.
//!
//! The Content-Security-Policy is assembled per request: inline scripts are
//! allowed only with the request's [`CspNonce`], and third-party hosts are
//! only listed for the analytics providers that are actually configured.

use axum::{
    extract::{Request, State},
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use crate::config::AnalyticsConfig;
use crate::middleware::CspNonce;
use crate::state::AppState;

const HTMX_ORIGIN: &str = "https://unpkg.com";
const SHOPIFY_CDN: &str = "https://cdn.shopify.com";

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: strict-origin-when-cross-origin`
/// - `Content-Security-Policy` (see [`content_security_policy`])
/// - `Permissions-Policy` denying sensors, camera, microphone and payment
/// - `Cross-Origin-Opener-Policy: same-origin`
/// - `Cache-Control: no-store` unless the handler set its own
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let nonce = request
        .extensions()
        .get::<CspNonce>()
        .map(|n| n.value().to_string())
        .unwrap_or_default();

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    let policy = content_security_policy(&nonce, &state.config().analytics);
    match HeaderValue::from_str(&policy) {
        Ok(value) => {
            headers.insert(CONTENT_SECURITY_POLICY, value);
        }
        Err(e) => tracing::error!(error = %e, "Invalid Content-Security-Policy header"),
    }

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "accelerometer=(), camera=(), geolocation=(), gyroscope=(), \
             magnetometer=(), microphone=(), payment=(), usb=()",
        ),
    );

    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    headers
        .entry(CACHE_CONTROL)
        .or_insert(HeaderValue::from_static("no-store, max-age=0"));

    response
}

/// Build the CSP for one response.
#[must_use]
pub fn content_security_policy(nonce: &str, analytics: &AnalyticsConfig) -> String {
    let mut script_src = vec!["'self'".to_string(), HTMX_ORIGIN.to_string()];
    let mut connect_src = vec!["'self'".to_string()];
    let mut img_src = vec!["'self'".to_string(), "data:".to_string(), SHOPIFY_CDN.to_string()];

    if !nonce.is_empty() {
        script_src.push(format!("'nonce-{nonce}'"));
    }

    if analytics.ga4_measurement_id.is_some() {
        script_src.push("https://www.googletagmanager.com".to_string());
        connect_src.push("https://*.google-analytics.com".to_string());
        img_src.push("https://*.google-analytics.com".to_string());
    }

    if analytics.meta_pixel_id.is_some() {
        script_src.push("https://connect.facebook.net".to_string());
        connect_src.push("https://www.facebook.com".to_string());
        img_src.push("https://www.facebook.com".to_string());
    }

    format!(
        "default-src 'none'; \
         script-src {}; \
         style-src 'self'; \
         font-src 'self'; \
         img-src {}; \
         connect-src {}; \
         frame-src 'none'; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self' https://*.myshopify.com; \
         frame-ancestors 'none'",
        script_src.join(" "),
        img_src.join(" "),
        connect_src.join(" "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_includes_nonce() {
        let policy = content_security_policy("abc123", &AnalyticsConfig::default());
        assert!(policy.contains("script-src 'self' https://unpkg.com 'nonce-abc123';"));
        assert!(policy.contains("img-src 'self' data: https://cdn.shopify.com;"));
        assert!(!policy.contains("googletagmanager"));
    }

    #[test]
    fn test_policy_without_nonce() {
        let policy = content_security_policy("", &AnalyticsConfig::default());
        assert!(!policy.contains("nonce-"));
    }

    #[test]
    fn test_policy_lists_configured_analytics() {
        let analytics = AnalyticsConfig {
            ga4_measurement_id: Some("G-TEST".to_string()),
            meta_pixel_id: Some("123".to_string()),
        };
        let policy = content_security_policy("n", &analytics);
        assert!(policy.contains("https://www.googletagmanager.com"));
        assert!(policy.contains("https://connect.facebook.net"));
        assert!(policy.contains("connect-src 'self' https://*.google-analytics.com https://www.facebook.com;"));
    }
}
