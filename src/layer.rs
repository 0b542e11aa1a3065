use crate::config::HstsConfig;
use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, Response, header},
};
use axum::body::Body;
use futures::future::BoxFuture;
use tower::Service;

/// Build a Tower layer that adds the Strict-Transport-Security header
pub fn build_hsts_layer(config: &HstsConfig) -> Option<HstsLayer> {
    if !config.enabled {
        return None;
    }

    Some(HstsLayer {
        config: config.clone(),
    })
}

/// Attach the HSTS layer to a router, if enabled
pub fn apply_hsts(router: Router, config: &HstsConfig) -> Router {
    match build_hsts_layer(config) {
        Some(layer) => router.layer(layer),
        None => router,
    }
}

/// Tower layer that adds the Strict-Transport-Security header
#[derive(Clone)]
pub struct HstsLayer {
    config: HstsConfig,
}

impl<S> tower::Layer<S> for HstsLayer {
    type Service = HstsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HstsService {
            inner,
            config: self.config.clone(),
        }
    }
}

/// Tower service that adds the Strict-Transport-Security header
#[derive(Clone)]
pub struct HstsService<S> {
    inner: S,
    config: HstsConfig,
}

impl<S> Service<Request> for HstsService<S>
where
    S: Service<Request, Response = Response<Body>> + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let config = self.config.clone();
        let secure = is_secure_request(&req);
        let fut = self.inner.call(req);

        Box::pin(async move {
            let mut response = fut.await?;
            // RFC 6797: the header must not be advertised over plain HTTP
            if secure {
                apply_hsts_header(&mut response, &config);
            } else {
                tracing::trace!("insecure transport, Strict-Transport-Security not set");
            }
            Ok(response)
        })
    }
}

/// Whether the request arrived over a secure transport
///
/// True when the request URI carries an `https` scheme, or when a reverse
/// proxy terminated TLS and set `x-forwarded-proto: https`.
fn is_secure_request(req: &Request) -> bool {
    req.uri()
        .scheme_str()
        .map(|s| s.eq_ignore_ascii_case("https"))
        .unwrap_or(false)
        || req
            .headers()
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.eq_ignore_ascii_case("https"))
            .unwrap_or(false)
}

fn apply_hsts_header<B>(response: &mut Response<B>, config: &HstsConfig) {
    let headers = response.headers_mut();

    // Runs after the inner service completes, so this sees the final
    // header map including anything downstream handlers set
    if headers.contains_key(header::STRICT_TRANSPORT_SECURITY) && !config.overwrite_existing {
        tracing::trace!("existing Strict-Transport-Security header left in place");
        return;
    }

    if let Ok(value) = HeaderValue::from_str(&config.header_value()) {
        // insert replaces any existing values with exactly one
        headers.insert(header::STRICT_TRANSPORT_SECURITY, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn response() -> Response<Body> {
        Response::builder()
            .status(StatusCode::OK)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_disabled_hsts() {
        let config = HstsConfig {
            enabled: false,
            ..Default::default()
        };
        let layer = build_hsts_layer(&config);
        assert!(layer.is_none());
    }

    #[test]
    fn test_enabled_by_default() {
        let layer = build_hsts_layer(&HstsConfig::default());
        assert!(layer.is_some());
    }

    #[test]
    fn test_header_added_when_absent() {
        let config = HstsConfig::default();
        let mut response = response();

        apply_hsts_header(&mut response, &config);

        assert_eq!(
            response.headers().get(header::STRICT_TRANSPORT_SECURITY),
            Some(&HeaderValue::from_static(
                "max-age=2419200; includeSubDomains"
            ))
        );
    }

    #[test]
    fn test_existing_header_left_untouched() {
        let config = HstsConfig::default();
        let mut response = response();
        response.headers_mut().insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=1"),
        );

        apply_hsts_header(&mut response, &config);

        assert_eq!(
            response.headers().get(header::STRICT_TRANSPORT_SECURITY),
            Some(&HeaderValue::from_static("max-age=1"))
        );
    }

    #[test]
    fn test_existing_header_overwritten() {
        let config = HstsConfig::builder().overwrite_existing(true).build();
        let mut response = response();
        response.headers_mut().append(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=1"),
        );
        response.headers_mut().append(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=2"),
        );

        apply_hsts_header(&mut response, &config);

        let values: Vec<_> = response
            .headers()
            .get_all(header::STRICT_TRANSPORT_SECURITY)
            .iter()
            .collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0], &config.header_value());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let config = HstsConfig::default();
        let mut response = response();

        apply_hsts_header(&mut response, &config);
        apply_hsts_header(&mut response, &config);

        let values: Vec<_> = response
            .headers()
            .get_all(header::STRICT_TRANSPORT_SECURITY)
            .iter()
            .collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0], "max-age=2419200; includeSubDomains");
    }

    fn request(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_https_scheme_is_secure() {
        assert!(is_secure_request(&request("https://example.com/")));
    }

    #[test]
    fn test_http_scheme_is_insecure() {
        assert!(!is_secure_request(&request("http://example.com/")));
        assert!(!is_secure_request(&request("/")));
    }

    #[test]
    fn test_forwarded_proto_is_secure() {
        let req = Request::builder()
            .uri("/")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap();
        assert!(is_secure_request(&req));

        let req = Request::builder()
            .uri("/")
            .header("x-forwarded-proto", "HTTPS")
            .body(Body::empty())
            .unwrap();
        assert!(is_secure_request(&req));

        let req = Request::builder()
            .uri("/")
            .header("x-forwarded-proto", "http")
            .body(Body::empty())
            .unwrap();
        assert!(!is_secure_request(&req));
    }
}
