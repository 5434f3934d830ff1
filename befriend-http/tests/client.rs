use befriend_http::{Auth, HttpClient, HttpError, OAuth1Credentials, OAuth1Signer, RequestOpts};
use reqwest::StatusCode;
use serde_json::{Value, json};
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn signer() -> OAuth1Signer {
    OAuth1Signer::new(OAuth1Credentials {
        consumer_key: "ck".into(),
        consumer_secret: "cs".into(),
        access_token: "at".into(),
        access_secret: "as".into(),
    })
}

#[tokio::test]
async fn signed_get_sends_oauth_header_and_encoded_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.1/users/search.json"))
        .and(query_param("q", "rust lang"))
        .and(query_param("page", "0"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let signer = signer();
    let got: Value = client
        .get_json(
            "1.1/users/search.json",
            RequestOpts {
                auth: Some(Auth::OAuth1(&signer)),
                query: Some(vec![("q", "rust lang".into()), ("page", "0".into())]),
                ..Default::default()
            },
        )
        .await
        .expect("search ok");
    assert_eq!(got, json!([{"id": 1}]));

    let received: Vec<Request> = server.received_requests().await.unwrap();
    let req = &received[0];
    assert_eq!(req.url.query(), Some("q=rust%20lang&page=0"));
    let auth = req.headers.get("authorization").unwrap().to_str().unwrap();
    assert!(auth.starts_with("OAuth "));
    assert!(auth.contains("oauth_consumer_key=\"ck\""));
    assert!(auth.contains("oauth_token=\"at\""));
}

#[tokio::test]
async fn post_maps_twitter_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1.1/friendships/create.json"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "errors": [{"code": 88, "message": "Rate limit exceeded"}]
        })))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .post_json::<Value>(
            "1.1/friendships/create.json",
            RequestOpts {
                query: Some(vec![("user_id", "42".into())]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    match err {
        HttpError::Api {
            status,
            code,
            message,
            ..
        } => {
            assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
            assert_eq!(code, Some(88));
            assert_eq!(message, "Rate limit exceeded");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_calls_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<Value>("flaky", RequestOpts::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
}

#[tokio::test]
async fn undecodable_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<Value>("html", RequestOpts::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Decode(_, ref snippet) if snippet.contains("nope")));
}
