use quarto::{LookupFailure, SearchClient};
use std::net::TcpListener;
use std::thread;

/// Spawn a one-shot stub server that answers the next request with the
/// given status and body, and return the endpoint to query.
fn stub_endpoint(status: u16, body: &str) -> String {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start stub server");
    let endpoint = format!("http://{}/books/v1/volumes", server.server_addr());
    let body = body.to_string();

    thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let _ = request.respond(
                tiny_http::Response::from_string(body).with_status_code(status),
            );
        }
    });

    endpoint
}

const ITEMS_BODY: &str = r#"{
    "items": [
        {
            "volumeInfo": {
                "title": "The Master and Margarita",
                "authors": ["Mikhail Bulgakov"],
                "infoLink": "https://books.google.com/books?id=abc",
                "imageLinks": { "thumbnail": "http://books.google.com/thumb.jpg" },
                "description": "The devil visits Moscow."
            }
        },
        {
            "volumeInfo": { "title": "Untitled draft" }
        }
    ]
}"#;

#[test]
fn successful_search_maps_volume_info() {
    let endpoint = stub_endpoint(200, ITEMS_BODY);
    let client = SearchClient::with_endpoint(endpoint, None);

    let outcome = client.search("bulgakov");
    assert!(outcome.failure.is_none());
    assert_eq!(outcome.hits.len(), 2);
    assert_eq!(outcome.hits[0].title, "The Master and Margarita");
    assert_eq!(outcome.hits[0].authors, vec!["Mikhail Bulgakov"]);
    assert_eq!(
        outcome.hits[0].thumbnail.as_deref(),
        Some("https://books.google.com/thumb.jpg")
    );
    assert_eq!(outcome.hits[1].authors, vec!["Unknown"]);
    assert_eq!(outcome.hits[1].info_link, "#");
}

#[test]
fn empty_result_set_is_not_a_failure() {
    let endpoint = stub_endpoint(200, "{}");
    let client = SearchClient::with_endpoint(endpoint, None);

    let outcome = client.search("nothing matches this");
    assert!(outcome.failure.is_none());
    assert!(outcome.hits.is_empty());
}

#[test]
fn forbidden_is_classified_and_soft_failed() {
    let endpoint = stub_endpoint(403, "forbidden");
    let client = SearchClient::with_endpoint(endpoint, Some("bad-key".to_string()));

    let outcome = client.search("dune");
    assert!(outcome.hits.is_empty());
    assert_eq!(outcome.failure, Some(LookupFailure::Forbidden));
}

#[test]
fn rate_limit_is_classified_and_soft_failed() {
    let endpoint = stub_endpoint(429, "slow down");
    let client = SearchClient::with_endpoint(endpoint, None);

    let outcome = client.search("dune");
    assert!(outcome.hits.is_empty());
    assert_eq!(outcome.failure, Some(LookupFailure::RateLimited));
    let message = outcome.failure.unwrap().to_string();
    assert!(message.contains("rate limit"), "got: {}", message);
}

#[test]
fn other_statuses_are_reported_with_their_code() {
    let endpoint = stub_endpoint(500, "boom");
    let client = SearchClient::with_endpoint(endpoint, None);

    let outcome = client.search("dune");
    assert!(outcome.hits.is_empty());
    assert_eq!(outcome.failure, Some(LookupFailure::Unexpected(500)));
}

#[test]
fn malformed_body_yields_empty_hits_not_a_panic() {
    let endpoint = stub_endpoint(200, "this is not json");
    let client = SearchClient::with_endpoint(endpoint, None);

    let outcome = client.search("dune");
    assert!(outcome.hits.is_empty());
    assert!(matches!(outcome.failure, Some(LookupFailure::Other(_))));
}

#[test]
fn refused_connection_is_classified_as_connection_failure() {
    // Bind and immediately drop a listener to get a port nobody serves.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = SearchClient::with_endpoint(
        format!("http://127.0.0.1:{}/books/v1/volumes", port),
        None,
    );

    let outcome = client.search("dune");
    assert!(outcome.hits.is_empty());
    assert_eq!(outcome.failure, Some(LookupFailure::Connection));
}
