use std::sync::Arc;
use std::time::Duration;

use httptest::matchers::{all_of, contains, request, url_decoded};
use httptest::responders::{json_encoded, status_code};
use httptest::{Expectation, Server};
use parking_lot::Mutex;
use secrecy::SecretString;
use serde_json::json;
use tokio::time::sleep;

use address_autocomplete::{
    AddressRecord, AddressSession, AppConfig, FetchError, InputProps, ListDisplay, Phase,
    PlacesService, ResolutionState, SelectionCallback, SuggestionFetcher,
};

type Emitted = Arc<Mutex<Vec<(AddressRecord, Option<String>)>>>;

fn config_for(base: String) -> AppConfig {
    AppConfig {
        api_base_url: base,
        debounce_ms: 20,
        request_timeout_ms: 2_000,
        ..AppConfig::default()
    }
}

fn base_url(server: &Server) -> String {
    format!("http://{}", server.addr())
}

fn session(config: &AppConfig) -> (AddressSession, Emitted) {
    let emitted: Emitted = Arc::new(Mutex::new(Vec::new()));
    let sink = emitted.clone();
    let on_select: SelectionCallback = Arc::new(move |record, id| sink.lock().push((record, id)));
    let places = PlacesService::new(config).expect("places client");
    let session = AddressSession::new(config, places, InputProps::default(), on_select);
    (session, emitted)
}

async fn wait_until(session: &AddressSession, ready: impl Fn(&ResolutionState) -> bool) {
    for _ in 0..150 {
        if ready(&session.state()) {
            return;
        }
        sleep(Duration::from_millis(20)).await;
    }
    panic!("session never reached expected state: {:?}", session.state());
}

#[tokio::test]
async fn search_then_select_resolves_structured_address() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/api/maps"),
            request::query(url_decoded(contains(("query", "10 Main St")))),
        ])
        .respond_with(json_encoded(json!({
            "status": "OK",
            "predictions": [
                { "description": "10 Main St, Springfield, IL, USA", "place_id": "ChIJmain" }
            ]
        }))),
    );
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/api/maps/details"),
            request::query(url_decoded(contains(("placeId", "ChIJmain")))),
        ])
        .respond_with(json_encoded(json!({
            "result": {
                "address_components": [
                    { "long_name": "10", "types": ["street_number"] },
                    { "long_name": "Main Street", "types": ["route"] },
                    { "long_name": "Springfield", "types": ["locality", "political"] },
                    { "long_name": "Illinois", "types": ["administrative_area_level_1", "political"] },
                    { "long_name": "62701", "types": ["postal_code"] },
                    { "long_name": "United States", "types": ["country", "political"] }
                ]
            }
        }))),
    );

    let config = config_for(base_url(&server));
    let (session, emitted) = session(&config);
    session.set_open(true);
    session.input_changed("10 Main St");
    wait_until(&session, |state| !state.suggestions().is_empty()).await;

    let suggestion = session.state().suggestions()[0].clone();
    let record = session.select_suggestion(&suggestion).await.expect("record");

    assert_eq!(record.full_address, "10 Main St, Springfield, IL, USA");
    assert_eq!(record.street, "10 Main Street");
    assert_eq!(record.city, "Springfield");
    assert_eq!(record.state, "Illinois");
    assert_eq!(record.postal_code, "62701");
    assert_eq!(record.country, "United States");

    let emitted = emitted.lock();
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].1.as_deref(), Some("ChIJmain"));
    assert!(!session.state().is_open());
}

#[tokio::test]
async fn upstream_error_status_offers_manual_entry() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/api/maps"))
            .respond_with(status_code(500).body("maps proxy exploded")),
    );

    let config = config_for(base_url(&server));
    let (session, emitted) = session(&config);
    session.input_changed("123 Fake St");
    wait_until(&session, |state| state.phase() == Phase::Failed).await;

    assert_eq!(
        session.view().list,
        ListDisplay::Error {
            message: "Error 500: Failed to fetch address suggestions".into(),
            manual_entry_enabled: true,
        }
    );
    let record = session.manual_entry().expect("manual record");
    assert_eq!(record, AddressRecord::unresolved("123 Fake St").unwrap());
    assert!(emitted.lock()[0].1.is_none());
}

#[tokio::test]
async fn detail_error_status_falls_back_to_description() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/api/maps/details"))
            .respond_with(status_code(502)),
    );

    let config = config_for(base_url(&server));
    let (session, emitted) = session(&config);
    let record = session
        .select("221B Baker Street", Some("ChIJbaker"))
        .await
        .expect("record");

    assert_eq!(record, AddressRecord::unresolved("221B Baker Street").unwrap());
    assert_eq!(emitted.lock().len(), 1);
    assert!(!session.state().loading());
}

#[tokio::test]
async fn configured_api_key_is_sent_as_query_param() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/api/maps"),
            request::query(url_decoded(contains(("key", "test-key")))),
            request::query(url_decoded(contains(("query", "Baker St")))),
        ])
        .respond_with(json_encoded(json!({ "status": "ZERO_RESULTS", "predictions": [] }))),
    );

    let mut config = config_for(base_url(&server));
    config.google_places_api_key = Some(SecretString::from("test-key".to_string()));
    let fetcher = SuggestionFetcher::new(PlacesService::new(&config).unwrap(), 3);
    let suggestions = fetcher.fetch("Baker St").await.unwrap();
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = config_for(format!("http://127.0.0.1:{port}"));
    let fetcher = SuggestionFetcher::new(PlacesService::new(&config).unwrap(), 3);

    let err = fetcher.fetch("Main St").await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
    assert_eq!(err.to_string(), "Failed to connect to address service");
}
