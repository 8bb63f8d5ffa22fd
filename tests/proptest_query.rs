//! Property-based tests using proptest
//!
//! These tests verify query-string encoding, URL builders, tenant validation
//! and list pagination using randomized inputs.

use ecl_provider::ecl::auth::{validate_tenant_id, Credentials};
use ecl_provider::ecl::client::{Service, ServiceClient};
use ecl_provider::ecl::http::EclHttpClient;
use ecl_provider::ecl::query::{build_query, with_query};
use ecl_provider::resource::Crud;
use ecl_provider::services::{network, storage};
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeMap;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(endpoint: &str, service: Service) -> ServiceClient {
    ServiceClient::new(
        service,
        endpoint,
        Some("0123456789abcdef0123456789abcdef"),
        EclHttpClient::new().unwrap(),
        Credentials::from_token("t"),
    )
}

/// Generate arbitrary filter maps with printable values
fn arb_filters() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z_]{1,12}", "[ -~]{0,24}", 0..8)
}

/// Generate pages of ids, every page non-empty
fn arb_pages() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec("[a-z0-9]{1,8}", 1..5), 1..5)
}

fn decode_pairs(query: &str) -> Vec<(String, String)> {
    let parsed = url::Url::parse(&format!("https://x/{}", query)).unwrap();
    parsed.query_pairs().into_owned().collect()
}

proptest! {
    /// Every filter comes back verbatim after percent-decoding
    #[test]
    fn query_round_trips_through_url_parser(filters in arb_filters()) {
        let query = build_query(&filters).unwrap();

        if filters.is_empty() {
            prop_assert_eq!(query, "");
        } else {
            prop_assert!(query.starts_with('?'));
            let expected: Vec<(String, String)> = filters.into_iter().collect();
            prop_assert_eq!(decode_pairs(&query), expected);
        }
    }

    /// Lists repeat their key once per element
    #[test]
    fn query_lists_repeat_key(values in prop::collection::vec("[a-z0-9]{1,10}", 1..6)) {
        let query = build_query(&json!({"tags": values.clone()})).unwrap();
        let pairs = decode_pairs(&query);

        prop_assert_eq!(pairs.len(), values.len());
        for ((key, got), want) in pairs.iter().zip(&values) {
            prop_assert_eq!(key, "tags");
            prop_assert_eq!(got, want);
        }
    }

    /// Appending to a URL that already has a query keeps a single `?`
    #[test]
    fn with_query_keeps_one_question_mark(filters in arb_filters()) {
        let url = with_query("https://x/v2/zones?limit=10", &filters).unwrap();
        prop_assert_eq!(url.matches('?').count(), 1);
        prop_assert!(url.starts_with("https://x/v2/zones?limit=10"));
    }

    /// URL builders are pure and distinguish list from single-resource paths
    #[test]
    fn url_builders_are_pure(id in "[A-Za-z0-9-]{1,36}") {
        let c = client("https://storage.example.test", Service::Storage);
        let crud = Crud::<storage::volumes::Volume>::new(&c);

        prop_assert_eq!(crud.resource_url(&id), crud.resource_url(&id));
        let expected_suffix = format!("/volumes/{}", id);
        prop_assert!(crud.resource_url(&id).ends_with(&expected_suffix));
        prop_assert_eq!(crud.list_url(), crud.list_url());
        prop_assert!(crud.list_url().ends_with("/volumes/detail"));
    }

    /// Tenant ids are exactly 32 lowercase hex characters
    #[test]
    fn tenant_validation_accepts_lowercase_hex(tenant in "[0-9a-f]{32}") {
        prop_assert!(validate_tenant_id(&tenant));
        prop_assert!(!validate_tenant_id(&tenant.to_uppercase()) || tenant.chars().all(|c| c.is_ascii_digit()));
        prop_assert!(!validate_tenant_id(&tenant[1..]));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Listing returns the concatenation of every page, visiting each page once
    #[test]
    fn pagination_concatenates_pages(pages in arb_pages()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();

        let ids = runtime.block_on(async {
            let server = MockServer::start().await;
            let base = format!("{}/v2.0/public_ips", server.uri());

            for (n, page) in pages.iter().enumerate() {
                let items: Vec<_> = page.iter().map(|id| json!({"id": id})).collect();
                let mut body = json!({"public_ips": items});
                if n + 1 < pages.len() {
                    body["public_ips_links"] = json!([
                        {"href": format!("{}?page={}", base, n + 1), "rel": "next"}
                    ]);
                }

                let mock = Mock::given(method("GET")).and(path("/v2.0/public_ips"));
                let mock = if n == 0 {
                    mock.and(query_param_is_missing("page"))
                } else {
                    mock.and(query_param("page", n.to_string()))
                };
                mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
                    .expect(1)
                    .mount(&server)
                    .await;
            }

            let c = client(&server.uri(), Service::Network);
            let ips = Crud::<network::public_ips::PublicIp>::new(&c)
                .list_all(&network::public_ips::ListOpts::default())
                .await
                .unwrap();
            server.verify().await;
            ips.into_iter().map(|ip| ip.id).collect::<Vec<_>>()
        });

        let expected: Vec<String> = pages.into_iter().flatten().collect();
        prop_assert_eq!(ids, expected);
    }
}
