//! Integration tests for the REST client, pagination, CRUD and provider
//! handlers using wiremock
//!
//! Every test runs against a local mock server standing in for one service
//! endpoint, so URLs, envelopes, allow-lists and paging are exercised over
//! real HTTP.

use ecl_provider::ecl::auth::Credentials;
use ecl_provider::ecl::client::{Service, ServiceClient};
use ecl_provider::ecl::http::{EclHttpClient, RequestOpts};
use ecl_provider::ecl::Error;
use ecl_provider::provider::{Provider, ProviderContext};
use ecl_provider::resource::{Crud, WaitOpts};
use ecl_provider::services::{compute, dns, network, storage};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TENANT: &str = "0123456789abcdef0123456789abcdef";
const TOKEN: &str = "test-token";

fn client(server: &MockServer, service: Service) -> ServiceClient {
    ServiceClient::new(
        service,
        &server.uri(),
        Some(TENANT),
        EclHttpClient::new().expect("HTTP client should build"),
        Credentials::from_token(TOKEN),
    )
}

fn fast_wait() -> WaitOpts {
    WaitOpts::new(Duration::from_secs(5), Duration::from_millis(10))
}

fn attrs(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("attributes must be an object")
}

/// Test module for the generic HTTP client and allow-lists
mod http_client_tests {
    use super::*;

    /// GET sends the auth token and decodes the singular envelope
    #[tokio::test]
    async fn test_get_sends_token_and_extracts_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2.0/public_ips/ip-1"))
            .and(header("X-Auth-Token", TOKEN))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_ip": {
                    "id": "ip-1",
                    "cidr": "203.0.113.16",
                    "submask_length": 28,
                    "internet_gw_id": "gw-1",
                    "status": "ACTIVE"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let c = client(&server, Service::Network);
        let ip = Crud::<network::public_ips::PublicIp>::new(&c)
            .get("ip-1")
            .await
            .expect("GET should succeed");

        assert_eq!(ip.cidr, "203.0.113.16");
        assert_eq!(ip.submask_length, 28);
        assert_eq!(ip.internet_gw_id, "gw-1");
    }

    /// A status outside the allow-list yields the exact status and raw body
    #[tokio::test]
    async fn test_unexpected_status_keeps_raw_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2.0/public_ips/ip-1"))
            .respond_with(ResponseTemplate::new(409).set_body_string("conflict: gateway busy"))
            .mount(&server)
            .await;

        let c = client(&server, Service::Network);
        let err = Crud::<network::public_ips::PublicIp>::new(&c)
            .get("ip-1")
            .await
            .unwrap_err();

        match err {
            Error::UnexpectedStatus {
                method,
                status,
                body,
                expected,
                ..
            } => {
                assert_eq!(method, "GET");
                assert_eq!(status, 409);
                assert_eq!(body, "conflict: gateway busy");
                assert_eq!(expected, vec![200]);
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    /// A 200 on create is rejected when the verb default is [201, 202]
    #[tokio::test]
    async fn test_post_default_allow_list_rejects_200() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2.0/public_ips"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_ip": {"id": "ip-1"}
            })))
            .mount(&server)
            .await;

        let c = client(&server, Service::Network);
        let opts = network::public_ips::CreateOpts {
            internet_gw_id: "gw-1".to_string(),
            submask_length: 28,
            ..Default::default()
        };
        let err = Crud::<network::public_ips::PublicIp>::new(&c)
            .create(&opts)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(200));
        assert!(matches!(err, Error::UnexpectedStatus { ref expected, .. } if expected == &[201, 202]));
    }

    /// Network updates answer 200, accepted through the descriptor override
    #[tokio::test]
    async fn test_update_override_accepts_200() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v2.0/networks/net-1"))
            .and(body_json(json!({"network": {"name": "renamed"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "network": {"id": "net-1", "name": "renamed", "status": "ACTIVE"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let c = client(&server, Service::Network);
        let opts = network::networks::UpdateOpts {
            name: Some("renamed".to_string()),
            ..Default::default()
        };
        let updated = Crud::<network::networks::Network>::new(&c)
            .update("net-1", &opts)
            .await
            .expect("update should succeed");

        assert_eq!(updated.name, "renamed");
    }

    /// Explicit OkCodes on a raw request override the verb default
    #[tokio::test]
    async fn test_per_call_ok_codes() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v2/zones/z1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let c = client(&server, Service::Dns);
        let url = c.service_url(&["zones", "z1"]);

        let err = c.delete(&url, RequestOpts::new()).await.unwrap_err();
        assert_eq!(err.status(), Some(200));

        let ok = c
            .delete(&url, RequestOpts::new().ok_codes(&[200, 202, 204]))
            .await
            .expect("200 is allowed explicitly");
        assert_eq!(ok.status, 200);
    }

    /// A body without the expected envelope key is an error, not a zeroed struct
    #[tokio::test]
    async fn test_missing_envelope_key() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2.0/public_ips/ip-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_ips": {"id": "ip-1"}
            })))
            .mount(&server)
            .await;

        let c = client(&server, Service::Network);
        let err = Crud::<network::public_ips::PublicIp>::new(&c)
            .get("ip-1")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MissingEnvelopeKey { ref key } if key == "public_ip"));
    }
}

/// Test module for pagination over real responses
mod pagination_tests {
    use super::*;

    /// Items of every page are concatenated in order; the empty page ends the walk
    #[tokio::test]
    async fn test_rel_links_visit_each_page_once() {
        let server = MockServer::start().await;
        let base = format!("{}/v2.0/public_ips", server.uri());

        Mock::given(method("GET"))
            .and(path("/v2.0/public_ips"))
            .and(query_param_is_missing("marker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_ips": [{"id": "a"}, {"id": "b"}],
                "public_ips_links": [{"href": format!("{}?marker=b", base), "rel": "next"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2.0/public_ips"))
            .and(query_param("marker", "b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_ips": [{"id": "c"}],
                "public_ips_links": [{"href": format!("{}?marker=c", base), "rel": "next"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2.0/public_ips"))
            .and(query_param("marker", "c"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_ips": [],
                "public_ips_links": [{"href": format!("{}?marker=d", base), "rel": "next"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let c = client(&server, Service::Network);
        let ips = Crud::<network::public_ips::PublicIp>::new(&c)
            .list_all(&network::public_ips::ListOpts::default())
            .await
            .expect("listing should succeed");

        let ids: Vec<&str> = ips.iter().map(|ip| ip.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    /// Pages are visited lazily; declining stops before the next fetch
    #[tokio::test]
    async fn test_each_page_stops_when_handler_declines() {
        let server = MockServer::start().await;
        let base = format!("{}/v2.0/public_ips", server.uri());

        Mock::given(method("GET"))
            .and(path("/v2.0/public_ips"))
            .and(query_param_is_missing("marker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_ips": [{"id": "a"}, {"id": "b"}],
                "public_ips_links": [{"href": format!("{}?marker=b", base), "rel": "next"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2.0/public_ips"))
            .and(query_param("marker", "b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_ips": [{"id": "c"}],
                "public_ips_links": [{"href": format!("{}?marker=c", base), "rel": "next"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2.0/public_ips"))
            .and(query_param("marker", "c"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"public_ips": [{"id": "d"}]})))
            .expect(0)
            .mount(&server)
            .await;

        let c = client(&server, Service::Network);
        let pager = assert_ok!(
            Crud::<network::public_ips::PublicIp>::new(&c).list(&network::public_ips::ListOpts::default())
        );

        let mut visited = 0;
        let mut ids = Vec::new();
        assert_ok!(
            pager
                .each_page(|page| {
                    visited += 1;
                    let items = page.extract::<network::public_ips::PublicIp>()?;
                    ids.extend(items.into_iter().map(|ip| ip.id));
                    Ok(visited < 2)
                })
                .await
        );

        assert_eq!(visited, 2);
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    /// DNS returns root objects and a relative `links.next`
    #[tokio::test]
    async fn test_next_field_relative_link() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/zones"))
            .and(query_param_is_missing("marker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "zones": [{"id": "z1", "name": "example.com."}],
                "links": {"self": "/v2/zones", "next": "/v2/zones?marker=z1"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/zones"))
            .and(query_param("marker", "z1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "zones": [{"id": "z2", "name": "example.net."}],
                "links": {"self": "/v2/zones?marker=z1"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let c = client(&server, Service::Dns);
        let zones = Crud::<dns::zones::Zone>::new(&c)
            .list_all(&dns::zones::ListOpts::default())
            .await
            .expect("listing should succeed");

        let names: Vec<&str> = zones.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, vec!["example.com.", "example.net."]);
    }

    /// A next link pointing back at the current page stops the walk
    #[tokio::test]
    async fn test_self_referencing_next_link_terminates() {
        let server = MockServer::start().await;
        let url = format!("{}/v2.0/networks", server.uri());

        Mock::given(method("GET"))
            .and(path("/v2.0/networks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "networks": [{"id": "n1", "name": "front"}],
                "networks_links": [{"href": url, "rel": "next"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let c = client(&server, Service::Network);
        let networks = Crud::<network::networks::Network>::new(&c)
            .list_all(&network::networks::ListOpts::default())
            .await
            .expect("listing should succeed");

        assert_eq!(networks.len(), 1);
    }

    /// A failing page ends the walk with that error
    #[tokio::test]
    async fn test_page_error_aborts_listing() {
        let server = MockServer::start().await;
        let base = format!("{}/v2.0/subnets", server.uri());

        Mock::given(method("GET"))
            .and(path("/v2.0/subnets"))
            .and(query_param_is_missing("marker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "subnets": [{"id": "s1", "network_id": "n1", "cidr": "10.0.0.0/24"}],
                "subnets_links": [{"href": format!("{}?marker=s1", base), "rel": "next"}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2.0/subnets"))
            .and(query_param("marker", "s1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let c = client(&server, Service::Network);
        let err = Crud::<network::subnets::Subnet>::new(&c)
            .list_all(&network::subnets::ListOpts::default())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
    }

    /// List items wrapped once more are unwrapped
    #[tokio::test]
    async fn test_keypair_items_are_unwrapped() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v2/{}/os-keypairs", TENANT)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "keypairs": [
                    {"keypair": {"name": "deploy", "fingerprint": "aa:bb"}},
                    {"keypair": {"name": "ops", "fingerprint": "cc:dd"}}
                ]
            })))
            .mount(&server)
            .await;

        let c = client(&server, Service::Compute);
        let keypairs = compute::keypairs::list_all(&c).await.expect("listing should succeed");

        let names: Vec<&str> = keypairs.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["deploy", "ops"]);
    }
}

/// Test module for status polling over HTTP
mod polling_tests {
    use super::*;

    #[tokio::test]
    async fn test_volume_becomes_available() {
        let server = MockServer::start().await;
        let volume_path = format!("/v1.0/{}/volumes/vol-1", TENANT);

        Mock::given(method("GET"))
            .and(path(volume_path.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "volume": {"id": "vol-1", "size": 100, "status": "creating"}
            })))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(volume_path.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "volume": {"id": "vol-1", "size": 100, "status": "available"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let c = client(&server, Service::Storage);
        storage::volumes::wait_for_status(&c, "vol-1", "available", fast_wait())
            .await
            .expect("volume should become available");
    }

    #[tokio::test]
    async fn test_volume_wait_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v2/{}/volumes/vol-1", TENANT)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "volume": {"id": "vol-1", "size": 10, "status": "creating"}
            })))
            .mount(&server)
            .await;

        let c = client(&server, Service::BlockStorage);
        let opts = WaitOpts::new(Duration::from_millis(100), Duration::from_millis(20));
        let err = compute::volumes::wait_for_status(&c, "vol-1", "available", opts)
            .await
            .unwrap_err();

        match err {
            Error::Timeout { target, last, .. } => {
                assert_eq!(target, "available");
                assert_eq!(last, "creating");
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_get_error_aborts_wait() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v1.0/{}/virtual_storages/vs-1", TENANT)))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let c = client(&server, Service::Storage);
        let err = storage::virtual_storages::wait_for_status(&c, "vs-1", "available", fast_wait())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
    }
}

/// Test module for provider handlers
mod provider_tests {
    use super::*;

    fn provider(server: &MockServer, services: &[Service]) -> Provider {
        let clients: BTreeMap<Service, ServiceClient> =
            services.iter().map(|s| (*s, client(server, *s))).collect();
        Provider::new(ProviderContext::new(clients, fast_wait()))
    }

    /// Create posts the wrapped body, waits for ACTIVE and reads computed attributes
    #[tokio::test]
    async fn test_create_public_ip() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2.0/public_ips"))
            .and(body_json(json!({
                "public_ip": {"internet_gw_id": "gw-1", "submask_length": 28, "name": "web"}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "public_ip": {"id": "ip-1", "status": "PENDING_CREATE", "internet_gw_id": "gw-1"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2.0/public_ips/ip-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_ip": {
                    "id": "ip-1",
                    "name": "web",
                    "cidr": "203.0.113.16",
                    "submask_length": 28,
                    "internet_gw_id": "gw-1",
                    "status": "ACTIVE",
                    "tenant_id": TENANT
                }
            })))
            .mount(&server)
            .await;

        let p = provider(&server, &[Service::Network]);
        let data = p
            .create(
                "ecl_network_public_ip_v2",
                attrs(json!({"internet_gw_id": "gw-1", "submask_length": 28, "name": "web"})),
            )
            .await
            .expect("create should succeed");

        assert_eq!(data.id(), Some("ip-1"));
        assert_eq!(data.get_str("cidr"), Some("203.0.113.16"));
        assert_eq!(data.get_str("status"), Some("ACTIVE"));
    }

    /// Invalid configuration fails before any request
    #[tokio::test]
    async fn test_create_rejects_invalid_config() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let p = provider(&server, &[Service::Network]);
        let err = p
            .create(
                "ecl_network_public_ip_v2",
                attrs(json!({"submask_length": "28", "cidr": "203.0.113.0"})),
            )
            .await
            .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("internet_gw_id"), "{message}");
        assert!(message.contains("submask_length"), "{message}");
        assert!(message.contains("cidr"), "{message}");
    }

    /// A read hitting 404 reports the resource as gone
    #[tokio::test]
    async fn test_read_not_found_clears_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v1.0/{}/volumes/vol-1", TENANT)))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let p = provider(&server, &[Service::Storage]);
        let data = p
            .read("ecl_storage_volume_v1", "vol-1", Map::new())
            .await
            .expect("a missing resource is not an error");

        assert!(data.is_none());
    }

    /// Changing a force-new attribute is refused without calling the API
    #[tokio::test]
    async fn test_update_refuses_force_new_change() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2.0/public_ips/ip-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_ip": {"id": "ip-1", "submask_length": 28, "internet_gw_id": "gw-1", "status": "ACTIVE"}
            })))
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let p = provider(&server, &[Service::Network]);
        let err = p
            .update("ecl_network_public_ip_v2", "ip-1", attrs(json!({"submask_length": 29})))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("requires replacing"), "{err}");
    }

    /// Only changed attributes are sent, with the PATCH verb for zones
    #[tokio::test]
    async fn test_update_zone_sends_changed_attributes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/zones/z1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "z1", "name": "example.com.", "ttl": 3600, "email": "ops@example.com", "status": "ACTIVE"
            })))
            .mount(&server)
            .await;

        Mock::given(method("PATCH"))
            .and(path("/v2/zones/z1"))
            .and(body_json(json!({"ttl": 300})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "id": "z1", "name": "example.com.", "ttl": 300, "status": "PENDING"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let p = provider(&server, &[Service::Dns]);
        p.update("ecl_dns_zone_v2", "z1", attrs(json!({"ttl": 300})))
            .await
            .expect("update should succeed");
    }

    /// Renaming works although the API never returns image and flavor refs
    #[tokio::test]
    async fn test_rename_instance() {
        let server = MockServer::start().await;
        let server_path = format!("/v2/{}/servers/s1", TENANT);

        Mock::given(method("GET"))
            .and(path(server_path.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "server": {"id": "s1", "name": "old", "status": "ACTIVE", "image": {"id": "img-1"}, "metadata": {}}
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path(server_path.as_str()))
            .and(body_json(json!({"server": {"name": "new"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "server": {"id": "s1", "name": "new", "status": "ACTIVE"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(server_path.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "server": {"id": "s1", "name": "new", "status": "ACTIVE", "image": {"id": "img-1"}, "metadata": {}}
            })))
            .mount(&server)
            .await;

        let p = provider(&server, &[Service::Compute]);
        let data = assert_ok!(
            p.update("ecl_compute_instance_v2", "s1", attrs(json!({"name": "new"})))
                .await
        );

        assert_eq!(data.id(), Some("s1"));
        assert_eq!(data.get_str("name"), Some("new"));
    }

    /// A new image ref is refused even though the API never reports the old one
    #[tokio::test]
    async fn test_update_refuses_new_image_ref() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v2/{}/servers/s1", TENANT)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "server": {"id": "s1", "name": "old", "status": "ACTIVE", "image": {"id": "img-1"}}
            })))
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let p = provider(&server, &[Service::Compute]);
        let err = assert_err!(
            p.update(
                "ecl_compute_instance_v2",
                "s1",
                attrs(json!({"name": "new", "image_ref": "OTHER-IMAGE", "flavor_ref": "OTHER-FLAVOR"})),
            )
            .await
        );

        let message = err.to_string();
        assert!(message.contains("image_ref"), "{message}");
        assert!(message.contains("requires replacing"), "{message}");
    }

    /// The zone id locates a record set; the PUT carries only the new records
    #[tokio::test]
    async fn test_update_nested_recordset() {
        let server = MockServer::start().await;
        let recordset = json!({
            "id": "r1",
            "zone_id": "z1",
            "name": "www.example.com.",
            "type": "A",
            "records": ["192.0.2.1"],
            "ttl": 3600,
            "status": "ACTIVE"
        });

        Mock::given(method("GET"))
            .and(path("/v2/zones/z1/recordsets/r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(recordset.clone()))
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/v2/zones/z1/recordsets/r1"))
            .and(body_json(json!({"records": ["192.0.2.2"]})))
            .respond_with(ResponseTemplate::new(202).set_body_json(recordset))
            .expect(1)
            .mount(&server)
            .await;

        let p = provider(&server, &[Service::Dns]);
        assert_ok!(
            p.update(
                "ecl_dns_recordset_v2",
                "r1",
                attrs(json!({"zone_id": "z1", "records": ["192.0.2.2"]})),
            )
            .await
        );
    }

    /// Delete waits until the API answers 404
    #[tokio::test]
    async fn test_delete_waits_for_removal() {
        let server = MockServer::start().await;
        let ip_path = "/v2.0/public_ips/ip-1";

        Mock::given(method("DELETE"))
            .and(path(ip_path))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(ip_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_ip": {"id": "ip-1", "status": "PENDING_DELETE"}
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(ip_path))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let p = provider(&server, &[Service::Network]);
        p.delete("ecl_network_public_ip_v2", "ip-1", Map::new())
            .await
            .expect("delete should succeed");
    }

    /// Record sets are listed under their zone
    #[tokio::test]
    async fn test_list_nested_recordsets() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/zones/z1/recordsets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "recordsets": [
                    {"id": "r1", "zone_id": "z1", "name": "www.example.com.", "type": "A", "records": ["192.0.2.1"]}
                ],
                "links": {"self": "/v2/zones/z1/recordsets"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let p = provider(&server, &[Service::Dns]);
        let items = p
            .list("ecl_dns_recordset_v2", &attrs(json!({"zone_id": "z1"})))
            .await
            .expect("listing should succeed");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id(), Some("r1"));
        assert_eq!(items[0].get_str("type"), Some("A"));
    }

    /// Data sources must resolve to exactly one object
    #[tokio::test]
    async fn test_data_source_lookup() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2.0/fic_gateways"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "fic_gateways": [
                    {"id": "fic-1", "name": "osaka", "status": "ACTIVE", "qos_option_id": "q1"},
                    {"id": "fic-2", "name": "tokyo", "status": "ACTIVE", "qos_option_id": "q1"}
                ]
            })))
            .mount(&server)
            .await;

        let p = provider(&server, &[Service::Network]);

        let found = p
            .read_data_source("ecl_network_fic_gateway_v2", attrs(json!({"name": "tokyo"})))
            .await
            .expect("exactly one gateway matches");
        assert_eq!(found.id(), Some("fic-2"));
        assert_eq!(found.get_str("qos_option_id"), Some("q1"));

        let err = p
            .read_data_source("ecl_network_fic_gateway_v2", attrs(json!({"qos_option_id": "q1"})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("more than one result"), "{err}");

        let err = p
            .read_data_source("ecl_network_fic_gateway_v2", attrs(json!({"name": "nagoya"})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no results"), "{err}");
    }
}
