//! End-to-end flows against an in-memory Swift emulator

use std::collections::BTreeMap;
use std::io::Read;
use std::sync::Mutex;

use serde_json::json;
use swc_core::http::{Body, RequestParts};
use swc_core::{
    ContainerCatalog, ContainerType, Credentials, Error, Executor, ListOptions, ObjectListing,
    RawResponse, Request, Transport,
};
use url::Url;

const AUTH_URL: &str = "https://auth.example.test/";
const STORAGE_URL: &str = "https://storage.example.test/v1/AUTH_test/";
const USER: &str = "tester";
const KEY: &str = "s3cret";
const TOKEN: &str = "tk_0123456789";

type Objects = BTreeMap<String, Vec<u8>>;

/// Minimal Swift account: containers of named byte blobs
#[derive(Default)]
struct SwiftEmulator {
    containers: Mutex<BTreeMap<String, Objects>>,
}

fn reply(status: u16, headers: &[(&str, String)], body: &[u8]) -> RawResponse {
    let reason = match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        _ => "Unknown",
    };
    let mut message = format!("HTTP/1.1 {status} {reason}\r\n").into_bytes();
    for (name, value) in headers {
        message.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
    }
    message.extend_from_slice(b"\r\n");
    message.extend_from_slice(body);
    RawResponse::new(message)
}

fn header<'a>(parts: &'a RequestParts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .iter()
        .rev()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

impl SwiftEmulator {
    fn authenticate(&self, parts: &RequestParts) -> RawResponse {
        if header(parts, "X-Auth-User") == Some(USER) && header(parts, "X-Auth-Key") == Some(KEY) {
            reply(
                204,
                &[
                    ("X-Storage-Url", STORAGE_URL.to_string()),
                    ("X-Storage-Token", TOKEN.to_string()),
                ],
                b"",
            )
        } else {
            reply(403, &[], b"")
        }
    }

    fn storage(&self, parts: RequestParts) -> RawResponse {
        if header(&parts, "X-Auth-Token") != Some(TOKEN) {
            return reply(401, &[], b"");
        }

        let query: BTreeMap<String, String> = parts.url.query_pairs().into_owned().collect();
        let path = parts
            .url
            .path()
            .strip_prefix(Url::parse(STORAGE_URL).unwrap().path())
            .unwrap_or_default()
            .to_string();
        let (container, object) = match path.split_once('/') {
            Some((container, object)) => (container.to_string(), object.to_string()),
            None => (path.clone(), String::new()),
        };

        let mut containers = self.containers.lock().unwrap();
        let method = parts.method.as_str().to_string();

        match (method.as_str(), container.is_empty(), object.is_empty()) {
            ("GET", true, _) => {
                let list: Vec<_> = containers
                    .iter()
                    .map(|(name, objects)| {
                        json!({
                            "name": name,
                            "count": objects.len(),
                            "bytes": objects.values().map(Vec::len).sum::<usize>(),
                        })
                    })
                    .collect();
                reply(200, &[], serde_json::to_string(&list).unwrap().as_bytes())
            }
            ("PUT", false, true) => {
                let existed = containers.contains_key(&container);
                containers.entry(container).or_default();
                reply(if existed { 202 } else { 201 }, &[], b"")
            }
            ("HEAD", false, true) => match containers.get(&container) {
                Some(objects) => reply(
                    204,
                    &[
                        ("X-Container-Object-Count", objects.len().to_string()),
                        ("X-Container-Meta-Type", "private".to_string()),
                    ],
                    b"",
                ),
                None => reply(404, &[], b""),
            },
            ("DELETE", false, true) => match containers.get(&container) {
                Some(objects) if !objects.is_empty() => reply(409, &[], b""),
                Some(_) => {
                    containers.remove(&container);
                    reply(204, &[], b"")
                }
                None => reply(404, &[], b""),
            },
            ("GET", false, true) => {
                let Some(objects) = containers.get(&container) else {
                    return reply(404, &[], b"");
                };
                let prefix = query.get("prefix").cloned().unwrap_or_default();
                let limit: usize = query
                    .get("limit")
                    .and_then(|l| l.parse().ok())
                    .unwrap_or(10_000);
                let list: Vec<_> = objects
                    .iter()
                    .filter(|(name, _)| name.starts_with(&prefix))
                    .take(limit)
                    .map(|(name, data)| json!({"name": name, "bytes": data.len()}))
                    .collect();
                if list.is_empty() {
                    reply(204, &[], b"")
                } else {
                    reply(200, &[], serde_json::to_string(&list).unwrap().as_bytes())
                }
            }
            (_, false, false) if !containers.contains_key(&container) => reply(404, &[], b""),
            ("PUT", false, false) => {
                let data = match parts.body {
                    Body::Payload(payload) => {
                        let (mut reader, _) = payload.into_inner();
                        let mut data = Vec::new();
                        reader.read_to_end(&mut data).unwrap();
                        data
                    }
                    _ => Vec::new(),
                };
                containers
                    .get_mut(&container)
                    .unwrap()
                    .insert(object, data);
                reply(201, &[], b"")
            }
            ("GET", false, false) => match containers[&container].get(&object) {
                Some(data) => reply(200, &[("Content-Length", data.len().to_string())], data),
                None => reply(404, &[], b""),
            },
            ("DELETE", false, false) => {
                match containers.get_mut(&container).unwrap().remove(&object) {
                    Some(_) => reply(204, &[], b""),
                    None => reply(404, &[], b""),
                }
            }
            ("COPY", false, false) => {
                let Some(data) = containers[&container].get(&object).cloned() else {
                    return reply(404, &[], b"");
                };
                let destination = header(&parts, "Destination").unwrap_or_default();
                let Some((target, name)) = destination.trim_start_matches('/').split_once('/') else {
                    return reply(412, &[], b"");
                };
                let Some(objects) = containers.get_mut(target) else {
                    return reply(404, &[], b"");
                };
                objects.insert(name.to_string(), data);
                reply(201, &[], b"")
            }
            _ => reply(405, &[], b""),
        }
    }
}

impl Transport for SwiftEmulator {
    fn send(&self, request: Request) -> swc_core::Result<RawResponse> {
        let parts = request.into_parts();
        if parts.url.as_str().starts_with(AUTH_URL) {
            Ok(self.authenticate(&parts))
        } else {
            Ok(self.storage(parts))
        }
    }
}

fn connect() -> ContainerCatalog {
    ContainerCatalog::connect(
        Executor::new(SwiftEmulator::default()),
        &Url::parse(AUTH_URL).unwrap(),
        &Credentials::new(USER, KEY),
    )
    .unwrap()
}

#[test]
fn upload_list_download_delete() {
    let catalog = connect();
    assert_eq!(catalog.session().storage_url().as_str(), STORAGE_URL);
    assert_eq!(catalog.session().token(), TOKEN);

    catalog.create("backups", ContainerType::Private).unwrap();
    let container = catalog
        .select("backups", Some("https://cdn.example.test/backups/"))
        .unwrap();
    assert_eq!(container.info()["x-container-object-count"], "0");

    let uploaded = container
        .upload_content("greeting.txt", "hello", &[])
        .unwrap();
    assert_eq!(
        uploaded.cdn_url.as_deref(),
        Some("https://cdn.example.test/backups/greeting.txt")
    );

    assert_eq!(container.download("greeting.txt").unwrap(), b"hello");

    let options = ListOptions {
        prefix: Some("greeting".into()),
        ..Default::default()
    };
    let objects = container.list(&options).unwrap().into_vec();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].name(), Some("greeting.txt"));
    assert_eq!(objects[0].bytes(), Some(5));

    let outcome = container.delete("greeting.txt").unwrap();
    assert!(outcome.succeeded);
    assert_eq!(outcome.status(), 204);
}

#[test]
fn wrong_key_is_rejected() {
    let result = ContainerCatalog::connect(
        Executor::new(SwiftEmulator::default()),
        &Url::parse(AUTH_URL).unwrap(),
        &Credentials::new(USER, "wrong"),
    );
    assert!(matches!(result, Err(Error::AuthenticationFailed(_))));
}

#[test]
fn listing_shape_follows_limit() {
    let catalog = connect();
    let container = catalog.create("photos", ContainerType::Public).unwrap();
    for name in ["a.jpg", "b.jpg", "c.jpg"] {
        container.upload_content(name, name, &[]).unwrap();
    }

    let single = container
        .list(&ListOptions {
            limit: 1,
            ..Default::default()
        })
        .unwrap();
    match single {
        ObjectListing::Single(Some(object)) => assert_eq!(object.name(), Some("a.jpg")),
        other => panic!("expected a single entry, got {other:?}"),
    }

    let many = container
        .list(&ListOptions {
            limit: 2,
            ..Default::default()
        })
        .unwrap();
    assert!(matches!(many, ObjectListing::Many(ref objects) if objects.len() == 2));

    let nothing = container
        .list(&ListOptions {
            limit: 1,
            prefix: Some("zzz".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(nothing, ObjectListing::Single(None));
}

#[test]
fn missing_object_delete_reports_status() {
    let catalog = connect();
    let container = catalog.create("empty", ContainerType::Private).unwrap();
    let outcome = container.delete("missing.txt").unwrap();
    assert!(!outcome.succeeded);
    assert_eq!(outcome.status(), 404);
}

#[test]
fn copy_within_container() {
    let catalog = connect();
    let container = catalog.create("docs", ContainerType::Private).unwrap();
    container.upload_content("a.txt", "content", &[]).unwrap();

    container.copy("a.txt", "archive/a.txt").unwrap();
    assert_eq!(container.download("archive/a.txt").unwrap(), b"content");

    let failed = container.copy("nope.txt", "b.txt");
    assert!(matches!(failed, Err(Error::CopyFailed { status: 404, .. })));
}

#[test]
fn container_lifecycle() {
    let catalog = connect();
    catalog.create("tmp", ContainerType::Private).unwrap();
    let container = catalog.select("tmp", None).unwrap();
    container.upload_content("x", "1", &[]).unwrap();

    let busy = catalog.delete("tmp").unwrap();
    assert!(!busy.succeeded);
    assert_eq!(busy.status(), 409);

    container.delete("x").unwrap();
    assert!(catalog.delete("tmp").unwrap().succeeded);
    assert!(catalog.delete("tmp").unwrap().succeeded);

    let names: Vec<String> = catalog
        .list(100, "")
        .unwrap()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    assert!(names.is_empty());
    assert!(matches!(
        catalog.select("tmp", None),
        Err(Error::NotFound(_))
    ));
}
