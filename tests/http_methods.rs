use burl::{HttpMethod, Request};
use httpmock::Method::{DELETE, GET, PATCH, POST, PUT};
use httpmock::MockServer;

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn execute_with_method(server: &MockServer, method: HttpMethod) {
    let mock = server.mock(|when, then| {
        let when = match method {
            HttpMethod::Get => when.method(GET),
            HttpMethod::Post => when.method(POST),
            HttpMethod::Put => when.method(PUT),
            HttpMethod::Patch => when.method(PATCH),
            HttpMethod::Delete => when.method(DELETE),
            _ => panic!("unexpected method in test"),
        };
        when.path("/resource");
        then.status(200).body("ok");
    });

    let request = Request::new()
        .url(&server.url("/resource"))
        .expect("valid url")
        .method(method)
        .execute()
        .expect("request should succeed");
    assert_eq!(request.response_code().expect("settled"), 200);
    assert_eq!(request.response_body().expect("settled"), "ok");

    mock.assert();
}

#[test]
fn test_get_request() {
    if !can_bind_localhost() {
        return;
    }
    execute_with_method(&MockServer::start(), HttpMethod::Get);
}

#[test]
fn test_post_request() {
    if !can_bind_localhost() {
        return;
    }
    execute_with_method(&MockServer::start(), HttpMethod::Post);
}

#[test]
fn test_put_request() {
    if !can_bind_localhost() {
        return;
    }
    execute_with_method(&MockServer::start(), HttpMethod::Put);
}

#[test]
fn test_patch_request() {
    if !can_bind_localhost() {
        return;
    }
    execute_with_method(&MockServer::start(), HttpMethod::Patch);
}

#[test]
fn test_delete_request() {
    if !can_bind_localhost() {
        return;
    }
    execute_with_method(&MockServer::start(), HttpMethod::Delete);
}

#[test]
fn test_delete_sends_params_in_query() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE).path("/item").query_param("id", "7");
        then.status(204);
    });

    let request = Request::new()
        .url(&server.url("/item"))
        .expect("valid url")
        .method(HttpMethod::Delete)
        .param("id", 7)
        .execute()
        .expect("request should succeed");
    assert_eq!(request.response_code().expect("settled"), 204);

    mock.assert();
}
