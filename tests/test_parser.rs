use lantern::http::parser::{MAX_HEAD_SIZE, ParseError, parse_request_head};
use lantern::http::request::Method;

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let (parsed, consumed) = parse_request_head(req).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.target, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_leaves_body_unconsumed() {
    let req = b"POST /form.pl HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
    let (parsed, consumed) = parse_request_head(req).unwrap();

    assert_eq!(parsed.method, Method::POST);
    assert_eq!(&req[consumed..], b"hello");
    assert_eq!(parsed.body_length(), Ok(5));
}

#[test]
fn test_parse_multiple_headers() {
    let req = b"GET /path HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test-client\r\nAccept: */*\r\n\r\n";
    let (parsed, _) = parse_request_head(req).unwrap();

    assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
    assert_eq!(parsed.headers.get("User-Agent").unwrap(), "test-client");
    assert_eq!(parsed.headers.get("Accept").unwrap(), "*/*");
}

#[test]
fn test_parse_header_value_split_at_first_colon() {
    let req = b"GET / HTTP/1.1\r\nHost: localhost:8080\r\n\r\n";
    let (parsed, _) = parse_request_head(req).unwrap();

    assert_eq!(parsed.headers.get("Host").unwrap(), "localhost:8080");
}

#[test]
fn test_parse_skips_header_without_colon() {
    let req = b"GET / HTTP/1.1\r\nBrokenHeader\r\nHost: a\r\n\r\n";
    let (parsed, _) = parse_request_head(req).unwrap();

    assert_eq!(parsed.headers.len(), 1);
    assert_eq!(parsed.headers.get("Host").unwrap(), "a");
}

#[test]
fn test_parse_header_keys_keep_case() {
    let req = b"GET / HTTP/1.1\r\ncontent-type: application/json\r\n\r\n";
    let (parsed, _) = parse_request_head(req).unwrap();

    assert!(parsed.headers.contains_key("content-type"));
    assert!(!parsed.headers.contains_key("Content-Type"));
}

#[test]
fn test_parse_incomplete_request_missing_blank_line() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n";
    let result = parse_request_head(req);

    assert!(matches!(result, Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_request_line_too_short() {
    let req = b"GET /\r\n\r\n";
    let result = parse_request_head(req);

    assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
}

#[test]
fn test_parse_unknown_method_is_kept() {
    let req = b"DELETE /x HTTP/1.1\r\n\r\n";
    let (parsed, _) = parse_request_head(req).unwrap();

    assert_eq!(parsed.method, Method::Other("DELETE".to_string()));
    assert_eq!(parsed.body_length(), Ok(0));
}

#[test]
fn test_parse_bare_newlines() {
    let req = b"GET /a HTTP/1.0\nHost: x\n\n";
    let (parsed, consumed) = parse_request_head(req).unwrap();

    assert_eq!(parsed.target, "/a");
    assert_eq!(parsed.version, "HTTP/1.0");
    assert_eq!(parsed.headers.get("Host").unwrap(), "x");
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_head_too_large() {
    let mut req = b"GET / HTTP/1.1\r\nX-Fill: ".to_vec();
    req.extend(std::iter::repeat_n(b'a', MAX_HEAD_SIZE));

    assert!(matches!(parse_request_head(&req), Err(ParseError::HeadTooLarge)));
}

#[test]
fn test_post_requires_numeric_content_length() {
    let missing = b"POST /f.pl HTTP/1.1\r\n\r\n";
    let (head, _) = parse_request_head(missing).unwrap();
    assert_eq!(head.body_length(), Err(ParseError::InvalidContentLength));

    let garbage = b"POST /f.pl HTTP/1.1\r\nContent-Length: ten\r\n\r\n";
    let (head, _) = parse_request_head(garbage).unwrap();
    assert_eq!(head.body_length(), Err(ParseError::InvalidContentLength));
}

#[test]
fn test_get_ignores_content_length() {
    let req = b"GET / HTTP/1.1\r\nContent-Length: 12\r\n\r\n";
    let (head, _) = parse_request_head(req).unwrap();

    assert_eq!(head.body_length(), Ok(0));
}

#[test]
fn test_into_request_splits_query_once() {
    let req = b"GET /cgi/echo.pl?a=1?b=2 HTTP/1.1\r\n\r\n";
    let (head, _) = parse_request_head(req).unwrap();
    let request = head.into_request(b"ignored".to_vec(), "10.0.0.1");

    assert_eq!(request.path, "/cgi/echo.pl");
    assert_eq!(request.query, "a=1?b=2");
    assert!(request.body.is_empty());
    assert_eq!(request.client_addr, "10.0.0.1");
}
