//! HTTP failures against a local listener: every one is fatal and no
//! presentation file is written.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use vetdeck::{build, AssetRef, BuildOptions, DeckSpec, Error, SlideSpec, TitleSlideSpec};

fn deck_with_image(url: &str) -> DeckSpec {
    DeckSpec {
        metadata: Default::default(),
        width: vetdeck::inches(13.33),
        height: vetdeck::inches(7.5),
        theme: Default::default(),
        layout: Default::default(),
        assets: vec![AssetRef::new("xray", url, "xray.jpg")],
        title_slide: TitleSlideSpec::new("Deck"),
        slides: vec![SlideSpec::new("Imaging").with_image("xray")],
    }
}

/// Answer a single request with `status_line` and an empty body.
fn serve_once(status_line: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                status_line
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://{}/xray.jpg", addr)
}

#[test]
fn test_not_found_is_fatal() {
    let url = serve_once("404 Not Found");
    let dir = tempfile::tempdir().unwrap();
    let options = BuildOptions::new()
        .with_output(dir.path().join("deck.pptx"))
        .with_cache_dir(dir.path());

    let result = build(&deck_with_image(&url), &options);

    match result {
        Err(Error::HttpStatus { url: failed, status }) => {
            assert_eq!(status, 404);
            assert_eq!(failed, url);
        }
        other => panic!("expected HTTP 404, got {:?}", other),
    }
    assert!(!options.output.exists());
    assert!(!dir.path().join("xray.jpg").exists());
}

#[test]
fn test_server_error_is_fatal() {
    let url = serve_once("500 Internal Server Error");
    let dir = tempfile::tempdir().unwrap();
    let options = BuildOptions::new()
        .with_output(dir.path().join("deck.pptx"))
        .with_cache_dir(dir.path());

    let result = build(&deck_with_image(&url), &options);

    assert!(matches!(result, Err(Error::HttpStatus { status: 500, .. })));
    assert!(!options.output.exists());
}

#[test]
fn test_connection_refused_is_fatal() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = format!("http://127.0.0.1:{}/xray.jpg", port);
    let dir = tempfile::tempdir().unwrap();
    let options = BuildOptions::new()
        .with_output(dir.path().join("deck.pptx"))
        .with_cache_dir(dir.path());

    let result = build(&deck_with_image(&url), &options);

    assert!(matches!(result, Err(Error::Fetch { .. })));
    assert!(!options.output.exists());
}
