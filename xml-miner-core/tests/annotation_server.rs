/// Tests against a local fake annotation server
///
/// The fake speaks the login handshake, answers one query per connection
/// and closes the connection to end the response.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use xml_miner_core::{
    DocumentKind, DocumentSource, MineSummary, Reporter, SelectorSet, ServerQuery, SkipReason, SourceError,
    XmlMiner,
};

struct Session {
    user: String,
    password: String,
    query: String,
}

fn serve(connections: usize, welcome: &'static str, answer: fn(&str) -> String) -> (String, JoinHandle<Vec<Session>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();

    let handle = thread::spawn(move || {
        let mut sessions = Vec::new();
        for _ in 0..connections {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut read_line = || {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                line.trim_end().to_string()
            };

            stream.write_all(b"user: ").unwrap();
            let user = read_line();
            stream.write_all(b"password: ").unwrap();
            let password = read_line();
            stream.write_all(welcome.as_bytes()).unwrap();
            if !welcome.starts_with("OK") {
                continue;
            }

            let query = read_line();
            stream.write_all(answer(&query).as_bytes()).unwrap();
            sessions.push(Session { user, password, query });
        }
        sessions
    });

    (address, handle)
}

fn documents(query: &str) -> String {
    match query {
        "GIVE ids status=done" => "1\n2\nsome notice\n3\n".to_string(),
        "GIVE xml id 1" => "<begin filename=\"one.pdf\"><name>First</name></begin>".to_string(),
        "GIVE xml id 2" => "<begin filename=\"two.pdf\"><name>Second</name></begin>".to_string(),
        _ => String::new(),
    }
}

#[derive(Default)]
struct Collect {
    skipped: Vec<String>,
}

impl Reporter for Collect {
    fn skipped(&mut self, reason: &SkipReason, _document: &str) {
        self.skipped.push(reason.to_string());
    }

    fn summary(&mut self, _summary: &MineSummary) {}
}

fn query() -> ServerQuery {
    ServerQuery {
        query: "status=done".to_string(),
        user: "alice".to_string(),
        password: "secret".to_string(),
    }
}

#[test]
fn test_mine_documents_from_server() {
    let (address, server) = serve(4, "OK welcome\n", documents);

    let source = DocumentSource::resolve(&address, DocumentKind::Xml, &query()).unwrap();
    let miner = XmlMiner::new(SelectorSet::from_selector_string("name").unwrap(), false).unwrap();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut reporter = Collect::default();

    let summary = miner.mine_and_save(source, &mut rows, &mut reporter).unwrap();

    assert_eq!(
        rows,
        vec![
            vec!["filename", "value"],
            vec!["one.pdf", "First"],
            vec!["two.pdf", "Second"],
        ]
    );
    assert_eq!(summary.documents, 2);
    // document 3 comes back empty and can not be parsed
    assert_eq!(reporter.skipped.len(), 1);

    let sessions = server.join().unwrap();
    let queries: Vec<&str> = sessions.iter().map(|s| s.query.as_str()).collect();
    assert_eq!(
        queries,
        vec!["GIVE ids status=done", "GIVE xml id 1", "GIVE xml id 2", "GIVE xml id 3"]
    );
    assert!(sessions.iter().all(|s| s.user == "alice" && s.password == "secret"));
}

#[test]
fn test_rejected_login_is_fatal() {
    let (address, server) = serve(1, "DENIED\n", documents);

    let err = DocumentSource::resolve(&address, DocumentKind::Xml, &query()).err().unwrap();
    assert!(matches!(err, SourceError::Handshake { ref response, .. } if response == "DENIED"));

    server.join().unwrap();
}

#[test]
fn test_unreachable_server() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);

    let err = DocumentSource::resolve(&address, DocumentKind::Xml, &query()).err().unwrap();
    assert!(matches!(err, SourceError::Connection { .. }));
}
