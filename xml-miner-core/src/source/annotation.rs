//! Client for the line-based annotation server protocol
//!
//! Every request opens a fresh connection, logs in, sends one query line and
//! reads the answer until the server closes the connection.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::vec;

use tracing::{debug, warn};

use super::SourceError;

const BUFFER_SIZE: usize = 2 * 1024;
const ACCEPTED: &str = "OK";

/// Query and credentials used to list documents on an annotation server
#[derive(Debug, Clone, Default)]
pub struct ServerQuery {
    pub query: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AnnotationClient {
    host: String,
    port: u16,
    user: String,
    password: String,
}

impl AnnotationClient {
    pub fn new(host: impl Into<String>, port: u16, user: &str, password: &str) -> Self {
        AnnotationClient {
            host: host.into(),
            port,
            user: user.to_string(),
            password: password.to_string(),
        }
    }

    /// Split `host:port`
    pub fn parse_address(address: &str) -> Result<(String, u16), SourceError> {
        let invalid = || SourceError::InvalidAddress(address.to_string());
        let (host, port) = address.rsplit_once(':').ok_or_else(invalid)?;
        if host.is_empty() {
            return Err(invalid());
        }
        let port = port.parse::<u16>().map_err(|_| invalid())?;
        Ok((host.to_string(), port))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Ids of all documents matching `query`; lines that are not purely
    /// numeric are ignored
    pub fn get_ids(&self, query: &str) -> Result<Vec<String>, SourceError> {
        let response = self.send_and_receive(&format!("GIVE ids {}", query))?;
        Ok(response
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && line.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_string)
            .collect())
    }

    pub fn get_document(&self, id: &str) -> Result<String, SourceError> {
        self.send_and_receive(&format!("GIVE xml id {}", id))
    }

    /// Log in, send one message and return everything the server answers
    pub fn send_and_receive(&self, message: &str) -> Result<String, SourceError> {
        let mut stream = self.login()?;

        debug!("send query '{}' to {}:{}", message, self.host, self.port);
        stream
            .write_all(line(message).as_bytes())
            .map_err(|e| self.connection_error(e))?;

        let mut response = Vec::new();
        stream
            .read_to_end(&mut response)
            .map_err(|e| self.connection_error(e))?;

        self.decode(response)
    }

    fn login(&self) -> Result<TcpStream, SourceError> {
        let mut stream =
            TcpStream::connect((self.host.as_str(), self.port)).map_err(|e| self.connection_error(e))?;

        self.receive_prompt(&mut stream)?;
        self.send_line(&mut stream, &self.user)?;
        self.receive_prompt(&mut stream)?;
        self.send_line(&mut stream, &self.password)?;

        let response = self.receive_prompt(&mut stream)?;
        if !response.starts_with(ACCEPTED) {
            return Err(SourceError::Handshake {
                host: self.host.clone(),
                port: self.port,
                response: response.trim_end().to_string(),
            });
        }
        Ok(stream)
    }

    fn receive_prompt(&self, stream: &mut TcpStream) -> Result<String, SourceError> {
        let mut buffer = [0u8; BUFFER_SIZE];
        let size = stream.read(&mut buffer).map_err(|e| self.connection_error(e))?;
        self.decode(buffer[..size].to_vec())
    }

    fn send_line(&self, stream: &mut TcpStream, text: &str) -> Result<(), SourceError> {
        stream
            .write_all(line(text).as_bytes())
            .map_err(|e| self.connection_error(e))
    }

    fn decode(&self, bytes: Vec<u8>) -> Result<String, SourceError> {
        String::from_utf8(bytes).map_err(|_| SourceError::Decode {
            host: self.host.clone(),
            port: self.port,
        })
    }

    fn connection_error(&self, source: std::io::Error) -> SourceError {
        SourceError::Connection {
            host: self.host.clone(),
            port: self.port,
            source,
        }
    }
}

fn line(message: &str) -> String {
    if message.ends_with('\n') {
        message.to_string()
    } else {
        format!("{}\n", message)
    }
}

/// Documents listed by one query; each is fetched when iterated
pub struct AnnotationServerSource {
    client: AnnotationClient,
    ids: vec::IntoIter<String>,
}

impl AnnotationServerSource {
    /// Fetch the document ids for `query` up front
    pub fn open(client: AnnotationClient, query: &str) -> Result<Self, SourceError> {
        let ids = client.get_ids(query)?;
        debug!("annotation server listed {} documents", ids.len());
        Ok(AnnotationServerSource {
            client,
            ids: ids.into_iter(),
        })
    }
}

impl Iterator for AnnotationServerSource {
    type Item = Result<String, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.ids.next()?;
        Some(self.client.get_document(&id).map_err(|source| {
            warn!("failed to fetch document: {}", id);
            SourceError::Fetch {
                id,
                source: Box::new(source),
            }
        }))
    }
}
