/// REST classifier terminus: asks a Puppet-style server for node data over
/// HTTPS (`GET /puppet/v3/node/<name>`).
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;

use super::NodeClassifier;
use super::errors::TerminusError;
use super::node::Node;

/// TLS material for talking to the server. All paths point to PEM files.
#[derive(Debug, Clone, Default)]
pub struct TlsFiles {
    pub ca_cert: Option<String>,
    pub client_cert: Option<String>,
    pub client_key: Option<String>,
}

fn read_pem(path: &str) -> Result<Vec<u8>, TerminusError> {
    std::fs::read(path).map_err(|source| TerminusError::Certificate {
        path: path.to_owned(),
        source,
    })
}

/// Blocking HTTP classifier.
#[derive(Debug, Clone)]
pub struct RestClassifier {
    client: Client,
    base_url: String,
    environment: String,
}

impl RestClassifier {
    /// Build a client for `base_url` (e.g. `https://puppet:8140`).
    ///
    /// # Errors
    ///
    /// Returns `TerminusError::Certificate` if a PEM file cannot be read and
    /// `TerminusError::Http` if the TLS material is rejected.
    pub fn new(base_url: &str, environment: &str, tls: &TlsFiles) -> Result<Self, TerminusError> {
        let mut builder = Client::builder();

        if let Some(ca) = &tls.ca_cert {
            let pem = read_pem(ca)?;
            builder = builder.add_root_certificate(reqwest::Certificate::from_pem(&pem)?);
        }

        match (&tls.client_cert, &tls.client_key) {
            (Some(cert), Some(key)) => {
                let mut pem = read_pem(cert)?;
                pem.push(b'\n');
                pem.extend(read_pem(key)?);
                builder = builder.identity(reqwest::Identity::from_pem(&pem)?);
            }
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!("client_cert and client_key must both be set; ignoring client identity");
            }
            (None, None) => {}
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_owned(),
            environment: environment.to_owned(),
        })
    }

    fn node_url(&self, name: &str) -> String {
        format!("{}/puppet/v3/node/{name}", self.base_url)
    }
}

impl NodeClassifier for RestClassifier {
    fn find(&self, name: &str) -> Result<Option<Node>, TerminusError> {
        let url = self.node_url(name);
        tracing::debug!(%url, environment = %self.environment, "requesting node");

        let response = self
            .client
            .get(&url)
            .query(&[("environment", self.environment.as_str())])
            .header(ACCEPT, "application/json")
            .send()?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(TerminusError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let mut node: Node = response.json()?;
        // Servers echo the certname, but the caller's spelling wins.
        name.clone_into(&mut node.name);
        Ok(Some(node))
    }
}
