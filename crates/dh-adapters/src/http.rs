//! Cliente HTTP bloqueante hacia la API bajo prueba.

use std::time::Duration;

use dh_core::{CollabError, HttpClient, HttpResponse};
use log::debug;
use reqwest::blocking::Client;

use crate::error::AdapterError;

pub struct BlockingHttpClient {
    http: Client,
    base_url: String,
}

impl BlockingHttpClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AdapterError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http,
                  base_url: base_url.into() })
    }
}

impl HttpClient for BlockingHttpClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Cualquier código de estado es una respuesta válida; sólo los fallos de
    /// transporte son error.
    fn get(&self, path: &str) -> Result<HttpResponse, CollabError> {
        let url = self.url_for(path);
        debug!("GET {url}");
        let resp = self.http.get(&url).send().map_err(AdapterError::from)?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(AdapterError::from)?;
        Ok(HttpResponse { status, body })
    }
}
