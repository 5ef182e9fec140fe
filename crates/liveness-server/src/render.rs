//! HTML views over the session store. Read-only.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use liveness_core::{SessionListing, SessionRecord};
use minijinja::{context, Environment, Value};
use serde::Serialize;

const INDEX: &str = "index.html";
const DETAILS: &str = "details.html";
const LOGIN: &str = "login.html";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Serialize)]
struct IndexEntry<'a> {
    session_id: &'a str,
    created: String,
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.format(DATE_FORMAT).to_string()
}

/// Templates are compiled into the binary.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX, include_str!("../templates/index.html"))?;
        env.add_template(DETAILS, include_str!("../templates/details.html"))?;
        env.add_template(LOGIN, include_str!("../templates/login.html"))?;
        Ok(Self { env })
    }

    /// Chronological index, in the order given (the store lists newest first).
    pub fn index(&self, sessions: &[SessionListing]) -> Result<String, minijinja::Error> {
        let sessions: Vec<IndexEntry<'_>> = sessions
            .iter()
            .map(|s| IndexEntry {
                session_id: &s.session_id,
                created: format_time(&s.created_at),
            })
            .collect();

        self.env
            .get_template(INDEX)?
            .render(context! { sessions => sessions })
    }

    pub fn details(
        &self,
        record: &SessionRecord,
        image: Option<&[u8]>,
    ) -> Result<String, minijinja::Error> {
        let response_metadata = serde_json::to_string_pretty(&record.response_metadata)
            .unwrap_or_else(|_| record.response_metadata.to_string());

        self.env.get_template(DETAILS)?.render(context! {
            session_id => record.session_id,
            status => record.status.as_str(),
            confidence => record.confidence,
            created => record.created_at.as_ref().map(format_time),
            response_metadata => response_metadata,
            image_base64 => image.map(|bytes| Value::from_safe_string(BASE64.encode(bytes))),
        })
    }

    pub fn login(&self) -> Result<String, minijinja::Error> {
        self.env.get_template(LOGIN)?.render(context! {})
    }
}
