use std::path::PathBuf;
use std::rc::Rc;

use rusqlite::Connection;
use serde::Deserialize;

use crate::registry::{PaymentRegistry, TeacherRegistry};
use crate::store::StoreError;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Registries for one open workspace. Both share the workspace connection.
pub struct Session {
    pub store: Rc<Connection>,
    pub teachers: TeacherRegistry,
    pub payments: PaymentRegistry,
}

impl Session {
    pub fn open(conn: Connection) -> Result<Self, StoreError> {
        Self::hydrate(Rc::new(conn))
    }

    /// Rebuilds both registries from whatever the store holds now.
    pub fn hydrate(store: Rc<Connection>) -> Result<Self, StoreError> {
        let teachers = TeacherRegistry::load(store.clone())?;
        let payments = PaymentRegistry::load(store.clone())?;
        Ok(Self {
            store,
            teachers,
            payments,
        })
    }
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub session: Option<Session>,
}
