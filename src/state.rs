use std::sync::Arc;

use crate::flags::FlagClient;

#[derive(Clone)]
pub struct AppState {
    pub flags: Arc<FlagClient>,
    pub service_name: Arc<str>,
}

impl AppState {
    pub fn new(flags: Arc<FlagClient>, service_name: &str) -> Self {
        Self {
            flags,
            service_name: Arc::from(service_name),
        }
    }
}
