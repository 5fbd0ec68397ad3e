use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;

use super::ApiSuccess;
use crate::config::CapabilityDescriptor;
use crate::config::ServiceDescriptor;
use crate::inbound::http::router::AppState;

/// Diagnostic description of the caller and this server.
pub async fn about(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> ApiSuccess<AboutResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        AboutResponseData {
            client: ClientData {
                host: peer.ip().to_string(),
            },
            server: ServerData {
                current_time: Utc::now().timestamp(),
                services: state.about.services.iter().map(Into::into).collect(),
            },
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AboutResponseData {
    pub client: ClientData,
    pub server: ServerData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientData {
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerData {
    pub current_time: i64,
    pub services: Vec<ServiceData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceData {
    pub name: String,
    pub description: String,
    pub actions: Vec<CapabilityData>,
    pub reactions: Vec<CapabilityData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityData {
    pub name: String,
    pub description: String,
}

impl From<&ServiceDescriptor> for ServiceData {
    fn from(service: &ServiceDescriptor) -> Self {
        Self {
            name: service.name.clone(),
            description: service.description.clone(),
            actions: service.actions.iter().map(Into::into).collect(),
            reactions: service.reactions.iter().map(Into::into).collect(),
        }
    }
}

impl From<&CapabilityDescriptor> for CapabilityData {
    fn from(capability: &CapabilityDescriptor) -> Self {
        Self {
            name: capability.name.clone(),
            description: capability.description.clone(),
        }
    }
}
