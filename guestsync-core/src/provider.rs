//! Provider subprocess protocol client.
//!
//! Calendars are reached through external provider binaries
//! (e.g. `guestsync-provider-google`) speaking JSON over stdin/stdout.
//! Providers manage their own credentials and tokens; guestsync only passes
//! the account and calendar id from the pair configuration.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tracing::debug;

use crate::backend::CalendarBackend;
use crate::config::SyncConfig;
use crate::date_range::DateRange;
use crate::error::{GuestSyncError, GuestSyncResult};
use crate::event::{Event, GuestStatus, NewEvent};
use crate::protocol::{
    AddGuest, Authenticate, Command, CreateEvent, DeleteEvent, GetEvent, ListEvents,
    ProviderCommand, Request, Response, SetDescription, SetMyStatus, Target,
};

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);
/// Sign-in waits for the user to finish in the browser.
const AUTH_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Clone, Debug)]
pub struct Provider(String);

impl Provider {
    pub fn from_name(name: &str) -> Self {
        Provider(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn binary_name(&self) -> String {
        format!("guestsync-provider-{}", self.0)
    }

    pub fn binary_path(&self) -> GuestSyncResult<std::path::PathBuf> {
        let binary_name = self.binary_name();
        which::which(&binary_name).map_err(|_| {
            GuestSyncError::ProviderNotInstalled(format!(
                "Provider '{}' not found. Install it with:\n  cargo install {}",
                self.0, binary_name
            ))
        })
    }

    /// Run the provider's sign-in flow. Returns the account identifier.
    pub async fn authenticate(&self) -> GuestSyncResult<String> {
        timeout(AUTH_TIMEOUT, self.call_raw(Authenticate::command(), Authenticate {}))
            .await
            .map_err(|_| GuestSyncError::ProviderTimeout(AUTH_TIMEOUT.as_secs()))?
    }

    /// Call a typed provider command and return the result.
    ///
    /// The response type is inferred from the command's associated type.
    pub async fn call<C: ProviderCommand>(&self, cmd: C) -> GuestSyncResult<C::Response> {
        timeout(PROVIDER_TIMEOUT, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| GuestSyncError::ProviderTimeout(PROVIDER_TIMEOUT.as_secs()))?
    }

    /// Send a command with params and deserialize the response.
    async fn call_raw<P: Serialize, R: DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> GuestSyncResult<R> {
        let params = serde_json::to_value(params)
            .map_err(|e| GuestSyncError::Serialization(e.to_string()))?;
        let request = Request { command, params };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| GuestSyncError::Serialization(e.to_string()))?;

        let binary_path = self.binary_path()?;
        debug!("{} <- {:?}", self.binary_name(), command);

        let mut child = TokioCommand::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GuestSyncError::Provider(format!("Failed to spawn {}: {}", binary_path.display(), e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| GuestSyncError::Provider("Provider stdin unavailable".into()))?;
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(GuestSyncError::Provider(format!(
                "Provider exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        let response_str = String::from_utf8_lossy(&output.stdout);
        if response_str.trim().is_empty() {
            return Err(GuestSyncError::Provider("Provider returned no response".into()));
        }

        let response: Response<R> = serde_json::from_str(response_str.trim())
            .map_err(|e| GuestSyncError::Provider(format!("Failed to parse response: {}", e)))?;

        match response {
            Response::Success { data } => Ok(data),
            Response::Error { error } => Err(GuestSyncError::Provider(error)),
        }
    }
}

/// How to reach one calendar.
#[derive(Clone, Debug)]
struct Route {
    provider: Provider,
    account: String,
}

/// `CalendarBackend` that forwards every call to the provider configured
/// for the event's calendar.
pub struct ProviderBackend {
    routes: HashMap<String, Route>,
}

impl ProviderBackend {
    pub fn from_config(config: &SyncConfig) -> Self {
        let routes = config
            .pairs
            .iter()
            .map(|pair| {
                (
                    pair.source.to_lowercase(),
                    Route {
                        provider: Provider::from_name(&pair.provider),
                        account: pair.account().to_string(),
                    },
                )
            })
            .collect();

        ProviderBackend { routes }
    }

    /// Providers referenced by the configuration, without duplicates.
    pub fn providers(&self) -> Vec<Provider> {
        let mut names: Vec<&str> = self.routes.values().map(|r| r.provider.name()).collect();
        names.sort_unstable();
        names.dedup();
        names.into_iter().map(Provider::from_name).collect()
    }

    fn route(&self, calendar: &str) -> GuestSyncResult<(&Provider, Target)> {
        let route = self.routes.get(&calendar.to_lowercase()).ok_or_else(|| {
            GuestSyncError::Config(format!("No pair configured for calendar {calendar}"))
        })?;

        Ok((
            &route.provider,
            Target {
                account: route.account.clone(),
                calendar_id: calendar.to_string(),
            },
        ))
    }
}

#[async_trait]
impl CalendarBackend for ProviderBackend {
    async fn list_events(&self, calendar: &str, range: &DateRange) -> GuestSyncResult<Vec<Event>> {
        let (provider, target) = self.route(calendar)?;
        provider
            .call(ListEvents {
                target,
                from: range.from_rfc3339(),
                to: range.to_rfc3339(),
            })
            .await
    }

    async fn get_event(&self, event: &Event) -> GuestSyncResult<Option<Event>> {
        let (provider, target) = self.route(&event.calendar)?;
        provider
            .call(GetEvent {
                target,
                event_id: event.id.clone(),
            })
            .await
    }

    async fn set_owner_status(&self, event: &Event, status: GuestStatus) -> GuestSyncResult<()> {
        let (provider, target) = self.route(&event.calendar)?;
        provider
            .call(SetMyStatus {
                target,
                event_id: event.id.clone(),
                status,
            })
            .await
    }

    async fn add_guest(&self, event: &Event, identity: &str) -> GuestSyncResult<()> {
        let (provider, target) = self.route(&event.calendar)?;
        provider
            .call(AddGuest {
                target,
                event_id: event.id.clone(),
                identity: identity.to_string(),
            })
            .await
    }

    async fn create_event(&self, calendar: &str, event: &NewEvent) -> GuestSyncResult<Event> {
        let (provider, target) = self.route(calendar)?;
        provider
            .call(CreateEvent {
                target,
                event: event.clone(),
            })
            .await
    }

    async fn set_description(&self, event: &Event, description: &str) -> GuestSyncResult<()> {
        let (provider, target) = self.route(&event.calendar)?;
        provider
            .call(SetDescription {
                target,
                event_id: event.id.clone(),
                description: description.to_string(),
            })
            .await
    }

    async fn delete_event(&self, event: &Event) -> GuestSyncResult<()> {
        let (provider, target) = self.route(&event.calendar)?;
        provider
            .call(DeleteEvent {
                target,
                event_id: event.id.clone(),
            })
            .await
    }
}
