//! The tracker view: owns state, runs the two user actions and renders the scene.
//!
//! Locate requests run as spawned tasks that report back over a channel; the
//! view applies completions in [`TrackerView::handle_event`], so all state
//! mutation happens on whichever task owns the view.

use crate::core::{
    Position, Status, UserPosition, MSG_LOCATING, MSG_REFRESHED, MSG_UNSUPPORTED,
};
use crate::geolocation::{GeoReading, GeoResult, GeolocationProvider};
use crate::map::{ActionButton, Circle, MapCamera, MapScene, MapSurface, Marker, MarkerIcon, StatusBanner, TileLayer};
use crate::tracker::drift::DriftGenerator;
use crate::tracker::formatting::{device_popup, locate_failed_message, located_message, user_popup};
use crate::tracker::state::{TrackerAction, TrackerState};
use crate::utils::{ConfigError, ConfigurationManager, TrackerConfig};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Identifies one locate request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocateRequestId(u32);

impl LocateRequestId {
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Completions delivered back to the view
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    LocateCompleted {
        request: LocateRequestId,
        result: GeoResult<GeoReading>,
    },
}

pub struct TrackerView<G, M> {
    state: TrackerState,
    config: TrackerConfig,
    drift: DriftGenerator,
    geolocation: G,
    map: M,
    events_tx: mpsc::UnboundedSender<TrackerEvent>,
    events_rx: mpsc::UnboundedReceiver<TrackerEvent>,
    request_counter: u32,
    in_flight: u32,
}

impl<G, M> TrackerView<G, M>
where
    G: GeolocationProvider,
    M: MapSurface,
{
    /// Build a view; the configuration is validated first.
    pub fn new(config: TrackerConfig, geolocation: G, map: M) -> Result<Self, ConfigError> {
        let validation = ConfigurationManager::validate(&config);
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }
        for warning in &validation.warnings {
            warn!("{}", warning);
        }

        let drift = DriftGenerator::new(config.drift_half_width_deg)
            .with_clamping(config.clamp_to_valid_range);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            state: TrackerState::new(config.seed_position),
            config,
            drift,
            geolocation,
            map,
            events_tx,
            events_rx,
            request_counter: 0,
            in_flight: 0,
        })
    }

    /// Replace the drift generator, e.g. with a seeded one
    pub fn with_drift(mut self, drift: DriftGenerator) -> Self {
        self.drift = drift;
        self
    }

    pub fn device_position(&self) -> Position {
        self.state.device
    }

    pub fn user_position(&self) -> Option<UserPosition> {
        self.state.user
    }

    pub fn status(&self) -> &Status {
        &self.state.status
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    /// Locate requests issued but not yet applied
    pub fn pending_locates(&self) -> u32 {
        self.in_flight
    }

    fn dispatch(&mut self, action: TrackerAction) {
        if self.state.apply(action) {
            let zoom = self.map.zoom();
            self.map.fly_to(self.state.device, zoom);
        }
    }

    /// Move the simulated device by a bounded random drift
    pub fn refresh_tracker(&mut self) {
        let previous = self.state.device;
        let next = self.drift.apply(previous);
        debug!(
            from_lat = previous.lat,
            from_lon = previous.lon,
            to_lat = next.lat,
            to_lon = next.lon,
            "tracker refreshed"
        );

        self.dispatch(TrackerAction::DeviceMoved(next));
        self.dispatch(TrackerAction::StatusChanged(Status::normal(MSG_REFRESHED)));
    }

    /// Ask the host for the user's position.
    ///
    /// Returns the request id, or `None` when the host has no geolocation
    /// capability. Must be called from within a tokio runtime.
    pub fn locate_user(&mut self) -> Option<LocateRequestId> {
        self.dispatch(TrackerAction::StatusChanged(Status::loading(MSG_LOCATING)));

        if !self.geolocation.is_available() {
            warn!("geolocation capability unavailable");
            self.dispatch(TrackerAction::StatusChanged(Status::error(MSG_UNSUPPORTED)));
            return None;
        }

        self.request_counter += 1;
        self.in_flight += 1;
        let request = LocateRequestId(self.request_counter);
        debug!(request = request.id(), in_flight = self.in_flight, "locate requested");

        let lookup = self.geolocation.current_position(&self.config.geolocation);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = lookup.await;
            // The view may have been dropped while the host was answering
            let _ = events.send(TrackerEvent::LocateCompleted { request, result });
        });

        Some(request)
    }

    /// Apply a completion. Returns false if it was discarded as stale.
    pub fn handle_event(&mut self, event: TrackerEvent) -> bool {
        match event {
            TrackerEvent::LocateCompleted { request, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);

                if self.config.discard_stale_locates && request.id() < self.request_counter {
                    warn!(
                        request = request.id(),
                        latest = self.request_counter,
                        "discarding stale locate completion"
                    );
                    return false;
                }

                match result {
                    Ok(reading) => {
                        info!(
                            request = request.id(),
                            lat = reading.lat,
                            lon = reading.lon,
                            accuracy_m = reading.accuracy_m,
                            timestamp_ms = reading.timestamp_ms,
                            "user located"
                        );
                        let message = located_message(&reading);
                        self.dispatch(TrackerAction::UserLocated(reading.into()));
                        self.dispatch(TrackerAction::StatusChanged(Status::success(message)));
                    }
                    Err(error) => {
                        warn!(request = request.id(), %error, "locate failed");
                        self.dispatch(TrackerAction::StatusChanged(Status::error(
                            locate_failed_message(&error),
                        )));
                    }
                }
                true
            }
        }
    }

    /// Wait for the next completion without applying it
    pub async fn next_event(&mut self) -> Option<TrackerEvent> {
        self.events_rx.recv().await
    }

    /// Wait for the next completion and apply it
    pub async fn process_next(&mut self) -> bool {
        match self.next_event().await {
            Some(event) => self.handle_event(event),
            None => false,
        }
    }

    /// Apply every completion that has already arrived; returns how many
    pub fn process_ready(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            processed += 1;
        }
        processed
    }

    /// Describe the current frame
    pub fn render(&self) -> MapScene {
        let device = self.state.device;
        let accuracy_circle = self.state.user.as_ref().map(|user| Circle {
            center: user.position,
            radius_m: user.accuracy_m / 2.0,
            style: self.config.circle_style.clone(),
            popup: user_popup(user),
        });

        MapScene {
            title: self.config.device_name.clone(),
            camera: MapCamera {
                center: device,
                zoom: self.map.zoom(),
            },
            tiles: TileLayer {
                url_template: self.config.tiles.url_template.clone(),
                attribution: self.config.tiles.attribution.clone(),
            },
            marker: Marker {
                position: device,
                icon: MarkerIcon::default(),
                popup: device_popup(&self.config.device_name, &device),
            },
            accuracy_circle,
            status: StatusBanner::new(self.state.status.message.clone(), self.state.status.kind),
            actions: vec![
                ActionButton::new("refresh", "Refresh Tracker"),
                ActionButton::new("locate", "Show My Location"),
            ],
        }
    }
}
