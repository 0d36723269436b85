use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::permissions::{Permission, PermissionGate};
use crate::types::{GeoFix, ModalityOutcome};
use aegis_foundation::DeviceError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Seam to the platform positioning service (high-accuracy fix).
#[async_trait]
pub trait LocationBackend: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, DeviceError>;
}

/// Best-effort coordinate-to-address enrichment.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse(&self, position: Coordinates) -> Result<String, DeviceError>;
}

/// Resolves coordinates plus an optional human-readable address.
///
/// Geocoding is strictly an enrichment: its failure or timeout leaves the
/// coordinates intact with `address` unset.
pub struct LocationResolver {
    gate: Arc<dyn PermissionGate>,
    backend: Box<dyn LocationBackend>,
    geocoder: Option<Box<dyn Geocoder>>,
    fix_timeout: Duration,
    geocode_timeout: Duration,
}

impl LocationResolver {
    pub fn new(
        gate: Arc<dyn PermissionGate>,
        backend: Box<dyn LocationBackend>,
        geocoder: Option<Box<dyn Geocoder>>,
        fix_timeout: Duration,
        geocode_timeout: Duration,
    ) -> Self {
        Self {
            gate,
            backend,
            geocoder,
            fix_timeout,
            geocode_timeout,
        }
    }

    pub async fn resolve(&self) -> ModalityOutcome<GeoFix> {
        if !self.gate.request(Permission::Location).await.is_granted() {
            debug!("Location permission denied, skipping fix");
            return ModalityOutcome::Denied;
        }

        let position = match tokio::time::timeout(self.fix_timeout, self.backend.current_position())
            .await
        {
            Err(_) => {
                warn!("Position fix exceeded {:?}", self.fix_timeout);
                return ModalityOutcome::TimedOut;
            }
            Ok(Err(e)) => {
                warn!("Position fix failed: {}", e);
                return ModalityOutcome::Failed(e.to_string());
            }
            Ok(Ok(position)) => position,
        };

        let address = self.reverse_geocode(position).await;

        ModalityOutcome::Captured(GeoFix {
            latitude: position.latitude,
            longitude: position.longitude,
            address,
        })
    }

    async fn reverse_geocode(&self, position: Coordinates) -> Option<String> {
        let geocoder = self.geocoder.as_ref()?;
        match tokio::time::timeout(self.geocode_timeout, geocoder.reverse(position)).await {
            Ok(Ok(address)) => Some(address),
            Ok(Err(e)) => {
                debug!("Reverse geocoding failed, keeping bare coordinates: {}", e);
                None
            }
            Err(_) => {
                debug!("Reverse geocoding exceeded {:?}, keeping bare coordinates", self.geocode_timeout);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::StaticPermissions;

    struct FixedPosition(Coordinates);

    #[async_trait]
    impl LocationBackend for FixedPosition {
        async fn current_position(&self) -> Result<Coordinates, DeviceError> {
            Ok(self.0)
        }
    }

    struct HungPosition;

    #[async_trait]
    impl LocationBackend for HungPosition {
        async fn current_position(&self) -> Result<Coordinates, DeviceError> {
            // Driver never answers
            std::future::pending().await
        }
    }

    struct FailingGeocoder;

    #[async_trait]
    impl Geocoder for FailingGeocoder {
        async fn reverse(&self, _position: Coordinates) -> Result<String, DeviceError> {
            Err(DeviceError::SensorUnavailable {
                name: "geocoder".into(),
            })
        }
    }

    struct NamedPlace;

    #[async_trait]
    impl Geocoder for NamedPlace {
        async fn reverse(&self, _position: Coordinates) -> Result<String, DeviceError> {
            Ok("1 Safety Way".into())
        }
    }

    fn coords() -> Coordinates {
        Coordinates {
            latitude: 59.3293,
            longitude: 18.0686,
        }
    }

    fn resolver(
        gate: StaticPermissions,
        backend: Box<dyn LocationBackend>,
        geocoder: Option<Box<dyn Geocoder>>,
    ) -> LocationResolver {
        LocationResolver::new(
            Arc::new(gate),
            backend,
            geocoder,
            Duration::from_millis(100),
            Duration::from_millis(50),
        )
    }

    #[tokio::test]
    async fn denied_location_settles_as_denied() {
        let r = resolver(
            StaticPermissions::deny_all(),
            Box::new(FixedPosition(coords())),
            None,
        );
        assert_eq!(r.resolve().await, ModalityOutcome::Denied);
    }

    #[tokio::test]
    async fn fix_with_address_enrichment() {
        let r = resolver(
            StaticPermissions::allow_all(),
            Box::new(FixedPosition(coords())),
            Some(Box::new(NamedPlace)),
        );
        match r.resolve().await {
            ModalityOutcome::Captured(fix) => {
                assert_eq!(fix.latitude, 59.3293);
                assert_eq!(fix.address.as_deref(), Some("1 Safety Way"));
            }
            other => panic!("expected fix, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn geocode_failure_keeps_coordinates() {
        let r = resolver(
            StaticPermissions::allow_all(),
            Box::new(FixedPosition(coords())),
            Some(Box::new(FailingGeocoder)),
        );
        match r.resolve().await {
            ModalityOutcome::Captured(fix) => {
                assert_eq!(fix.longitude, 18.0686);
                assert!(fix.address.is_none());
            }
            other => panic!("expected fix, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hung_driver_times_out_instead_of_stalling() {
        let r = resolver(
            StaticPermissions::allow_all(),
            Box::new(HungPosition),
            None,
        );
        assert_eq!(r.resolve().await, ModalityOutcome::TimedOut);
    }
}
