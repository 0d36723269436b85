use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Microphone,
    Camera,
    Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Seam to the OS permission prompts. Each request may suspend on a user
/// dialog; any combination of grants and denials must leave the pipeline
/// functional (degraded).
#[async_trait]
pub trait PermissionGate: Send + Sync {
    async fn request(&self, permission: Permission) -> PermissionStatus;
}

/// Fixed grant/deny table. Stands in for the platform prompt in wiring and
/// tests.
pub struct StaticPermissions {
    microphone: bool,
    camera: bool,
    location: bool,
}

impl StaticPermissions {
    pub fn new(microphone: bool, camera: bool, location: bool) -> Self {
        Self {
            microphone,
            camera,
            location,
        }
    }

    pub fn allow_all() -> Self {
        Self::new(true, true, true)
    }

    pub fn deny_all() -> Self {
        Self::new(false, false, false)
    }
}

#[async_trait]
impl PermissionGate for StaticPermissions {
    async fn request(&self, permission: Permission) -> PermissionStatus {
        let granted = match permission {
            Permission::Microphone => self.microphone,
            Permission::Camera => self.camera,
            Permission::Location => self.location,
        };
        if granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_gate_answers_per_permission() {
        let gate = StaticPermissions::new(true, false, true);
        assert!(gate.request(Permission::Microphone).await.is_granted());
        assert!(!gate.request(Permission::Camera).await.is_granted());
        assert!(gate.request(Permission::Location).await.is_granted());
    }
}
