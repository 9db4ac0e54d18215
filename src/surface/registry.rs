// Surface registry - one surface per (feature, session)
// Author: kelexine (https://github.com/kelexine)

use super::conversation::Surface;
use crate::features::FeatureKind;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

type SurfaceKey = (FeatureKind, String);

/// Lookup table of live surfaces, owned by the server state.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: RwLock<HashMap<SurfaceKey, Arc<Surface>>>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the surface for `session`, creating it on first use
    pub fn get_or_create(&self, feature: FeatureKind, session: &str) -> Arc<Surface> {
        let key = (feature, session.to_string());
        if let Some(surface) = self.surfaces.read().get(&key) {
            return Arc::clone(surface);
        }

        let mut surfaces = self.surfaces.write();
        Arc::clone(surfaces.entry(key).or_insert_with(|| {
            debug!("Opening {} surface for session {}", feature.namespace(), session);
            Arc::new(Surface::new(feature))
        }))
    }

    pub fn get(&self, feature: FeatureKind, session: &str) -> Option<Arc<Surface>> {
        self.surfaces
            .read()
            .get(&(feature, session.to_string()))
            .cloned()
    }

    /// Drop a surface, aborting its in-flight request
    pub fn remove(&self, feature: FeatureKind, session: &str) -> bool {
        match self.surfaces.write().remove(&(feature, session.to_string())) {
            Some(surface) => {
                surface.close();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.surfaces.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.read().is_empty()
    }
}
