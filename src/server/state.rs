use crate::region::RegionResolver;
use crate::registry::ConnectionRegistry;
use std::sync::Arc;

pub struct AppState {
    pub resolver: RegionResolver,
    pub registry: Arc<ConnectionRegistry>,
}
