//! Index management operations.
mod analyze;
mod clear_cache;
mod exists;
mod put_index_template;
mod put_mapping;
mod put_settings;
mod put_template;
mod state;
mod synced_flush;

pub use analyze::{AnalyzeToken, IndicesAnalyzeRequest, IndicesAnalyzeResponse, IndicesAnalyzeService};
pub use clear_cache::{IndicesClearCacheResponse, IndicesClearCacheService};
pub use exists::IndicesExistsService;
pub use put_index_template::IndicesPutIndexTemplateService;
pub use put_mapping::IndicesPutMappingService;
pub use put_settings::IndicesPutSettingsService;
pub use put_template::IndicesPutTemplateService;
pub use state::{IndicesStateResponse, IndicesStateService, StateChange};
pub use synced_flush::{
    IndicesShardsSyncedFlushResult, IndicesSyncedFlushResponse, IndicesSyncedFlushService,
    SyncedFlushFailure,
};

