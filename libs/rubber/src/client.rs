use reqwest::header::WARNING;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::bulk::BulkService;
use crate::api::cat::{CatAliasesService, CatIndicesService, CatShardsService};
use crate::api::cluster::{
    ClusterHealthService, ClusterPutComponentTemplateService, ClusterStatsService,
};
use crate::api::document::{DeleteService, ExistsService, IndexService};
use crate::api::field_caps::FieldCapsService;
use crate::api::indices::{
    IndicesAnalyzeService, IndicesClearCacheService, IndicesExistsService,
    IndicesPutIndexTemplateService, IndicesPutMappingService, IndicesPutSettingsService,
    IndicesPutTemplateService, IndicesStateService, IndicesSyncedFlushService, StateChange,
};
use crate::api::ingest::{
    IngestDeletePipelineService, IngestGetPipelineService, IngestPutPipelineService,
    IngestSimulatePipelineService,
};
use crate::api::pit::{ClosePointInTimeService, OpenPointInTimeService};
use crate::api::search_shards::SearchShardsService;
use crate::api::snapshot::{
    SnapshotCreateRepositoryService, SnapshotCreateService, SnapshotDeleteRepositoryService,
    SnapshotDeleteService, SnapshotGetRepositoryService, SnapshotGetService,
    SnapshotRestoreService, SnapshotStatusService, SnapshotVerifyRepositoryService,
};
use crate::domain::model::context::Context;
use crate::domain::model::error::{check_response, Error};
use crate::domain::model::request::{Request, Response};
use crate::domain::ports::secondary::transport::Transport;

/// Entry point to every operation.
///
/// The client is cheap to clone; clones share the same transport. Each
/// operation is started by one of the methods below, which return a builder.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    pub fn new<T: Transport + 'static>(transport: T) -> Self {
        Client {
            transport: Arc::new(transport),
        }
    }

    /// Sends `request`, giving up when `ctx` is canceled or expires.
    ///
    /// Paths holding a `.` or `..` segment are refused with
    /// [`Error::InvalidPath`].
    ///
    /// Non 2xx responses are turned into [`Error::Elastic`], unless their
    /// status is listed in `request.ignore_errors`.
    pub async fn perform_request(&self, ctx: &Context, request: Request) -> Result<Response, Error> {
        debug!("{} {} {:?}", request.method, request.path, request.params);
        if request
            .path
            .split('/')
            .any(|segment| segment == "." || segment == "..")
        {
            return Err(Error::InvalidPath { path: request.path });
        }
        let ignore_errors = request.ignore_errors.clone();
        let response = ctx.run(self.transport.perform_request(request)).await?;
        for warning in response.headers.get_all(WARNING) {
            if let Ok(warning) = warning.to_str() {
                warn!("Elasticsearch warning: {}", warning);
            }
        }
        check_response(&response, &ignore_errors)?;
        Ok(response)
    }

    // Documents

    pub fn index(&self) -> IndexService {
        IndexService::new(self.clone())
    }

    /// Same as [`Client::index`], failing if the document already exists.
    pub fn create(&self) -> IndexService {
        IndexService::new(self.clone()).op_type("create")
    }

    pub fn delete(&self) -> DeleteService {
        DeleteService::new(self.clone())
    }

    pub fn exists(&self) -> ExistsService {
        ExistsService::new(self.clone())
    }

    pub fn bulk(&self) -> BulkService {
        BulkService::new(self.clone())
    }

    // Indices

    pub fn indices_exists(&self) -> IndicesExistsService {
        IndicesExistsService::new(self.clone())
    }

    pub fn indices_analyze(&self) -> IndicesAnalyzeService {
        IndicesAnalyzeService::new(self.clone())
    }

    pub fn indices_clear_cache(&self) -> IndicesClearCacheService {
        IndicesClearCacheService::new(self.clone())
    }

    pub fn indices_freeze(&self) -> IndicesStateService {
        IndicesStateService::new(self.clone(), StateChange::Freeze)
    }

    pub fn indices_unfreeze(&self) -> IndicesStateService {
        IndicesStateService::new(self.clone(), StateChange::Unfreeze)
    }

    pub fn indices_open(&self) -> IndicesStateService {
        IndicesStateService::new(self.clone(), StateChange::Open)
    }

    pub fn indices_close(&self) -> IndicesStateService {
        IndicesStateService::new(self.clone(), StateChange::Close)
    }

    pub fn indices_put_mapping(&self) -> IndicesPutMappingService {
        IndicesPutMappingService::new(self.clone())
    }

    pub fn indices_put_settings(&self) -> IndicesPutSettingsService {
        IndicesPutSettingsService::new(self.clone())
    }

    pub fn indices_put_template(&self) -> IndicesPutTemplateService {
        IndicesPutTemplateService::new(self.clone())
    }

    pub fn indices_put_index_template(&self) -> IndicesPutIndexTemplateService {
        IndicesPutIndexTemplateService::new(self.clone())
    }

    pub fn indices_synced_flush(&self) -> IndicesSyncedFlushService {
        IndicesSyncedFlushService::new(self.clone())
    }

    pub fn field_caps(&self) -> FieldCapsService {
        FieldCapsService::new(self.clone())
    }

    // Cat

    pub fn cat_aliases(&self) -> CatAliasesService {
        CatAliasesService::new(self.clone())
    }

    pub fn cat_indices(&self) -> CatIndicesService {
        CatIndicesService::new(self.clone())
    }

    pub fn cat_shards(&self) -> CatShardsService {
        CatShardsService::new(self.clone())
    }

    // Cluster

    pub fn cluster_stats(&self) -> ClusterStatsService {
        ClusterStatsService::new(self.clone())
    }

    pub fn cluster_health(&self) -> ClusterHealthService {
        ClusterHealthService::new(self.clone())
    }

    pub fn cluster_put_component_template(&self) -> ClusterPutComponentTemplateService {
        ClusterPutComponentTemplateService::new(self.clone())
    }

    // Ingest

    pub fn ingest_put_pipeline(&self) -> IngestPutPipelineService {
        IngestPutPipelineService::new(self.clone())
    }

    pub fn ingest_get_pipeline(&self) -> IngestGetPipelineService {
        IngestGetPipelineService::new(self.clone())
    }

    pub fn ingest_delete_pipeline(&self) -> IngestDeletePipelineService {
        IngestDeletePipelineService::new(self.clone())
    }

    pub fn ingest_simulate_pipeline(&self) -> IngestSimulatePipelineService {
        IngestSimulatePipelineService::new(self.clone())
    }

    // Search

    pub fn open_point_in_time(&self) -> OpenPointInTimeService {
        OpenPointInTimeService::new(self.clone())
    }

    pub fn close_point_in_time(&self) -> ClosePointInTimeService {
        ClosePointInTimeService::new(self.clone())
    }

    pub fn search_shards(&self) -> SearchShardsService {
        SearchShardsService::new(self.clone())
    }

    // Snapshots

    pub fn snapshot_create_repository(&self) -> SnapshotCreateRepositoryService {
        SnapshotCreateRepositoryService::new(self.clone())
    }

    pub fn snapshot_get_repository(&self) -> SnapshotGetRepositoryService {
        SnapshotGetRepositoryService::new(self.clone())
    }

    pub fn snapshot_delete_repository(&self) -> SnapshotDeleteRepositoryService {
        SnapshotDeleteRepositoryService::new(self.clone())
    }

    pub fn snapshot_verify_repository(&self) -> SnapshotVerifyRepositoryService {
        SnapshotVerifyRepositoryService::new(self.clone())
    }

    pub fn snapshot_create(&self) -> SnapshotCreateService {
        SnapshotCreateService::new(self.clone())
    }

    pub fn snapshot_get(&self) -> SnapshotGetService {
        SnapshotGetService::new(self.clone())
    }

    pub fn snapshot_delete(&self) -> SnapshotDeleteService {
        SnapshotDeleteService::new(self.clone())
    }

    pub fn snapshot_restore(&self) -> SnapshotRestoreService {
        SnapshotRestoreService::new(self.clone())
    }

    pub fn snapshot_status(&self) -> SnapshotStatusService {
        SnapshotStatusService::new(self.clone())
    }
}
