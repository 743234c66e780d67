//! Cluster level operations.
mod component_template;
mod health;
mod stats;

pub use component_template::ClusterPutComponentTemplateService;
pub use health::{ClusterHealthResponse, ClusterHealthService, ClusterIndexHealth, ClusterShardHealth};
pub use stats::{
    ClusterStatsIndices, ClusterStatsIndicesDocs, ClusterStatsIndicesShards, ClusterStatsNodes,
    ClusterStatsResponse, ClusterStatsService,
};
