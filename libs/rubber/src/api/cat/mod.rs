//! The `_cat` APIs, always queried with `format=json`.
//!
//! The cat APIs accept short aliases for their columns (`dc` for
//! `docs.count`), but always answer with the canonical names. Columns given to
//! [`CatIndicesService::columns`] and [`CatShardsService::columns`] are
//! rewritten to their canonical names before sending, so that the rows can be
//! decoded into typed fields.
use std::collections::HashMap;

mod aliases;
mod indices;
mod shards;

pub use aliases::{CatAliasesResponseRow, CatAliasesService};
pub use indices::{CatIndicesResponseRow, CatIndicesService};
pub use shards::{CatShardsResponseRow, CatShardsService};

/// Replaces known aliases by their canonical column names.
///
/// An alias standing for several columns takes the place of the first one,
/// the others being appended at the end of the list.
pub fn expand_columns(
    columns: &[String],
    aliases: &HashMap<&'static str, &'static str>,
) -> Vec<String> {
    let mut expanded = columns.to_vec();
    for (position, column) in columns.iter().enumerate() {
        if let Some(canonical) = aliases.get(column.as_str()) {
            let mut names = canonical.split(',');
            if let Some(first) = names.next() {
                expanded[position] = first.to_string();
            }
            expanded.extend(names.map(String::from));
        }
    }
    expanded
}

// Column aliases shared by cat indices and cat shards.
const STATS_ALIASES: &[(&str, &str)] = &[
    ("cs", "completion.size"),
    ("completionSize", "completion.size"),
    ("fm", "fielddata.memory_size"),
    ("fielddataMemory", "fielddata.memory_size"),
    ("fe", "fielddata.evictions"),
    ("fielddataEvictions", "fielddata.evictions"),
    ("qcm", "query_cache.memory_size"),
    ("queryCacheMemory", "query_cache.memory_size"),
    ("qce", "query_cache.evictions"),
    ("queryCacheEvictions", "query_cache.evictions"),
    ("ft", "flush.total"),
    ("flushTotal", "flush.total"),
    ("ftt", "flush.total_time"),
    ("flushTotalTime", "flush.total_time"),
    ("gc", "get.current"),
    ("getCurrent", "get.current"),
    ("gti", "get.time"),
    ("getTime", "get.time"),
    ("gto", "get.total"),
    ("getTotal", "get.total"),
    ("geti", "get.exists_time"),
    ("getExistsTime", "get.exists_time"),
    ("geto", "get.exists_total"),
    ("getExistsTotal", "get.exists_total"),
    ("gmti", "get.missing_time"),
    ("getMissingTime", "get.missing_time"),
    ("gmto", "get.missing_total"),
    ("getMissingTotal", "get.missing_total"),
    ("idc", "indexing.delete_current"),
    ("indexingDeleteCurrent", "indexing.delete_current"),
    ("idti", "indexing.delete_time"),
    ("indexingDeleteTime", "indexing.delete_time"),
    ("idto", "indexing.delete_total"),
    ("indexingDeleteTotal", "indexing.delete_total"),
    ("iic", "indexing.index_current"),
    ("indexingIndexCurrent", "indexing.index_current"),
    ("iiti", "indexing.index_time"),
    ("indexingIndexTime", "indexing.index_time"),
    ("iito", "indexing.index_total"),
    ("indexingIndexTotal", "indexing.index_total"),
    ("iif", "indexing.index_failed"),
    ("indexingIndexFailed", "indexing.index_failed"),
    ("mc", "merges.current"),
    ("mergesCurrent", "merges.current"),
    ("mcd", "merges.current_docs"),
    ("mergesCurrentDocs", "merges.current_docs"),
    ("mcs", "merges.current_size"),
    ("mergesCurrentSize", "merges.current_size"),
    ("mt", "merges.total"),
    ("mergesTotal", "merges.total"),
    ("mtd", "merges.total_docs"),
    ("mergesTotalDocs", "merges.total_docs"),
    ("mts", "merges.total_size"),
    ("mergesTotalSize", "merges.total_size"),
    ("mtt", "merges.total_time"),
    ("mergesTotalTime", "merges.total_time"),
    ("rto", "refresh.total,refresh.external_total"),
    ("refreshTotal", "refresh.total,refresh.external_total"),
    ("rti", "refresh.time,refresh.external_time"),
    ("refreshTime", "refresh.time,refresh.external_time"),
    ("rli", "refresh.listeners"),
    ("refreshListeners", "refresh.listeners"),
    ("sfc", "search.fetch_current"),
    ("searchFetchCurrent", "search.fetch_current"),
    ("sfti", "search.fetch_time"),
    ("searchFetchTime", "search.fetch_time"),
    ("sfto", "search.fetch_total"),
    ("searchFetchTotal", "search.fetch_total"),
    ("so", "search.open_contexts"),
    ("searchOpenContexts", "search.open_contexts"),
    ("sqc", "search.query_current"),
    ("searchQueryCurrent", "search.query_current"),
    ("sqti", "search.query_time"),
    ("searchQueryTime", "search.query_time"),
    ("sqto", "search.query_total"),
    ("searchQueryTotal", "search.query_total"),
    ("scc", "search.scroll_current"),
    ("searchScrollCurrent", "search.scroll_current"),
    ("scti", "search.scroll_time"),
    ("searchScrollTime", "search.scroll_time"),
    ("scto", "search.scroll_total"),
    ("searchScrollTotal", "search.scroll_total"),
    ("sc", "segments.count"),
    ("segmentsCount", "segments.count"),
    ("sm", "segments.memory"),
    ("segmentsMemory", "segments.memory"),
    ("siwm", "segments.index_writer_memory"),
    ("segmentsIndexWriterMemory", "segments.index_writer_memory"),
    ("svmm", "segments.version_map_memory"),
    ("segmentsVersionMapMemory", "segments.version_map_memory"),
    ("sfbm", "segments.fixed_bitset_memory"),
    ("fixedBitsetMemory", "segments.fixed_bitset_memory"),
    ("wc", "warmer.current"),
    ("warmerCurrent", "warmer.current"),
    ("wto", "warmer.total"),
    ("warmerTotal", "warmer.total"),
    ("wtt", "warmer.total_time"),
    ("warmerTotalTime", "warmer.total_time"),
    ("suc", "suggest.current"),
    ("suggestCurrent", "suggest.current"),
    ("suti", "suggest.time"),
    ("suggestTime", "suggest.time"),
    ("suto", "suggest.total"),
    ("suggestTotal", "suggest.total"),
];

fn alias_table(specific: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
    STATS_ALIASES
        .iter()
        .chain(specific.iter())
        .copied()
        .collect()
}

lazy_static::lazy_static! {
    static ref INDICES_ALIASES: HashMap<&'static str, &'static str> = alias_table(&[
        ("id", "uuid"),
        ("h", "health"),
        ("s", "status"),
        ("p", "pri"),
        ("shards.primary", "pri"),
        ("shardsPrimary", "pri"),
        ("r", "rep"),
        ("shards.replica", "rep"),
        ("shardsReplica", "rep"),
        ("dc", "docs.count"),
        ("docsCount", "docs.count"),
        ("dd", "docs.deleted"),
        ("docsDeleted", "docs.deleted"),
        ("cd", "creation.date"),
        ("cds", "creation.date.string"),
        ("ss", "store.size"),
        ("storeSize", "store.size"),
        ("rcm", "request_cache.memory_size"),
        ("requestCacheMemory", "request_cache.memory_size"),
        ("rce", "request_cache.evictions"),
        ("requestCacheEvictions", "request_cache.evictions"),
        ("rchc", "request_cache.hit_count"),
        ("requestCacheHitCount", "request_cache.hit_count"),
        ("rcmc", "request_cache.miss_count"),
        ("requestCacheMissCount", "request_cache.miss_count"),
        ("tm", "memory.total"),
        ("memoryTotal", "memory.total"),
    ]);

    static ref SHARDS_ALIASES: HashMap<&'static str, &'static str> = alias_table(&[
        ("s", "shard"),
        ("sh", "shard"),
        ("p", "prirep"),
        ("pr", "prirep"),
        ("primaryOrReplica", "prirep"),
        ("st", "state"),
        ("d", "docs"),
        ("dc", "docs"),
        ("n", "node"),
        ("ur", "unassigned.reason"),
        ("ua", "unassigned.at"),
        ("uf", "unassigned.for"),
        ("ud", "unassigned.details"),
        ("rs", "recoverysource.type"),
        ("sqm", "seq_no.max"),
        ("maxSeqNo", "seq_no.max"),
        ("sql", "seq_no.local_checkpoint"),
        ("localCheckpoint", "seq_no.local_checkpoint"),
        ("sqg", "seq_no.global_checkpoint"),
        ("globalCheckpoint", "seq_no.global_checkpoint"),
        ("pa", "path.data"),
        ("dataPath", "path.data"),
        ("ps", "path.state"),
        ("statsPath", "path.state"),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn should_rewrite_aliases_in_place() {
        assert_eq!(
            expand_columns(&columns(&["qce", "idx"]), &INDICES_ALIASES),
            columns(&["query_cache.evictions", "idx"])
        );
        assert_eq!(
            expand_columns(&columns(&["dc", "health", "ss"]), &INDICES_ALIASES),
            columns(&["docs.count", "health", "store.size"])
        );
    }

    #[test]
    fn should_append_extra_names_of_multi_column_aliases() {
        assert_eq!(
            expand_columns(&columns(&["rto"]), &INDICES_ALIASES),
            columns(&["refresh.total", "refresh.external_total"])
        );
        assert_eq!(
            expand_columns(&columns(&["rti", "i", "rto"]), &SHARDS_ALIASES),
            columns(&[
                "refresh.time",
                "i",
                "refresh.total",
                "refresh.external_time",
                "refresh.external_total"
            ])
        );
    }

    #[test]
    fn should_resolve_aliases_per_api() {
        assert_eq!(
            expand_columns(&columns(&["s", "p", "dc"]), &INDICES_ALIASES),
            columns(&["status", "pri", "docs.count"])
        );
        assert_eq!(
            expand_columns(&columns(&["s", "p", "dc"]), &SHARDS_ALIASES),
            columns(&["shard", "prirep", "docs"])
        );
    }

    #[test]
    fn should_leave_empty_list_empty() {
        assert!(expand_columns(&[], &INDICES_ALIASES).is_empty());
    }
}
