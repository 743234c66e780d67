use snafu::{ResultExt, Snafu};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use rubber::api::bulk::BulkIndexRequest;
use rubber::{Client, Context};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Could not read {}: {}", path.display(), source))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Bulk request failed after {} documents: {}", sent, source))]
    Bulk { sent: usize, source: rubber::Error },
}

/// Outcome of [`index_file`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Documents sent.
    pub sent: usize,
    /// Documents rejected by the cluster.
    pub failed: usize,
}

/// Indexes every line of an NDJSON file as a document of `index`, sending
/// them in bulk requests of at most `chunk_size` documents.
///
/// Blank lines are skipped. Documents rejected by the cluster are logged and
/// counted, they do not stop the import.
pub async fn index_file(
    client: &Client,
    ctx: &Context,
    index: &str,
    path: &Path,
    chunk_size: usize,
) -> Result<IndexStats, Error> {
    let file = File::open(path).await.context(ReadSnafu { path })?;
    let mut lines = BufReader::new(file).lines();
    let mut bulk = client.bulk().index(index);
    let mut stats = IndexStats::default();
    let chunk_size = chunk_size.max(1);

    loop {
        let line = lines.next_line().await.context(ReadSnafu { path })?;
        let end = line.is_none();
        if let Some(line) = line {
            if !line.trim().is_empty() {
                bulk.add(BulkIndexRequest::new().doc_raw(line));
            }
        }
        if bulk.number_of_actions() > 0 && (end || bulk.number_of_actions() >= chunk_size) {
            let count = bulk.number_of_actions();
            let response = bulk
                .send(ctx)
                .await
                .context(BulkSnafu { sent: stats.sent })?;
            for item in response.failed() {
                let reason = item
                    .error
                    .as_ref()
                    .map(|err| err.reason.as_str())
                    .unwrap_or_default();
                warn!("document rejected by {} (status {}): {}", index, item.status, reason);
            }
            stats.sent += count;
            stats.failed += response.failed().len();
        }
        if end {
            break;
        }
    }

    info!(
        "indexed {} documents into {}, {} rejected",
        stats.sent, index, stats.failed
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubber::adapters::secondary::canned::CannedTransport;
    use rubber::domain::model::request::Body;
    use std::io::Write;
    use std::sync::Arc;

    const ACCEPTED: &str = r#"{"took":1,"errors":false,"items":[]}"#;

    fn ndjson(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[tokio::test]
    async fn should_send_documents_in_chunks() {
        let transport = Arc::new(
            CannedTransport::new()
                .respond(200, ACCEPTED)
                .respond(200, ACCEPTED),
        );
        let client = Client::new(transport.clone());
        let file = ndjson(&[r#"{"name":"a"}"#, "", r#"{"name":"b"}"#, r#"{"name":"c"}"#]);

        let stats = index_file(&client, &Context::background(), "places", file.path(), 2)
            .await
            .unwrap();
        assert_eq!(stats, IndexStats { sent: 3, failed: 0 });

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].path, "/places/_bulk");
        assert_eq!(
            requests[1].body,
            Some(Body::Raw(String::from("{\"index\":{}}\n{\"name\":\"c\"}\n")))
        );
    }

    #[tokio::test]
    async fn should_count_rejected_documents() {
        let transport = Arc::new(CannedTransport::new().respond(
            200,
            r#"{"took":1,"errors":true,"items":[
                {"index":{"_index":"places","_id":"1","status":201}},
                {"index":{"_index":"places","_id":"2","status":400,
                  "error":{"type":"mapper_parsing_exception","reason":"failed to parse"}}}]}"#,
        ));
        let client = Client::new(transport.clone());
        let file = ndjson(&[r#"{"name":"a"}"#, r#"{"name":1}"#]);

        let stats = index_file(&client, &Context::background(), "places", file.path(), 10)
            .await
            .unwrap();
        assert_eq!(stats, IndexStats { sent: 2, failed: 1 });
    }

    #[tokio::test]
    async fn should_not_send_empty_file() {
        let transport = Arc::new(CannedTransport::new());
        let client = Client::new(transport.clone());
        let file = ndjson(&[]);
        let stats = index_file(&client, &Context::background(), "places", file.path(), 10)
            .await
            .unwrap();
        assert_eq!(stats, IndexStats::default());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn should_report_missing_file() {
        let client = Client::new(CannedTransport::new());
        let err = index_file(
            &client,
            &Context::background(),
            "places",
            Path::new("/nonexistent/places.ndjson"),
            10,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
