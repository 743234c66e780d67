use clap::Parser;
use ratatosk::settings::ratatosk as settings;
use ratatosk::utils::{launch, logger, ndjson};
use rubber::domain::ports::secondary::remote::Remote;
use rubber::{Client, Context};
use serde::Serialize;
use snafu::{ResultExt, Snafu};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Settings (Configuration or CLI) Error: {}", source))]
    Settings { source: settings::Error },

    #[snafu(display("Logger Initialization Error: {}", source))]
    Logger { source: logger::Error },

    #[snafu(display("Runtime Error: {}", source))]
    Runtime { source: launch::Error },

    #[snafu(display("Elasticsearch Connection Error: {}", source))]
    ElasticsearchConnection { source: rubber::Error },

    #[snafu(display("Elasticsearch Request Error: {}", source))]
    Elasticsearch { source: rubber::Error },

    #[snafu(display("Bulk Import Error: {}", source))]
    Import { source: ndjson::Error },

    #[snafu(display("Output Error: {}", source))]
    Output { source: serde_json::Error },
}

fn main() -> Result<(), Error> {
    let opts = settings::Opts::parse();
    let settings = settings::Settings::new(&opts).context(SettingsSnafu)?;

    match opts.cmd {
        settings::Command::Config => print(&settings),
        cmd => {
            let _guard = logger::logger_init(&settings.logging.path).context(LoggerSnafu)?;
            launch::launch_with_runtime(settings.nb_threads, run(cmd, settings))
                .context(RuntimeSnafu)?
        }
    }
}

async fn run(cmd: settings::Command, settings: settings::Settings) -> Result<(), Error> {
    tracing::info!(
        "Trying to connect to elasticsearch at {}",
        &settings.elasticsearch.url
    );
    let timeout = settings.elasticsearch.timeout;
    let client: Client = settings
        .elasticsearch
        .clone()
        .conn()
        .await
        .context(ElasticsearchConnectionSnafu)?;
    tracing::info!("Connected to elasticsearch.");

    let ctx = Context::with_timeout(timeout);
    match cmd {
        settings::Command::Config => print(&settings),
        settings::Command::Health => {
            let health = client
                .cluster_health()
                .send(&ctx)
                .await
                .context(ElasticsearchSnafu)?;
            print(&health)
        }
        settings::Command::Stats => {
            let stats = client
                .cluster_stats()
                .send(&ctx)
                .await
                .context(ElasticsearchSnafu)?;
            print(&stats)
        }
        settings::Command::Indices { columns, index } => {
            let rows = client
                .cat_indices()
                .index(index)
                .columns(columns)
                .send(&ctx)
                .await
                .context(ElasticsearchSnafu)?;
            print(&rows)
        }
        settings::Command::Shards { columns, index } => {
            let rows = client
                .cat_shards()
                .index(index)
                .columns(columns)
                .send(&ctx)
                .await
                .context(ElasticsearchSnafu)?;
            print(&rows)
        }
        settings::Command::Aliases { name } => {
            let rows = client
                .cat_aliases()
                .alias(name)
                .send(&ctx)
                .await
                .context(ElasticsearchSnafu)?;
            print(&rows)
        }
        settings::Command::Exists { index, id } => {
            let exists = match id {
                Some(id) => client.exists().index(index).id(id).send(&ctx).await,
                None => client.indices_exists().index([index]).send(&ctx).await,
            }
            .context(ElasticsearchSnafu)?;
            print(&exists)
        }
        settings::Command::Bulk { index, file } => {
            // The whole import is not bounded by the request timeout.
            let stats = ndjson::index_file(
                &client,
                &Context::background(),
                &index,
                &file,
                settings.bulk.chunk_size,
            )
            .await
            .context(ImportSnafu)?;
            tracing::info!("{} documents sent, {} rejected", stats.sent, stats.failed);
            Ok(())
        }
    }
}

fn print<T: Serialize>(value: &T) -> Result<(), Error> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context(OutputSnafu)?
    );
    Ok(())
}
