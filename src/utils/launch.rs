use futures::future::Future;
use snafu::{ResultExt, Snafu};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Could not build tokio runtime: {}", source))]
    Runtime { source: std::io::Error },
}

/// Runs `run` to completion on a multi threaded runtime, with `nb_threads`
/// workers, or one per core when unset.
pub fn launch_with_runtime<F, T>(nb_threads: Option<usize>, run: F) -> Result<T, Error>
where
    F: Future<Output = T>,
{
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    if let Some(nb_threads) = nb_threads {
        builder.worker_threads(nb_threads);
    }
    let runtime = builder.enable_all().build().context(RuntimeSnafu)?;
    Ok(runtime.block_on(run))
}
