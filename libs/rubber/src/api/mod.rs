//! Request builders, one per Elasticsearch operation.
//!
//! Every builder is created from a [`Client`](crate::Client), collects its
//! parameters through chained setters, and is finished by `send`, which
//! validates required fields, builds the path and query string, performs the
//! call, and decodes the response.
use crate::domain::model::error::Error;
use crate::domain::model::request::{Params, Response};

/// Parameters understood by every endpoint, plus custom headers.
#[derive(Debug, Clone, Default)]
pub(crate) struct CommonParams {
    pub(crate) pretty: Option<bool>,
    pub(crate) human: Option<bool>,
    pub(crate) error_trace: Option<bool>,
    pub(crate) filter_path: Vec<String>,
    pub(crate) headers: Vec<(String, String)>,
}

impl CommonParams {
    pub(crate) fn params(&self) -> Params {
        let mut params = Params::new();
        params.set_opt("pretty", &self.pretty);
        params.set_opt("human", &self.human);
        params.set_opt("error_trace", &self.error_trace);
        params.set_list("filter_path", &self.filter_path);
        params
    }
}

/// Setters for [`CommonParams`], expanded in every builder with a `common` field.
macro_rules! common_setters {
    () => {
        /// Asks for indented JSON.
        pub fn pretty(mut self, pretty: bool) -> Self {
            self.common.pretty = Some(pretty);
            self
        }

        /// Asks for human readable values (sizes, durations) alongside raw ones.
        pub fn human(mut self, human: bool) -> Self {
            self.common.human = Some(human);
            self
        }

        /// Asks for the stack trace of errors.
        pub fn error_trace(mut self, error_trace: bool) -> Self {
            self.common.error_trace = Some(error_trace);
            self
        }

        /// Restricts the response to the given paths.
        pub fn filter_path<I, S>(mut self, filter_path: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.common
                .filter_path
                .extend(filter_path.into_iter().map(Into::into));
            self
        }

        /// Adds a header to the request.
        pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
            self.common.headers.push((name.into(), value.into()));
            self
        }
    };
}

/// How wildcard and missing index names are resolved.
#[derive(Debug, Clone, Default)]
pub(crate) struct IndicesOptions {
    pub(crate) ignore_unavailable: Option<bool>,
    pub(crate) allow_no_indices: Option<bool>,
    pub(crate) expand_wildcards: Option<String>,
}

impl IndicesOptions {
    pub(crate) fn set_params(&self, params: &mut Params) {
        params.set_opt("ignore_unavailable", &self.ignore_unavailable);
        params.set_opt("allow_no_indices", &self.allow_no_indices);
        params.set_opt("expand_wildcards", &self.expand_wildcards);
    }
}

/// Setters for [`IndicesOptions`], expanded in builders with an `options` field.
macro_rules! indices_options_setters {
    () => {
        /// Ignores missing or closed indices instead of failing.
        pub fn ignore_unavailable(mut self, ignore_unavailable: bool) -> Self {
            self.options.ignore_unavailable = Some(ignore_unavailable);
            self
        }

        /// Whether a wildcard matching nothing is an error.
        pub fn allow_no_indices(mut self, allow_no_indices: bool) -> Self {
            self.options.allow_no_indices = Some(allow_no_indices);
            self
        }

        /// `open`, `closed`, `hidden`, `none` or `all`.
        pub fn expand_wildcards(mut self, expand_wildcards: impl Into<String>) -> Self {
            self.options.expand_wildcards = Some(expand_wildcards.into());
            self
        }
    };
}

/// Reads the answer of a `HEAD` existence check.
fn existence(response: &Response) -> Result<bool, Error> {
    match response.status {
        200 => Ok(true),
        404 => Ok(false),
        status => Err(Error::UnexpectedStatus { status }),
    }
}

fn strings<I, S>(values: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into)
}

pub mod bulk;
pub mod cat;
pub mod cluster;
pub mod document;
pub mod field_caps;
pub mod indices;
pub mod ingest;
pub mod pit;
pub mod search_shards;
pub mod snapshot;
