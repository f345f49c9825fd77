use std::sync::Arc;

use clap::{value_parser, Arg, ArgMatches, Command};

use crate::{
    adapters::PageFetcher,
    enumerator::KeyEnumerator,
    model::error::{Error, Result},
    pattern::NamePattern,
    util,
};

pub const DEFAULT_TEMPLATE: &str = ".*";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Settings for one enumeration run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub bucket: String,
    pub prefix: Option<String>,
    pub start_after: Option<String>,
    /// Regular expression every yielded key must match in full.
    pub template: String,
    pub max_keys: Option<i32>,
    pub region: Option<String>,
    /// Custom S3 endpoint, e.g. a local MinIO. Forces path-style addressing.
    pub endpoint: Option<String>,
    /// Attempts per request made by the S3 client's own retry layer.
    pub max_attempts: u32,
}

impl Config {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: None,
            start_after: None,
            template: DEFAULT_TEMPLATE.to_string(),
            max_keys: None,
            region: None,
            endpoint: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let bucket_uri = matches
            .get_one::<String>("BUCKET")
            .ok_or_else(|| Error::configuration("missing bucket"))?;

        let config = Self {
            bucket: util::object::parse_bucket_from_uri(bucket_uri)?.to_string(),
            prefix: matches.get_one::<String>("prefix").cloned(),
            start_after: matches.get_one::<String>("start-after").cloned(),
            template: matches
                .get_one::<String>("template")
                .cloned()
                .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
            max_keys: matches.get_one::<i32>("max-keys").copied(),
            region: matches.get_one::<String>("region").cloned(),
            endpoint: matches.get_one::<String>("endpoint").cloned(),
            max_attempts: matches
                .get_one::<u32>("max-attempts")
                .copied()
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bucket.is_empty() {
            return Err(Error::configuration("bucket name must not be empty"));
        }

        if let Some(max_keys) = self.max_keys {
            if !(1..=1000).contains(&max_keys) {
                return Err(Error::configuration(format!(
                    "max-keys must be within 1..=1000, got: {}",
                    max_keys
                )));
            }
        }

        if self.max_attempts == 0 {
            return Err(Error::configuration("max-attempts must be at least 1"));
        }

        Ok(())
    }

    /// Compiles the template and builds an enumerator over `fetcher`.
    pub fn enumerator(&self, fetcher: Arc<dyn PageFetcher>) -> Result<KeyEnumerator> {
        self.validate()?;
        let pattern = NamePattern::compile(&self.template)?;

        Ok(KeyEnumerator::new(fetcher, &self.bucket, pattern)?
            .with_prefix(self.prefix.clone())
            .with_start_after(self.start_after.clone())
            .with_max_keys(self.max_keys))
    }
}

pub fn command() -> Command {
    Command::new("objectkeys")
        .about("Lists the keys of an S3 bucket that match a name template")
        .arg(
            Arg::new("BUCKET")
                .help("bucket name or s3://bucket")
                .required(true)
                .index(1)
                .env("OBJECTKEYS_BUCKET"),
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .help("server-side key prefix")
                .env("OBJECTKEYS_PREFIX"),
        )
        .arg(
            Arg::new("start-after")
                .long("start-after")
                .help("resume strictly after this key")
                .env("OBJECTKEYS_START_AFTER"),
        )
        .arg(
            Arg::new("template")
                .long("template")
                .help("regular expression matched against the full key")
                .default_value(DEFAULT_TEMPLATE)
                .env("OBJECTKEYS_TEMPLATE"),
        )
        .arg(
            Arg::new("max-keys")
                .long("max-keys")
                .help("page size requested from the store")
                .value_parser(value_parser!(i32))
                .env("OBJECTKEYS_MAX_KEYS"),
        )
        .arg(Arg::new("region").long("region").env("AWS_REGION"))
        .arg(Arg::new("endpoint").long("endpoint").env("AWS_ENDPOINT_URL"))
        .arg(
            Arg::new("max-attempts")
                .long("max-attempts")
                .value_parser(value_parser!(u32))
                .default_value("3"),
        )
}
