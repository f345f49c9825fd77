use aws_config::{retry::RetryConfig, BehaviorVersion, Region};
use aws_sdk_s3::{
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::list_objects_v2::{ListObjectsV2Error, ListObjectsV2Output},
};
use tracing::{trace, warn};

use crate::{adapters, config, model, util};

const THROTTLING_CODES: [&str; 4] = [
    "SlowDown",
    "Throttling",
    "ThrottlingException",
    "RequestTimeout",
];

/// Builds an S3 client from the environment plus the region/endpoint
/// overrides in `config`. Retries happen inside the client.
pub fn build_client(config: &config::Config) -> aws_sdk_s3::Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts));

    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = util::poll::poll_until_ready(loader.load());
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.endpoint.is_some())
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}

impl adapters::PageFetcher for aws_sdk_s3::Client {
    fn fetch_page(
        &self,
        request: &model::listing::ListingRequest,
    ) -> model::error::Result<model::listing::Page> {
        if request.bucket.is_empty() {
            return Err(model::error::Error::fatal(
                "list_objects_v2 requires a bucket name",
            ));
        }

        let req = self
            .list_objects_v2()
            .bucket(&request.bucket)
            .set_prefix(request.prefix().map(str::to_string))
            .set_start_after(request.start_after().map(str::to_string))
            .set_continuation_token(request.continuation_token().map(str::to_string))
            .set_max_keys(request.max_keys);

        trace!(
            bucket = %request.bucket,
            prefix = ?request.prefix(),
            start_after = ?request.start_after(),
            continuation = request.continuation_token().is_some(),
            "list_objects_v2"
        );

        let lo = util::poll::poll_until_ready(req.send()).map_err(|err| classify(&err))?;

        to_page(&request.bucket, lo)
    }
}

fn to_page(
    bucket: &str,
    lo: ListObjectsV2Output,
) -> model::error::Result<model::listing::Page> {
    let mut entries = Vec::with_capacity(lo.contents().len());

    for o in lo.contents() {
        let Some(key) = o.key() else {
            warn!(bucket = bucket, "listed object without a key, skipping");
            continue;
        };
        let size_bytes = u64::try_from(o.size().unwrap_or(0)).unwrap_or(0);

        entries.push(model::listing::ObjectEntry::new(key, size_bytes));
    }

    // `is_truncated` decides the end of the listing, whatever the token says.
    if !lo.is_truncated().unwrap_or(false) {
        return Ok(model::listing::Page::last(entries));
    }

    match lo.next_continuation_token() {
        Some(token) if !token.is_empty() => Ok(model::listing::Page::truncated(entries, token)),
        _ => Err(model::error::Error::fatal(format!(
            "truncated listing of bucket: {} carried no continuation token",
            bucket
        ))),
    }
}

fn classify(err: &SdkError<ListObjectsV2Error>) -> model::error::Error {
    let message = format!("failed to list_objects: {}", DisplayErrorContext(err));

    match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            model::error::Error::TransientFetch(message)
        }
        SdkError::ConstructionFailure(_) => model::error::Error::FatalFetch(message),
        _ => {
            if let Some(svc_err) = err.as_service_error() {
                if svc_err.is_no_such_bucket() {
                    return model::error::Error::FatalFetch(message);
                }

                if svc_err
                    .code()
                    .is_some_and(|code| THROTTLING_CODES.contains(&code))
                {
                    return model::error::Error::TransientFetch(message);
                }
            }

            match err.raw_response() {
                Some(raw) => adapters::classify_status(raw.status().as_u16(), message),
                None => model::error::Error::TransientFetch(message),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::{
        error::ErrorMetadata,
        types::{error::NoSuchBucket, Object},
    };
    use aws_smithy_runtime_api::http::{Response, StatusCode};
    use aws_smithy_types::body::SdkBody;

    use super::*;

    fn object(key: &str, size: i64) -> Object {
        Object::builder().key(key).size(size).build()
    }

    #[test]
    fn test_to_page_last() {
        let lo = ListObjectsV2Output::builder()
            .contents(object("key1", 1))
            .contents(object("key2", 0))
            .is_truncated(false)
            .next_continuation_token("ignored")
            .build();

        let page = to_page("test-bucket", lo).unwrap();

        assert!(!page.is_truncated());
        assert_eq!(
            page.entries(),
            &[
                model::listing::ObjectEntry::new("key1", 1),
                model::listing::ObjectEntry::new("key2", 0),
            ]
        );
    }

    #[test]
    fn test_to_page_truncated() {
        let lo = ListObjectsV2Output::builder()
            .contents(object("topics/key1/1/key1.txt", 1))
            .is_truncated(true)
            .next_continuation_token("nextToken")
            .build();

        let page = to_page("test-bucket", lo).unwrap();

        assert_eq!(page.next_cursor(), Some("nextToken"));
    }

    #[test]
    fn test_to_page_truncated_without_token() {
        let lo = ListObjectsV2Output::builder().is_truncated(true).build();

        let err = to_page("test-bucket", lo).unwrap_err();

        assert!(matches!(err, model::error::Error::FatalFetch(_)));
    }

    #[test]
    fn test_to_page_negative_size_is_zero() {
        let lo = ListObjectsV2Output::builder()
            .contents(object("key1", -1))
            .contents(Object::builder().size(5).build())
            .build();

        let page = to_page("test-bucket", lo).unwrap();

        assert_eq!(page.entries(), &[model::listing::ObjectEntry::new("key1", 0)]);
    }

    fn service_error(err: ListObjectsV2Error, status: u16) -> SdkError<ListObjectsV2Error> {
        let status = StatusCode::try_from(status).expect("valid status code");
        SdkError::service_error(err, Response::new(status, SdkBody::empty()))
    }

    fn generic(code: &str) -> ListObjectsV2Error {
        ListObjectsV2Error::generic(ErrorMetadata::builder().code(code).build())
    }

    #[test]
    fn test_classify_service_errors() {
        let cases = vec![
            ("AccessDenied", service_error(generic("AccessDenied"), 403), false),
            ("SlowDown", service_error(generic("SlowDown"), 503), true),
            ("RequestTimeout", service_error(generic("RequestTimeout"), 400), true),
            ("InternalError", service_error(generic("InternalError"), 500), true),
            ("NoSuchBucket", service_error(generic("NoSuchBucket"), 404), false),
            (
                "NoSuchBucket typed",
                service_error(
                    ListObjectsV2Error::NoSuchBucket(NoSuchBucket::builder().build()),
                    503,
                ),
                false,
            ),
            ("TooManyRequests", service_error(generic("TooManyRequests"), 429), true),
        ];

        for (name, err, expected) in cases {
            let result = classify(&err);
            assert_eq!(result.is_retryable(), expected, "failed for case: {}", name);
        }
    }

    #[test]
    fn test_classify_transport_errors() {
        let timeout: SdkError<ListObjectsV2Error> = SdkError::timeout_error("timed out");
        let construction: SdkError<ListObjectsV2Error> =
            SdkError::construction_failure("missing bucket");

        assert!(classify(&timeout).is_retryable());
        assert!(matches!(
            classify(&construction),
            model::error::Error::FatalFetch(_)
        ));
    }
}
