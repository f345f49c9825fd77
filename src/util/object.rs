use crate::model::error::Error;

const S3_SCHEME: &str = "s3://";

/// Extracts the bucket name from either `s3://bucket` or a bare `bucket`.
pub fn parse_bucket_from_uri(bucket_uri: &str) -> Result<&str, Error> {
    let bucket = match bucket_uri.split_once("://") {
        None => bucket_uri,
        Some(_) if bucket_uri.starts_with(S3_SCHEME) => &bucket_uri[S3_SCHEME.len()..],
        Some((scheme, _)) => {
            return Err(Error::configuration(format!(
                "unsupported storage scheme: {}://",
                scheme
            )))
        }
    };

    let bucket = bucket.trim_end_matches('/');
    if bucket.is_empty() {
        return Err(Error::configuration(format!(
            "failed to parse bucket of: {}",
            bucket_uri
        )));
    }

    if bucket.contains('/') {
        return Err(Error::configuration(format!(
            "bucket uri must not carry a key path, use --prefix instead: {}",
            bucket_uri
        )));
    }

    Ok(bucket)
}
