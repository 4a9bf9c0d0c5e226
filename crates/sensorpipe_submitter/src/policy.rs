use sensorpipe_core::constants::layout;
use sensorpipe_core::uri::StorageUri;

/// Decides where the aggregation program lives, given the input dataset.
pub trait EntryPointPolicy: Send + Sync + 'static {
    fn derive_entry_point(&self, input_path: &StorageUri) -> String;
}

/// The program lives next to the input data: `<scheme>://<input-bucket>/<key>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketEntryPoint {
    key: String,
}

impl BucketEntryPoint {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for BucketEntryPoint {
    fn default() -> Self {
        Self::new(layout::ENTRY_POINT_KEY)
    }
}

impl EntryPointPolicy for BucketEntryPoint {
    fn derive_entry_point(&self, input_path: &StorageUri) -> String {
        input_path.bucket_uri(&self.key).to_string()
    }
}

impl<F> EntryPointPolicy for F
where
    F: Fn(&StorageUri) -> String + Send + Sync + 'static,
{
    fn derive_entry_point(&self, input_path: &StorageUri) -> String {
        self(input_path)
    }
}

/// `<scheme>://<input-bucket>/src/main`.
pub fn derive_entry_point(input_path: &StorageUri) -> String {
    BucketEntryPoint::default().derive_entry_point(input_path)
}

/// `<scheme>://<output-bucket>/logs/`.
pub fn derive_log_uri(output_path: &StorageUri) -> String {
    output_path.bucket_uri(layout::LOG_PREFIX).to_string()
}
