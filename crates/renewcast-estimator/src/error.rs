use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstimateError {
    #[error("store error: {0}")]
    Store(#[from] renewcast_store::StoreError),
}
