#[derive(Debug, thiserror::Error)]
pub enum EngineError {
  #[error("invalid sheet: {0}")]
  Sheet(String),
  #[error(transparent)]
  SheetRead(#[from] calamine::XlsxError),
  #[error(transparent)]
  SheetWrite(#[from] rust_xlsxwriter::XlsxError),
  #[error("storefront error: {0}")]
  Storefront(#[from] reqwest::Error),
  #[error(transparent)]
  Other(#[from] anyhow::Error),
}
