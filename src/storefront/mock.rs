use crate::{
  error::EngineError,
  model::{Listing, RowContext},
  storefront::StorefrontProvider,
};

/// Canned storefront for tests and benchmarks: every fetch returns the same
/// listings, and health can be toggled to exercise the readiness probe.
#[derive(Clone, bon::Builder)]
pub struct MockedStorefront {
  #[builder(default)]
  listings: Vec<Listing>,
  #[builder(default = true)]
  healthy: bool,
}

impl MockedStorefront {
  pub fn with_listings(listings: Vec<Listing>) -> MockedStorefront {
    MockedStorefront { listings, healthy: true }
  }
}

impl StorefrontProvider for MockedStorefront {
  async fn health(&self) -> Result<(), EngineError> {
    if self.healthy {
      Ok(())
    } else {
      Err(EngineError::Other(anyhow::anyhow!("storefront is unreachable")))
    }
  }

  async fn fetch_listings(&self, _: &RowContext) -> Result<Vec<Listing>, EngineError> {
    Ok(self.listings.clone())
  }
}
