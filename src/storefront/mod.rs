pub mod dutchie;
pub mod mock;

use crate::{
  error::EngineError,
  model::{Listing, RowContext},
};

/// Where candidate listings come from. The engine only ever sees this trait,
/// so tests and benchmarks can swap the live menu for a canned one.
pub trait StorefrontProvider: Clone + Send + Sync + 'static {
  fn health(&self) -> impl Future<Output = Result<(), EngineError>> + Send;

  /// Fetch the menu page filtered for one sheet row and extract its product
  /// tiles.
  fn fetch_listings(&self, ctx: &RowContext) -> impl Future<Output = Result<Vec<Listing>, EngineError>> + Send;
}
