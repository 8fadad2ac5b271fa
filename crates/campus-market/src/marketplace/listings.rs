use std::sync::Arc;

use tracing::info;

use super::catalog::{self, CatalogQuery};
use super::clock::{Clock, IdSequence};
use super::domain::{HousingListing, Listing, RecordId, User, UserId};
use super::store::{RecordRepository, RepositoryError};
use super::validation::{FormRejected, ListingDraft};

/// Marketplace board for items for sale.
pub struct ListingBoard<R> {
    listings: Arc<R>,
    clock: Arc<dyn Clock>,
    ids: IdSequence,
}

impl<R> ListingBoard<R>
where
    R: RecordRepository<Listing> + 'static,
{
    pub fn new(listings: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            listings,
            clock,
            ids: IdSequence::new("lst"),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.listings
    }

    pub fn create(&self, draft: ListingDraft, seller: User) -> Result<Listing, ListingError> {
        let listing = draft.into_listing(self.ids.next_id(), seller, self.clock.now())?;
        let stored = self.listings.insert(listing)?;
        info!(listing_id = %stored.id, category = %stored.category, price = stored.price, "listing created");
        Ok(stored)
    }

    /// Replace a listing's details on behalf of its seller; its place in the feed, its id and
    /// its creation time stay put.
    pub fn update(
        &self,
        listing_id: &RecordId,
        requester: &UserId,
        draft: ListingDraft,
    ) -> Result<Listing, ListingError> {
        let now = self.clock.now();
        let updated = self
            .listings
            .update_with(listing_id, |listing: &mut Listing| {
                if &listing.seller.id != requester {
                    return Err(ListingError::NotSeller);
                }
                draft.apply_to(listing, now)?;
                Ok(())
            })?;
        info!(listing_id = %updated.id, price = updated.price, "listing updated");
        Ok(updated)
    }

    /// Remove a listing on behalf of its seller.
    pub fn withdraw(
        &self,
        listing_id: &RecordId,
        requester: &UserId,
    ) -> Result<Listing, ListingError> {
        let listing = self.get(listing_id)?;
        if &listing.seller.id != requester {
            return Err(ListingError::NotSeller);
        }
        let removed = self.listings.remove(listing_id)?;
        info!(listing_id = %removed.id, "listing withdrawn");
        Ok(removed)
    }

    pub fn get(&self, listing_id: &RecordId) -> Result<Listing, ListingError> {
        let listing = self
            .listings
            .fetch(listing_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(listing)
    }

    pub fn browse(&self, query: &CatalogQuery) -> Result<Vec<Listing>, ListingError> {
        Ok(catalog::browse(self.listings.as_ref(), query)?)
    }
}

/// Housing board; units arrive from fixtures and are only browsed here.
pub struct HousingBoard<R> {
    units: Arc<R>,
}

impl<R> HousingBoard<R>
where
    R: RecordRepository<HousingListing> + 'static,
{
    pub fn new(units: Arc<R>) -> Self {
        Self { units }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.units
    }

    pub fn get(&self, unit_id: &RecordId) -> Result<HousingListing, ListingError> {
        let unit = self
            .units
            .fetch(unit_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(unit)
    }

    pub fn browse(&self, query: &CatalogQuery) -> Result<Vec<HousingListing>, ListingError> {
        Ok(catalog::browse(self.units.as_ref(), query)?)
    }
}

/// Error raised by the listing boards.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error(transparent)]
    Validation(#[from] FormRejected),
    #[error("only the seller can change a listing")]
    NotSeller,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
