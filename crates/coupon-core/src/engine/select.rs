//! Winner-takes-one selection shared by the Combo, Total, Holiday and
//! Customer selectors.

use tracing::{debug, trace, warn};

use crate::cart::AppliedDiscount;
use crate::error::RuleResult;
use crate::money::Money;
use crate::types::{Coupon, CouponCategory};

/// An eligible coupon and the amount it would discount.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate<'a> {
    pub coupon: &'a Coupon,
    pub amount: Money,
}

impl Candidate<'_> {
    /// Larger amount wins, then higher priority. Equal candidates do not
    /// beat each other, so the earlier catalog entry is kept.
    fn beats(&self, other: &Candidate<'_>) -> bool {
        (self.amount, self.coupon.priority) > (other.amount, other.coupon.priority)
    }
}

/// Tracks the best candidate of one category across a catalog scan.
#[derive(Debug)]
pub(crate) struct WinnerSelector<'a> {
    category: CouponCategory,
    best: Option<Candidate<'a>>,
}

impl<'a> WinnerSelector<'a> {
    pub fn new(category: CouponCategory) -> Self {
        WinnerSelector {
            category,
            best: None,
        }
    }

    /// Records the outcome of evaluating one coupon.
    ///
    /// `Ok(None)` means the coupon's conditions were not met. An error
    /// excludes the coupon and is logged, the scan carries on.
    pub fn offer(&mut self, coupon: &'a Coupon, outcome: RuleResult<Option<Money>>) {
        match outcome {
            Err(err) => {
                warn!(
                    coupon_id = %coupon.id,
                    category = %self.category,
                    error = %err,
                    "skipping malformed coupon"
                );
            }
            Ok(None) => {
                trace!(coupon_id = %coupon.id, category = %self.category, "conditions not met");
            }
            Ok(Some(amount)) => {
                let candidate = Candidate { coupon, amount };
                if self.best.as_ref().map_or(true, |best| candidate.beats(best)) {
                    self.best = Some(candidate);
                }
            }
        }
    }

    /// The winning coupon as an applied discount, if any coupon qualified.
    pub fn into_discount(self) -> Option<AppliedDiscount> {
        let Candidate { coupon, amount } = self.best?;
        debug!(
            coupon_id = %coupon.id,
            category = %self.category,
            %amount,
            "coupon selected"
        );

        Some(AppliedDiscount {
            coupon_id: coupon.id.clone(),
            category: self.category,
            name: coupon.name.clone(),
            amount,
            description: coupon.description.clone(),
            matched_product_codes: None,
        })
    }
}
