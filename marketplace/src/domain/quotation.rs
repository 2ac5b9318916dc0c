//! [`Quotation`] definitions.

use common::{define_kind, define_text, unit, DateTime, DateTimeOf};
use derive_more::{Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

use crate::domain::{
    seller,
    service::{self, Minutes, Price},
};
#[cfg(doc)]
use crate::domain::Service;

/// Request of a client for a price and a schedule of a [`Service`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Quotation {
    /// ID of this [`Quotation`].
    pub id: Id,

    /// ID of the quoted [`Service`].
    pub service_id: service::Id,

    /// ID of the seller requesting this [`Quotation`].
    pub client_id: seller::Id,

    /// ID of the seller providing the quoted [`Service`].
    pub provider_id: seller::Id,

    /// [`Title`] of this [`Quotation`].
    pub title: Title,

    /// [`Description`] of this [`Quotation`].
    pub description: Description,

    /// Price estimated by the provider, if any.
    pub estimated_price: Option<Price>,

    /// Price agreed upon, if any.
    pub final_price: Option<Price>,

    /// Duration estimated by the provider, if any.
    pub estimated_duration: Option<Minutes>,

    /// [`Status`] of this [`Quotation`].
    pub status: Status,

    /// [`Notes`] of the client, if any.
    pub client_notes: Option<Notes>,

    /// [`Notes`] of the provider, if any.
    pub provider_notes: Option<Notes>,

    /// [`Attachment`]s of this [`Quotation`].
    pub attachments: Vec<Attachment>,

    /// [`DateTime`] when this [`Quotation`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Quotation`] was modified last time.
    pub updated_at: ModificationDateTime,

    /// [`DateTime`] when this [`Quotation`] expires, if ever.
    pub expires_at: Option<ExpirationDateTime>,

    /// [`DateTime`] when this [`Quotation`] was accepted, if it was.
    pub accepted_at: Option<AcceptanceDateTime>,

    /// [`DateTime`] when this [`Quotation`] was completed, if it was.
    pub completed_at: Option<CompletionDateTime>,
}

impl Quotation {
    /// Accepts this [`Quotation`].
    ///
    /// # Errors
    ///
    /// If this [`Quotation`] isn't [`Status::Pending`] or is overdue.
    pub fn accept(&mut self, now: DateTime) -> Result<(), TransitionError> {
        self.transit(Status::Accepted, &[Status::Pending], now)?;
        self.accepted_at = Some(now.coerce());
        Ok(())
    }

    /// Declines this [`Quotation`], storing the provided `reason` into
    /// provider's [`Notes`].
    ///
    /// # Errors
    ///
    /// If this [`Quotation`] isn't [`Status::Pending`] or is overdue.
    pub fn decline(
        &mut self,
        reason: Option<Notes>,
        now: DateTime,
    ) -> Result<(), TransitionError> {
        self.transit(Status::Declined, &[Status::Pending], now)?;
        if let Some(reason) = reason {
            self.provider_notes = Some(reason);
        }
        Ok(())
    }

    /// Completes this [`Quotation`].
    ///
    /// # Errors
    ///
    /// If this [`Quotation`] isn't [`Status::Accepted`].
    pub fn complete(&mut self, now: DateTime) -> Result<(), TransitionError> {
        self.transit(Status::Completed, &[Status::Accepted], now)?;
        self.completed_at = Some(now.coerce());
        Ok(())
    }

    /// Cancels this [`Quotation`], storing the provided `reason` into
    /// provider's [`Notes`].
    ///
    /// # Errors
    ///
    /// If this [`Quotation`] is neither [`Status::Pending`] nor
    /// [`Status::Accepted`], or is overdue.
    pub fn cancel(
        &mut self,
        reason: Option<Notes>,
        now: DateTime,
    ) -> Result<(), TransitionError> {
        self.transit(
            Status::Cancelled,
            &[Status::Pending, Status::Accepted],
            now,
        )?;
        if let Some(reason) = reason {
            self.provider_notes = Some(reason);
        }
        Ok(())
    }

    /// Indicates whether this [`Quotation`] is pending past its expiration.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime) -> bool {
        self.status == Status::Pending
            && self.expires_at.is_some_and(|at| at.coerce::<()>() <= now)
    }

    /// Moves this [`Quotation`] to the provided [`Status`], if the current
    /// one is among the allowed `from` ones.
    ///
    /// An overdue [`Quotation`] is considered [`Status::Expired`] even before
    /// it's swept.
    fn transit(
        &mut self,
        to: Status,
        from: &[Status],
        now: DateTime,
    ) -> Result<(), TransitionError> {
        let current = if self.is_overdue(now) {
            Status::Expired
        } else {
            self.status
        };
        if !from.contains(&current) {
            return Err(TransitionError { from: current, to });
        }
        self.status = to;
        self.updated_at = now.coerce();
        Ok(())
    }
}

/// Error of changing a [`Quotation`] [`Status`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("cannot change `Quotation` status from `{from}` to `{to}`")]
pub struct TransitionError {
    /// [`Status`] the [`Quotation`] has.
    pub from: Status,

    /// [`Status`] the [`Quotation`] was requested to have.
    pub to: Status,
}

/// ID of a [`Quotation`].
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(i32);

define_text! {
    #[doc = "Title of a [`Quotation`]."]
    struct Title(max = 256);
}

define_text! {
    #[doc = "Description of a [`Quotation`]."]
    struct Description(max = 4096);
}

define_text! {
    #[doc = "Notes left on a [`Quotation`]."]
    struct Notes(max = 4096);
}

define_text! {
    #[doc = "URL of a file attached to a [`Quotation`]."]
    struct Attachment(max = 2048);
}

define_kind! {
    #[doc = "Status of a [`Quotation`]."]
    enum Status {
        #[doc = "Awaits a response of the provider."]
        Pending = 1,

        #[doc = "Accepted by the provider."]
        Accepted = 2,

        #[doc = "Declined by the provider."]
        Declined = 3,

        #[doc = "Work is done."]
        Completed = 4,

        #[doc = "Cancelled before completion."]
        Cancelled = 5,

        #[doc = "Was not answered before its expiration."]
        Expired = 6,
    }
}

/// [`DateTime`] when a [`Quotation`] was created.
pub type CreationDateTime = DateTimeOf<(Quotation, unit::Creation)>;

/// [`DateTime`] when a [`Quotation`] was modified.
pub type ModificationDateTime = DateTimeOf<(Quotation, unit::Modification)>;

/// [`DateTime`] when a [`Quotation`] expires.
pub type ExpirationDateTime = DateTimeOf<(Quotation, unit::Expiration)>;

/// [`DateTime`] when a [`Quotation`] was accepted.
pub type AcceptanceDateTime = DateTimeOf<(Quotation, unit::Acceptance)>;

/// [`DateTime`] when a [`Quotation`] was completed.
pub type CompletionDateTime = DateTimeOf<(Quotation, unit::Completion)>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;
    use strum::IntoEnumIterator as _;

    use crate::domain::{seller, service};

    use super::{
        Description, Id, Notes, Quotation, Status, Title, TransitionError,
    };

    fn quotation(status: Status) -> Quotation {
        let now = DateTime::now();
        Quotation {
            id: Id::from(1),
            service_id: service::Id::from(1),
            client_id: seller::Id::new("client").expect("valid"),
            provider_id: seller::Id::new("provider").expect("valid"),
            title: Title::new("Paint the fence").expect("valid"),
            description: Description::new("Two layers").expect("valid"),
            estimated_price: None,
            final_price: None,
            estimated_duration: None,
            status,
            client_notes: None,
            provider_notes: None,
            attachments: vec![],
            created_at: now.coerce(),
            updated_at: now.coerce(),
            expires_at: None,
            accepted_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn accepts_only_pending() {
        for status in Status::iter() {
            let mut q = quotation(status);
            let now = DateTime::now();
            let res = q.accept(now);
            if status == Status::Pending {
                assert_eq!(res, Ok(()));
                assert_eq!(q.status, Status::Accepted);
                assert_eq!(q.accepted_at, Some(now.coerce()));
                assert_eq!(q.updated_at, now.coerce());
            } else {
                assert_eq!(
                    res,
                    Err(TransitionError {
                        from: status,
                        to: Status::Accepted,
                    }),
                );
                assert_eq!(q.status, status);
                assert_eq!(q.accepted_at, None);
            }
        }
    }

    #[test]
    fn declines_only_pending() {
        for status in Status::iter() {
            let mut q = quotation(status);
            let reason = Notes::new("Too far away").expect("valid");
            let res = q.decline(Some(reason.clone()), DateTime::now());
            if status == Status::Pending {
                assert_eq!(res, Ok(()));
                assert_eq!(q.status, Status::Declined);
                assert_eq!(q.provider_notes, Some(reason));
            } else {
                assert!(res.is_err());
                assert_eq!(q.provider_notes, None);
            }
        }
    }

    #[test]
    fn declining_without_reason_keeps_notes() {
        let mut q = quotation(Status::Pending);
        q.provider_notes = Notes::new("Busy until May");
        q.decline(None, DateTime::now()).expect("pending");
        assert_eq!(q.provider_notes, Notes::new("Busy until May"));
    }

    #[test]
    fn completes_only_accepted() {
        for status in Status::iter() {
            let mut q = quotation(status);
            let res = q.complete(DateTime::now());
            assert_eq!(res.is_ok(), status == Status::Accepted, "{status}");
            assert_eq!(q.completed_at.is_some(), status == Status::Accepted);
        }
    }

    #[test]
    fn cancels_pending_or_accepted() {
        for status in Status::iter() {
            let mut q = quotation(status);
            let res = q.cancel(None, DateTime::now());
            let allowed = matches!(status, Status::Pending | Status::Accepted);
            assert_eq!(res.is_ok(), allowed, "{status}");
            if allowed {
                assert_eq!(q.status, Status::Cancelled);
            }
        }
    }

    #[test]
    fn overdue_when_pending_past_expiration() {
        let now = DateTime::now();

        let mut q = quotation(Status::Pending);
        assert!(!q.is_overdue(now));

        q.expires_at = Some((now + Duration::from_secs(60)).coerce());
        assert!(!q.is_overdue(now));

        q.expires_at = Some((now - Duration::from_secs(60)).coerce());
        assert!(q.is_overdue(now));

        q.status = Status::Accepted;
        assert!(!q.is_overdue(now));
    }

    #[test]
    fn rejects_transitions_of_overdue() {
        let now = DateTime::now();
        let mut q = quotation(Status::Pending);
        q.expires_at = Some((now - Duration::from_secs(1)).coerce());

        assert_eq!(
            q.accept(now),
            Err(TransitionError {
                from: Status::Expired,
                to: Status::Accepted,
            }),
        );
        assert!(q.decline(None, now).is_err());
        assert!(q.cancel(None, now).is_err());
        assert_eq!(q.status, Status::Pending);
        assert_eq!(q.accepted_at, None);

        q.expires_at = Some((now + Duration::from_secs(60)).coerce());
        assert_eq!(q.accept(now), Ok(()));
    }
}
