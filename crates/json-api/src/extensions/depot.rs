//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use storefront_app::auth::models::Caller;

const CALLER_KEY: &str = "storefront.caller";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }
}

/// Access to the authenticated caller the auth middleware stored.
pub(crate) trait CallerExt {
    fn insert_caller(&mut self, caller: Caller);
    fn caller_or_401(&self) -> Result<Caller, StatusError>;
    fn admin_or_403(&self) -> Result<Caller, StatusError>;
}

impl CallerExt for Depot {
    fn insert_caller(&mut self, caller: Caller) {
        self.insert(CALLER_KEY, caller);
    }

    fn caller_or_401(&self) -> Result<Caller, StatusError> {
        self.get::<Caller>(CALLER_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized().brief("Not authenticated"))
    }

    fn admin_or_403(&self) -> Result<Caller, StatusError> {
        let caller = self.caller_or_401()?;

        if caller.is_admin() {
            Ok(caller)
        } else {
            Err(StatusError::forbidden().brief("Admin access required"))
        }
    }
}
