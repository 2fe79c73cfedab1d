//! Session hooks
//!
//! Collaborators observe persistence through [`SessionHooks`], which extends
//! the registry's per-edit [`ParameterHooks`].

pub use webconf_core::parameters::{NoHooks, ParameterHooks};

/// Persistence callbacks, all defaulting to no-ops
pub trait SessionHooks: ParameterHooks {
    /// Called after a successful save (explicit, automatic or reset)
    fn on_save(&mut self) {}

    /// Called after values were restored from storage
    fn on_load(&mut self) {}
}

impl SessionHooks for NoHooks {}

impl<H: SessionHooks + ?Sized> SessionHooks for &mut H {
    fn on_save(&mut self) {
        (**self).on_save()
    }

    fn on_load(&mut self) {
        (**self).on_load()
    }
}
